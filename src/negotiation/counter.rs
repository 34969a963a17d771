//! Counter-offer parsing and evaluation
//!
//! The parser is deliberately narrow: it extracts the first integer token
//! from free text (an optional `₹` and comma grouping are tolerated). It is
//! not a language-understanding component.

use crate::config::PolicyConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"₹?\s*(\d{1,3}(?:,\d{3})+\b|\d+)").expect("amount pattern is valid")
    })
}

/// Extract the first amount mentioned in `text`
pub fn parse_amount(text: &str) -> Option<u64> {
    let captures = amount_pattern().captures(text)?;
    let digits: String = captures[1].chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Smallest counter-offer accepted against `current`:
/// `max(counter_floor, round(current * counter_fraction))`, ties to even.
pub fn min_threshold(current: u64, config: &PolicyConfig) -> u64 {
    let scaled = (current as f64 * config.counter_fraction).round_ties_even() as u64;
    scaled.max(config.counter_floor)
}

/// Outcome of comparing a borrower's proposal with the current offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterDecision {
    /// Proposal meets the current offer; settle at the current offer
    AcceptCurrent { current: u64 },
    /// Proposal is below the offer but above the threshold; settle at the proposal
    Adapt { proposed: u64, min_threshold: u64 },
    /// Proposal is below the threshold; ask for at least the threshold
    Reject { proposed: u64, min_threshold: u64 },
}

pub fn evaluate(proposed: u64, current: u64, config: &PolicyConfig) -> CounterDecision {
    if proposed >= current {
        return CounterDecision::AcceptCurrent { current };
    }

    let min_threshold = min_threshold(current, config);
    if proposed >= min_threshold {
        CounterDecision::Adapt {
            proposed,
            min_threshold,
        }
    } else {
        CounterDecision::Reject {
            proposed,
            min_threshold,
        }
    }
}

/// What `handle_counter_offer_text` did
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CounterOutcome {
    /// No negotiation exists for the user
    UnknownUser,
    /// No amount could be extracted
    NeedsClarification,
    /// Record already restructured; nothing changed
    AlreadySettled { amount: u64 },
    /// Borrower met or exceeded the offer; accepted at the current offer
    AcceptedCurrent { amount: u64 },
    /// Offer lowered to the proposal and accepted
    Adapted { amount: u64, min_threshold: u64 },
    /// Proposal too low; minimum quoted back
    Rejected { proposed: u64, min_threshold: u64 },
    /// Settling at `amount` would overflow the recovered total; nothing changed
    LimitExceeded { amount: u64 },
}

/// Reply returned to the caller together with the outcome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterReply {
    pub outcome: CounterOutcome,
    pub reply: String,
}

impl CounterReply {
    pub fn new(outcome: CounterOutcome, reply: impl Into<String>) -> Self {
        Self {
            outcome,
            reply: reply.into(),
        }
    }
}
