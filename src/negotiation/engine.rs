//! Negotiation engine owns the per-session negotiation store

use crate::config::{NegotiationConfig, SeedDefaults};
use crate::error::{AuraError, Result};
use crate::risk::RiskAssessment;
use crate::types::UserId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::SystemTime;

use super::counter::{self, CounterDecision, CounterOutcome, CounterReply};
use super::policy::{format_amount, OfferDecision, OfferPolicy};
use super::summary::{count_statuses, NegotiationSummary};
use super::types::{
    BorrowerSeed, ChatMessage, DecisionRecord, LogEntry, NegotiationRecord, NegotiationStatus,
    OfferRequest, StatusEvent,
};

/// Append-only logs kept alongside the records
#[derive(Clone, Debug, Default)]
struct Journal {
    log: Vec<LogEntry>,
    decisions: Vec<DecisionRecord>,
}

impl Journal {
    fn log(&mut self, message: impl Into<String>) {
        self.log.push(LogEntry {
            timestamp: SystemTime::now(),
            message: message.into(),
        });
    }

    fn decision(&mut self, record: &NegotiationRecord, reason: impl Into<String>) {
        self.decisions.push(DecisionRecord {
            user_id: record.user_id.clone(),
            offer: record.offer_amount,
            expiry: record.expiry_days,
            reason: reason.into(),
            timestamp: SystemTime::now(),
        });
    }

    fn clear(&mut self) {
        self.log.clear();
        self.decisions.clear();
    }
}

/// Negotiation engine holding one record per borrower plus the logs
pub struct NegotiationEngine {
    negotiations: HashMap<UserId, NegotiationRecord>,
    funds_recovered: u64,
    active_user: Option<UserId>,
    journal: Journal,
    seed_defaults: SeedDefaults,
    policy: OfferPolicy,
}

impl NegotiationEngine {
    /// Create an empty engine with default configuration
    pub fn new() -> Self {
        Self::with_config(NegotiationConfig::default())
    }

    pub fn with_config(config: NegotiationConfig) -> Self {
        Self {
            negotiations: HashMap::new(),
            funds_recovered: 0,
            active_user: None,
            journal: Journal::default(),
            seed_defaults: config.seed,
            policy: OfferPolicy::new(config.policy),
        }
    }

    /// Create an engine pre-populated with the demo borrowers
    pub fn with_demo_borrowers(config: NegotiationConfig) -> Self {
        let mut engine = Self::with_config(config);
        engine.seed_demo_borrowers();
        engine
    }

    pub fn policy(&self) -> &OfferPolicy {
        &self.policy
    }

    /// Create the record if absent. Existing records are left untouched.
    pub fn ensure_borrower(&mut self, user_id: &str, seed: BorrowerSeed) -> &NegotiationRecord {
        entry_or_create(
            &mut self.negotiations,
            &mut self.journal,
            &mut self.active_user,
            &self.seed_defaults,
            user_id,
            seed,
        )
    }

    /// Create a record for an assessed borrower and log the assessment
    pub fn ensure_from_assessment(
        &mut self,
        assessment: &RiskAssessment,
        seed: BorrowerSeed,
    ) -> &NegotiationRecord {
        let record = entry_or_create(
            &mut self.negotiations,
            &mut self.journal,
            &mut self.active_user,
            &self.seed_defaults,
            assessment.user_id.as_str(),
            seed,
        );

        let factors = if assessment.risk_factors.is_empty() {
            "none".to_string()
        } else {
            assessment.risk_factors.join(", ")
        };
        self.journal.log(format!(
            "Risk assessment for {}: {} (p={:.2}; factors: {})",
            assessment.user_id,
            assessment.tier(),
            assessment.probability,
            factors
        ));

        record
    }

    /// Append a free-form entry to the negotiation log
    pub fn log(&mut self, message: impl Into<String>) {
        self.journal.log(message);
    }

    pub fn record(&self, user_id: &str) -> Option<&NegotiationRecord> {
        self.negotiations.get(user_id)
    }

    pub fn negotiations(&self) -> &HashMap<UserId, NegotiationRecord> {
        &self.negotiations
    }

    pub fn funds_recovered(&self) -> u64 {
        self.funds_recovered
    }

    pub fn active_user(&self) -> Option<&UserId> {
        self.active_user.as_ref()
    }

    /// Mark a borrower as the one shown in the chat view
    pub fn select_user(&mut self, user_id: &str) -> Result<()> {
        if !self.negotiations.contains_key(user_id) {
            return Err(AuraError::NegotiationNotFound(user_id.to_string()));
        }
        self.active_user = Some(UserId::from(user_id));
        Ok(())
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        &self.journal.log
    }

    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.journal.decisions
    }

    /// Last `n` log entries
    pub fn log_tail(&self, n: usize) -> &[LogEntry] {
        let log = &self.journal.log;
        &log[log.len().saturating_sub(n)..]
    }

    /// Last `n` chat messages of a borrower
    pub fn chat_tail(&self, user_id: &str, n: usize) -> Option<&[ChatMessage]> {
        let chat = &self.negotiations.get(user_id)?.chat_history;
        Some(&chat[chat.len().saturating_sub(n)..])
    }

    /// Run the offer policy against a borrower's current record
    pub fn decide_offer(&self, user_id: &str) -> Option<OfferDecision> {
        self.negotiations
            .get(user_id)
            .map(|record| self.policy.decide(record))
    }

    /// Send (or re-send) an offer to a borrower
    ///
    /// Restructured records are returned unchanged. Offer amount and expiry
    /// are only overwritten when supplied.
    pub fn start_negotiation(&mut self, user_id: &str, request: OfferRequest) -> &NegotiationRecord {
        let record = entry_or_create(
            &mut self.negotiations,
            &mut self.journal,
            &mut self.active_user,
            &self.seed_defaults,
            user_id,
            BorrowerSeed::default(),
        );

        let Some(next) = record.status.on(StatusEvent::OfferSent) else {
            tracing::debug!("Negotiation for {} already restructured", user_id);
            return record;
        };

        if let Some(offer_amount) = request.offer_amount {
            record.offer_amount = offer_amount;
        }
        if let Some(expiry_days) = request.expiry_days {
            record.expiry_days = expiry_days;
        }
        record.status = next;
        record.started_at.get_or_insert_with(SystemTime::now);

        let message = request.message.unwrap_or_else(|| {
            format!(
                "Hi {}, you missed your payment. I see you have ₹{}. \
                 If you pay ₹{} today, I can extend the rest for {} days. Do you accept?",
                record.name,
                format_amount(record.wallet),
                format_amount(record.offer_amount),
                record.expiry_days
            )
        });
        record.chat_history.push(ChatMessage::agent(message.clone()));
        record.last_message = Some(message);

        self.journal.log(format!(
            "Offer sent to {}: ₹{}",
            user_id,
            format_amount(record.offer_amount)
        ));
        if let Some(rationale) = request.rationale {
            self.journal.decision(record, rationale);
        }

        tracing::info!(
            "Offer sent to {}: {} with {}-day expiry",
            user_id,
            record.offer_amount,
            record.expiry_days
        );

        record
    }

    /// Accept the current offer for a borrower
    ///
    /// Idempotent: a restructured record is returned unchanged and its offer
    /// is never counted twice.
    pub fn accept_offer(&mut self, user_id: &str) -> Result<&NegotiationRecord> {
        let record = self
            .negotiations
            .get_mut(user_id)
            .ok_or_else(|| AuraError::NegotiationNotFound(user_id.to_string()))?;

        let total = recovered_total(self.funds_recovered, record, record.offer_amount)?;
        settle(record, &mut self.funds_recovered, total, &mut self.journal);
        Ok(record)
    }

    /// Interpret a borrower's free-text counter-offer
    pub fn handle_counter_offer_text(&mut self, user_id: &str, text: &str) -> CounterReply {
        let Some(record) = self.negotiations.get_mut(user_id) else {
            return CounterReply::new(
                CounterOutcome::UnknownUser,
                format!("No active negotiation for {}.", user_id),
            );
        };

        let Some(proposed) = counter::parse_amount(text) else {
            return CounterReply::new(
                CounterOutcome::NeedsClarification,
                "I couldn't find an amount in your message. How much can you pay today? (e.g. ₹300)",
            );
        };

        if record.status.is_terminal() {
            return CounterReply::new(
                CounterOutcome::AlreadySettled {
                    amount: record.offer_amount,
                },
                format!(
                    "Your loan is already restructured at ₹{}.",
                    format_amount(record.offer_amount)
                ),
            );
        }

        let current = record.offer_amount;
        let decision = counter::evaluate(proposed, current, self.policy.config());

        let settled_at = match decision {
            CounterDecision::AcceptCurrent { current } => Some(current),
            CounterDecision::Adapt { proposed, .. } => Some(proposed),
            CounterDecision::Reject { .. } => None,
        };
        let total = match settled_at {
            Some(amount) => match recovered_total(self.funds_recovered, record, amount) {
                Ok(total) => total,
                Err(err) => {
                    tracing::warn!("Counter-offer from {} not settled: {}", user_id, err);
                    return CounterReply::new(
                        CounterOutcome::LimitExceeded { amount },
                        format!(
                            "₹{} cannot be recorded against the recovered total.",
                            format_amount(amount)
                        ),
                    );
                }
            },
            None => self.funds_recovered,
        };

        record.chat_history.push(ChatMessage::borrower(text));

        match decision {
            CounterDecision::AcceptCurrent { current } => {
                let message = format!(
                    "Thank you! We'll settle at the offered ₹{} and extend the rest.",
                    format_amount(current)
                );
                record.chat_history.push(ChatMessage::agent(message.clone()));
                record.last_message = Some(message);
                self.journal.log(format!(
                    "{} offered ₹{}; accepting at current offer ₹{}",
                    user_id,
                    format_amount(proposed),
                    format_amount(current)
                ));

                settle(record, &mut self.funds_recovered, total, &mut self.journal);

                CounterReply::new(
                    CounterOutcome::AcceptedCurrent { amount: current },
                    format!(
                        "Offer accepted at ₹{}. Your loan has been restructured.",
                        format_amount(current)
                    ),
                )
            }
            CounterDecision::Adapt {
                proposed,
                min_threshold,
            } => {
                record.offer_amount = proposed;
                let message = format!(
                    "I can work with ₹{}. Restructuring your loan at that amount.",
                    format_amount(proposed)
                );
                record.chat_history.push(ChatMessage::agent(message.clone()));
                record.last_message = Some(message);
                self.journal.log(format!(
                    "Adapted offer for {}: ₹{} -> ₹{}",
                    user_id,
                    format_amount(current),
                    format_amount(proposed)
                ));

                settle(record, &mut self.funds_recovered, total, &mut self.journal);
                self.journal.decision(
                    record,
                    format!(
                        "Counter-offer ₹{} accepted: at or above minimum ₹{} (current offer ₹{})",
                        format_amount(proposed),
                        format_amount(min_threshold),
                        format_amount(current)
                    ),
                );
                tracing::info!(
                    "Adapted offer for {} from {} to {}",
                    user_id,
                    current,
                    proposed
                );

                CounterReply::new(
                    CounterOutcome::Adapted {
                        amount: proposed,
                        min_threshold,
                    },
                    format!(
                        "Counter-offer of ₹{} accepted. Your loan has been restructured.",
                        format_amount(proposed)
                    ),
                )
            }
            CounterDecision::Reject {
                proposed,
                min_threshold,
            } => {
                let message = format!(
                    "I understand, but the minimum I can accept today is ₹{}. Can you manage that?",
                    format_amount(min_threshold)
                );
                record.chat_history.push(ChatMessage::agent(message));
                self.journal.log(format!(
                    "Counter-offer from {} rejected: ₹{} below minimum ₹{}",
                    user_id,
                    format_amount(proposed),
                    format_amount(min_threshold)
                ));
                self.journal.decision(
                    record,
                    format!(
                        "Counter-offer ₹{} rejected: below minimum ₹{} (current offer ₹{})",
                        format_amount(proposed),
                        format_amount(min_threshold),
                        format_amount(current)
                    ),
                );
                tracing::warn!(
                    "Counter-offer {} from {} below minimum {}",
                    proposed,
                    user_id,
                    min_threshold
                );

                CounterReply::new(
                    CounterOutcome::Rejected {
                        proposed,
                        min_threshold,
                    },
                    format!(
                        "The minimum acceptable amount is ₹{}.",
                        format_amount(min_threshold)
                    ),
                )
            }
        }
    }

    /// Send policy offers to every pending borrower above the wallet floor
    pub fn auto_negotiate_all(&mut self) -> usize {
        let wallet_floor = self.policy.config().auto_wallet_floor;
        let eligible: Vec<(UserId, OfferDecision)> = self
            .negotiations
            .values()
            .filter(|r| r.status == NegotiationStatus::Pending && r.wallet >= wallet_floor)
            .map(|r| (r.user_id.clone(), self.policy.decide(r)))
            .collect();

        for (user_id, decision) in &eligible {
            self.start_negotiation(
                user_id.as_str(),
                OfferRequest {
                    offer_amount: Some(decision.offer_amount),
                    expiry_days: Some(decision.expiry_days),
                    message: Some(decision.message.clone()),
                    rationale: Some(decision.rationale.clone()),
                },
            );
        }

        tracing::info!("Auto-negotiation sent {} offers", eligible.len());
        eligible.len()
    }

    /// Read-only snapshot for display
    pub fn summary(&self) -> NegotiationSummary {
        NegotiationSummary {
            total_recovered: self.funds_recovered,
            counts: count_statuses(self.negotiations.values()),
            negotiations: self.negotiations.clone(),
            log: self.journal.log.clone(),
            decisions: self.journal.decisions.clone(),
        }
    }

    /// Clear all records and logs, then reseed the demo borrowers
    pub fn reset(&mut self) {
        self.negotiations.clear();
        self.journal.clear();
        self.funds_recovered = 0;
        self.active_user = None;
        self.seed_demo_borrowers();
        tracing::info!("Negotiation store reset");
    }

    fn seed_demo_borrowers(&mut self) {
        for (user_id, seed) in demo_borrowers() {
            self.ensure_borrower(user_id, seed);
        }
    }
}

impl Default for NegotiationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Demo borrower set used for seeding and reset
pub fn demo_borrowers() -> Vec<(&'static str, BorrowerSeed)> {
    vec![
        ("USR1001", BorrowerSeed::default()),
        (
            "USR1002",
            BorrowerSeed::default()
                .name("Priya")
                .wallet(3500)
                .missed_amount(5000)
                .offer_amount(800),
        ),
        (
            "USR1003",
            BorrowerSeed::default()
                .name("Arjun")
                .wallet(250)
                .missed_amount(1200)
                .offer_amount(300),
        ),
        (
            "USR1004",
            BorrowerSeed::default()
                .name("Meera")
                .wallet(1500)
                .missed_amount(900)
                .offer_amount(400),
        ),
    ]
}

fn entry_or_create<'a>(
    negotiations: &'a mut HashMap<UserId, NegotiationRecord>,
    journal: &mut Journal,
    active_user: &mut Option<UserId>,
    defaults: &SeedDefaults,
    user_id: &str,
    seed: BorrowerSeed,
) -> &'a mut NegotiationRecord {
    match negotiations.entry(UserId::from(user_id)) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            let record = NegotiationRecord {
                user_id: entry.key().clone(),
                name: seed.name.unwrap_or_else(|| defaults.name.clone()),
                wallet: seed.wallet.unwrap_or(defaults.wallet),
                missed_amount: seed.missed_amount.unwrap_or(defaults.missed_amount),
                offer_amount: seed.offer_amount.unwrap_or(defaults.offer_amount),
                expiry_days: seed.expiry_days.unwrap_or(defaults.expiry_days),
                status: NegotiationStatus::Pending,
                started_at: None,
                accepted_at: None,
                last_message: None,
                chat_history: Vec::new(),
                counted: false,
            };
            journal.log(format!("Demo user {} created", user_id));
            active_user.get_or_insert_with(|| entry.key().clone());
            tracing::debug!("Created negotiation record for {}", user_id);
            entry.insert(record)
        }
    }
}

/// Recovered total once `amount` is counted for `record`
///
/// Records already counted or restructured leave the total unchanged.
fn recovered_total(funds_recovered: u64, record: &NegotiationRecord, amount: u64) -> Result<u64> {
    if record.counted || record.status.is_terminal() {
        return Ok(funds_recovered);
    }
    funds_recovered
        .checked_add(amount)
        .ok_or_else(|| AuraError::RecoveredOverflow {
            user_id: record.user_id.to_string(),
            amount,
        })
}

/// Transition a record to restructured, counting its offer at most once
///
/// `total` comes from `recovered_total` and already includes the offer.
fn settle(
    record: &mut NegotiationRecord,
    funds_recovered: &mut u64,
    total: u64,
    journal: &mut Journal,
) {
    let Some(next) = record.status.on(StatusEvent::Accepted) else {
        return;
    };

    if !record.status.expects_accept() {
        journal.log(format!(
            "Accept invoked for {} but status was {}",
            record.user_id, record.status
        ));
        tracing::warn!(
            "Accept invoked for {} from unexpected status {}",
            record.user_id,
            record.status
        );
    }

    record.status = next;
    record.accepted_at.get_or_insert_with(SystemTime::now);
    if !record.counted {
        *funds_recovered = total;
        record.counted = true;
    }
    record.chat_history.push(ChatMessage::borrower("I accept"));

    journal.log(format!(
        "{} accepted offer; recovered ₹{}",
        record.user_id,
        format_amount(record.offer_amount)
    ));
    tracing::info!(
        "Negotiation restructured for {}: recovered {}",
        record.user_id,
        record.offer_amount
    );
}
