//! Offer policy: picks the settlement ask and grace window for a borrower

use crate::config::PolicyConfig;
use serde::{Deserialize, Serialize};

use super::types::NegotiationRecord;

/// Burden tier derived from `missed_amount / wallet`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurdenTier {
    High,
    Moderate,
    Low,
}

impl BurdenTier {
    /// Strategy label quoted in the rationale
    pub fn strategy(&self) -> &'static str {
        match self {
            BurdenTier::High => "high burden, extend window",
            BurdenTier::Moderate => "moderate burden, balanced extension",
            BurdenTier::Low => "low burden, shorter grace to maintain momentum",
        }
    }
}

/// Result of running the policy on a record. Callers apply it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferDecision {
    pub offer_amount: u64,
    pub expiry_days: u32,
    pub ratio: f64,
    pub tier: BurdenTier,
    pub message: String,
    pub rationale: String,
}

/// Offer policy parameterized by `PolicyConfig`
#[derive(Clone, Debug, Default)]
pub struct OfferPolicy {
    config: PolicyConfig,
}

impl OfferPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Classify a burden ratio. Boundaries fall into the lower tier.
    pub fn tier(&self, ratio: f64) -> BurdenTier {
        if ratio > self.config.high_burden_ratio {
            BurdenTier::High
        } else if ratio > self.config.moderate_burden_ratio {
            BurdenTier::Moderate
        } else {
            BurdenTier::Low
        }
    }

    pub fn expiry_for(&self, tier: BurdenTier) -> u32 {
        match tier {
            BurdenTier::High => self.config.high_burden_days,
            BurdenTier::Moderate => self.config.moderate_burden_days,
            BurdenTier::Low => self.config.low_burden_days,
        }
    }

    /// `max(floor, min(wallet, missed * fraction))`, truncated.
    ///
    /// The floor is applied after the wallet cap, so a wallet below the
    /// floor still yields the floor.
    pub fn offer_amount(&self, wallet: u64, missed_amount: u64) -> u64 {
        let target = (missed_amount as f64 * self.config.recovery_fraction).min(wallet as f64);
        target.max(self.config.offer_floor as f64) as u64
    }

    pub fn decide(&self, record: &NegotiationRecord) -> OfferDecision {
        let ratio = record.burden_ratio();
        let tier = self.tier(ratio);
        let offer_amount = self.offer_amount(record.wallet, record.missed_amount);
        let expiry_days = self.expiry_for(tier);

        let message = format!(
            "Hi {}, you missed a payment of ₹{}. I see ₹{} available in your wallet. \
             If you pay ₹{} today, I can extend the rest for {} days. Do you accept?",
            record.name,
            format_amount(record.missed_amount),
            format_amount(record.wallet),
            format_amount(offer_amount),
            expiry_days
        );
        let rationale = format!(
            "Offer ₹{} with {}-day expiry; ratio {:.2} ({})",
            format_amount(offer_amount),
            expiry_days,
            ratio,
            tier.strategy()
        );

        tracing::debug!(
            user_id = %record.user_id,
            offer = offer_amount,
            expiry = expiry_days,
            ratio,
            "Policy decision computed"
        );

        OfferDecision {
            offer_amount,
            expiry_days,
            ratio,
            tier,
            message,
            rationale,
        }
    }
}

/// Decide an offer with the default policy constants
pub fn decide_offer(record: &NegotiationRecord) -> OfferDecision {
    OfferPolicy::default().decide(record)
}

/// Render an amount with thousands separators (`12500` -> `12,500`)
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
