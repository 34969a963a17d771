//! Negotiation types and state machine

use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Negotiation status of one borrower
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    /// Record exists, no offer made yet
    Pending,
    /// Agent has proposed settlement terms
    OfferSent,
    /// Borrower accepted; settlement agreed
    Restructured,
    /// Declared for completeness; no transition produces it
    Rejected,
}

impl NegotiationStatus {
    pub const ALL: [NegotiationStatus; 4] = [
        NegotiationStatus::Pending,
        NegotiationStatus::OfferSent,
        NegotiationStatus::Restructured,
        NegotiationStatus::Rejected,
    ];

    /// Check if negotiation is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, NegotiationStatus::Restructured)
    }

    /// Statuses from which an accept is expected
    pub fn expects_accept(&self) -> bool {
        matches!(self, NegotiationStatus::Pending | NegotiationStatus::OfferSent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NegotiationStatus::Pending => "pending",
            NegotiationStatus::OfferSent => "offer_sent",
            NegotiationStatus::Restructured => "restructured",
            NegotiationStatus::Rejected => "rejected",
        }
    }
}

/// Events that move a negotiation between statuses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    OfferSent,
    Accepted,
}

impl NegotiationStatus {
    /// Next status after `event`, or `None` when the status is terminal.
    ///
    /// No event leads to `Rejected`.
    pub fn on(&self, event: StatusEvent) -> Option<NegotiationStatus> {
        match (self, event) {
            (NegotiationStatus::Restructured, _) => None,
            (_, StatusEvent::OfferSent) => Some(NegotiationStatus::OfferSent),
            (_, StatusEvent::Accepted) => Some(NegotiationStatus::Restructured),
        }
    }
}

impl Default for NegotiationStatus {
    fn default() -> Self {
        NegotiationStatus::Pending
    }
}

impl fmt::Display for NegotiationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a chat message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    Agent,
    Borrower,
}

/// One entry of a borrower conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub message: String,
    pub timestamp: SystemTime,
}

impl ChatMessage {
    pub fn agent(message: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Agent,
            message: message.into(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn borrower(message: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Borrower,
            message: message.into(),
            timestamp: SystemTime::now(),
        }
    }
}

/// Entry of the store-wide negotiation log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub message: String,
}

/// Rationale behind an autonomous or adaptive agent decision
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub user_id: UserId,
    pub offer: u64,
    pub expiry: u32,
    pub reason: String,
    pub timestamp: SystemTime,
}

/// Negotiation state for a single borrower
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationRecord {
    pub user_id: UserId,
    pub name: String,
    pub wallet: u64,
    pub missed_amount: u64,
    pub offer_amount: u64,
    pub expiry_days: u32,
    pub status: NegotiationStatus,
    pub started_at: Option<SystemTime>,
    pub accepted_at: Option<SystemTime>,
    pub last_message: Option<String>,
    pub chat_history: Vec<ChatMessage>,
    /// Set once `offer_amount` has been added to the recovered total
    pub(crate) counted: bool,
}

impl NegotiationRecord {
    /// Whether this record's offer is already part of the recovered total
    pub fn is_counted(&self) -> bool {
        self.counted
    }

    /// `missed_amount / wallet`, or 1.0 when the wallet is empty
    pub fn burden_ratio(&self) -> f64 {
        if self.wallet == 0 {
            1.0
        } else {
            self.missed_amount as f64 / self.wallet as f64
        }
    }
}

/// Values for creating a record; unset fields fall back to configured defaults
#[derive(Clone, Debug, Default)]
pub struct BorrowerSeed {
    pub name: Option<String>,
    pub wallet: Option<u64>,
    pub missed_amount: Option<u64>,
    pub offer_amount: Option<u64>,
    pub expiry_days: Option<u32>,
}

impl BorrowerSeed {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn wallet(mut self, wallet: u64) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn missed_amount(mut self, missed_amount: u64) -> Self {
        self.missed_amount = Some(missed_amount);
        self
    }

    pub fn offer_amount(mut self, offer_amount: u64) -> Self {
        self.offer_amount = Some(offer_amount);
        self
    }

    pub fn expiry_days(mut self, expiry_days: u32) -> Self {
        self.expiry_days = Some(expiry_days);
        self
    }
}

/// Optional overrides for `start_negotiation`
#[derive(Clone, Debug, Default)]
pub struct OfferRequest {
    pub offer_amount: Option<u64>,
    pub expiry_days: Option<u32>,
    pub message: Option<String>,
    pub rationale: Option<String>,
}
