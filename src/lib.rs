//! AURA Negotiation Engine
//!
//! In-memory settlement negotiation for borrowers who missed a payment:
//! - Offer policy sizing the settlement ask and grace window
//! - Idempotent acceptance with recovered-funds accounting
//! - Free-text counter-offer handling
//! - Per-session stores behind async locks for concurrent callers

pub mod cli;
pub mod config;
pub mod error;
pub mod negotiation;
pub mod risk;
pub mod types;

// Re-export commonly used types
pub use config::NegotiationConfig;
pub use error::{AuraError, Result};
pub use negotiation::{
    decide_offer, CounterOutcome, CounterReply, NegotiationEngine, NegotiationRecord,
    NegotiationStatus, NegotiationSummary, OfferDecision, OfferRequest,
};
pub use risk::{RiskAssessment, RiskTier};
pub use types::{SessionId, UserId};
