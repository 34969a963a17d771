//! Negotiation module: settlement offers, acceptance and counter-offers

pub mod counter;
pub mod engine;
pub mod policy;
pub mod summary;
pub mod types;

pub use counter::{parse_amount, CounterDecision, CounterOutcome, CounterReply};
pub use engine::{demo_borrowers, NegotiationEngine};
pub use policy::{decide_offer, BurdenTier, OfferDecision, OfferPolicy};
pub use summary::NegotiationSummary;
pub use types::{
    BorrowerSeed, ChatMessage, ChatRole, DecisionRecord, LogEntry, NegotiationRecord,
    NegotiationStatus, OfferRequest, StatusEvent,
};
