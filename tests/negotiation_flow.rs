//! End-to-end negotiation flows through the public API

use aura::negotiation::{BorrowerSeed, CounterOutcome, NegotiationEngine, OfferRequest};
use aura::{decide_offer, AuraError, NegotiationConfig, NegotiationStatus};

fn seeded(user_id: &str, seed: BorrowerSeed) -> NegotiationEngine {
    let mut engine = NegotiationEngine::new();
    engine.ensure_borrower(user_id, seed);
    engine
}

#[test]
fn test_offer_accept_and_repeat_accept() {
    let mut engine = seeded(
        "USR1001",
        BorrowerSeed::default()
            .wallet(2000)
            .missed_amount(2000)
            .offer_amount(500)
            .expiry_days(7),
    );

    let record = engine.start_negotiation("USR1001", OfferRequest::default());
    assert_eq!(record.status, NegotiationStatus::OfferSent);
    assert_eq!(record.offer_amount, 500);

    let record = engine.accept_offer("USR1001").unwrap().clone();
    assert_eq!(record.status, NegotiationStatus::Restructured);
    assert!(record.is_counted());
    assert_eq!(engine.funds_recovered(), 500);

    let again = engine.accept_offer("USR1001").unwrap().clone();
    assert_eq!(engine.funds_recovered(), 500);
    assert_eq!(again.accepted_at, record.accepted_at);

    let summary = engine.summary();
    assert_eq!(summary.total_recovered, 500);
    assert_eq!(summary.count(NegotiationStatus::Restructured), 1);
    assert!(summary.log.len() >= 3);
}

#[test]
fn test_multiple_borrowers_sum_once() {
    let mut engine = NegotiationEngine::new();
    for (user_id, offer) in [("USR1001", 500), ("USR1002", 750), ("USR1003", 1000)] {
        engine.ensure_borrower(user_id, BorrowerSeed::default());
        engine.start_negotiation(
            user_id,
            OfferRequest {
                offer_amount: Some(offer),
                ..OfferRequest::default()
            },
        );
        engine.accept_offer(user_id).unwrap();
        engine.accept_offer(user_id).unwrap();
    }

    let summary = engine.summary();
    assert_eq!(summary.total_recovered, 2250);
    assert_eq!(summary.count(NegotiationStatus::Restructured), 3);
    assert_eq!(summary.negotiations.len(), 3);
}

#[test]
fn test_unknown_accept_is_an_error() {
    let mut engine = NegotiationEngine::new();
    assert!(matches!(
        engine.accept_offer("GHOST"),
        Err(AuraError::NegotiationNotFound(_))
    ));
}

#[test]
fn test_policy_floor_exceeds_small_wallet() {
    let engine = seeded(
        "USR5001",
        BorrowerSeed::default().wallet(100).missed_amount(1000),
    );
    let decision = decide_offer(engine.record("USR5001").unwrap());

    assert_eq!(decision.offer_amount, 250);
    assert_eq!(decision.expiry_days, 14);
}

#[test]
fn test_counter_offer_scenarios() {
    let config = NegotiationConfig::default();

    let mut adapt = NegotiationEngine::with_config(config.clone());
    adapt.start_negotiation("USR1001", OfferRequest::default());
    let reply = adapt.handle_counter_offer_text("USR1001", "I can only give 300");
    assert!(matches!(reply.outcome, CounterOutcome::Adapted { amount: 300, .. }));
    assert_eq!(adapt.funds_recovered(), 300);

    let mut reject = NegotiationEngine::with_config(config.clone());
    reject.start_negotiation("USR1001", OfferRequest::default());
    let reply = reject.handle_counter_offer_text("USR1001", "100");
    assert!(reply.reply.contains("250"));
    assert_eq!(
        reject.record("USR1001").unwrap().status,
        NegotiationStatus::OfferSent
    );
    assert_eq!(reject.funds_recovered(), 0);

    let mut accept = NegotiationEngine::with_config(config);
    accept.start_negotiation("USR1001", OfferRequest::default());
    accept.handle_counter_offer_text("USR1001", "600");
    assert_eq!(accept.record("USR1001").unwrap().offer_amount, 500);
    assert_eq!(accept.funds_recovered(), 500);
}

#[test]
fn test_auto_negotiate_then_summary_serializes() {
    let mut engine = NegotiationEngine::with_demo_borrowers(NegotiationConfig::default());

    // USR1003 has a 250 wallet and stays pending
    assert_eq!(engine.auto_negotiate_all(), 3);
    assert_eq!(
        engine.record("USR1003").unwrap().status,
        NegotiationStatus::Pending
    );
    assert_eq!(engine.decisions().len(), 3);

    let json = serde_json::to_value(engine.summary()).unwrap();
    assert_eq!(json["counts"]["offer_sent"], 3);
    assert_eq!(json["counts"]["pending"], 1);
    assert_eq!(json["counts"]["rejected"], 0);
    assert_eq!(json["negotiations"]["USR1003"]["status"], "pending");
}
