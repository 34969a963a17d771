//! Per-session negotiation stores
//!
//! Each UI session owns its own `NegotiationEngine`. Engines sit behind an
//! async mutex so concurrent requests against one session are serialized.

use crate::config::NegotiationConfig;
use crate::error::{AuraError, Result};
use crate::negotiation::NegotiationEngine;
use crate::types::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedEngine = Arc<Mutex<NegotiationEngine>>;

/// Registry of open sessions keyed by session ID
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SharedEngine>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session seeded with the demo borrowers
    pub async fn open(&self, config: NegotiationConfig) -> SessionId {
        let session_id = SessionId::generate();
        let engine = NegotiationEngine::with_demo_borrowers(config);

        self.sessions
            .lock()
            .await
            .insert(session_id.clone(), Arc::new(Mutex::new(engine)));

        tracing::info!("Opened negotiation session {}", session_id);
        session_id
    }

    pub async fn get(&self, session_id: &SessionId) -> Result<SharedEngine> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| AuraError::SessionNotFound(session_id.0.clone()))
    }

    /// Close a session, discarding its state. Returns whether it existed.
    pub async fn close(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.lock().await.remove(session_id).is_some();
        if removed {
            tracing::info!("Closed negotiation session {}", session_id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::{NegotiationStatus, OfferRequest};

    #[tokio::test]
    async fn test_open_and_get() {
        let registry = SessionRegistry::new();
        let session_id = registry.open(NegotiationConfig::default()).await;

        let engine = registry.get(&session_id).await.unwrap();
        assert_eq!(engine.lock().await.negotiations().len(), 4);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.open(NegotiationConfig::default()).await;
        let b = registry.open(NegotiationConfig::default()).await;

        {
            let engine = registry.get(&a).await.unwrap();
            let mut engine = engine.lock().await;
            engine.start_negotiation("USR1001", OfferRequest::default());
            engine.accept_offer("USR1001").unwrap();
        }

        let engine_b = registry.get(&b).await.unwrap();
        let engine_b = engine_b.lock().await;
        assert_eq!(engine_b.funds_recovered(), 0);
        assert_eq!(
            engine_b.record("USR1001").unwrap().status,
            NegotiationStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_close_session() {
        let registry = SessionRegistry::new();
        let session_id = registry.open(NegotiationConfig::default()).await;

        assert!(registry.close(&session_id).await);
        assert!(!registry.close(&session_id).await);
        assert!(registry.is_empty().await);
        assert!(matches!(
            registry.get(&session_id).await,
            Err(AuraError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_accepts_count_once() {
        let registry = SessionRegistry::new();
        let session_id = registry.open(NegotiationConfig::default()).await;
        let engine = registry.get(&session_id).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                let mut engine = engine.lock().await;
                let offer = engine.accept_offer("USR1001").map(|r| r.offer_amount);
                offer
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 500);
        }

        assert_eq!(engine.lock().await.funds_recovered(), 500);
    }
}
