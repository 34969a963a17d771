//! Core identifier types used throughout AURA

use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Borrower identifier (e.g. `USR1001`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one UI session owning its own negotiation store
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh session ID from random bytes
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut nonce = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::from_seed(&nonce)
    }

    /// Derive a session ID from arbitrary seed bytes
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(seed);
        let result = hasher.finalize();
        Self(hex::encode(&result[..16])) // Use first 16 bytes
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
