//! Configuration for the negotiation engine
//!
//! Seed defaults and policy constants. Loaded from a JSON file when one is
//! given, otherwise the defaults below apply.

use crate::error::{AuraError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults used when a borrower record is created without explicit values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedDefaults {
    pub name: String,
    pub wallet: u64,
    pub missed_amount: u64,
    pub offer_amount: u64,
    pub expiry_days: u32,
}

impl Default for SeedDefaults {
    fn default() -> Self {
        Self {
            name: "Gulam".to_string(),
            wallet: 2000,
            missed_amount: 2000,
            offer_amount: 500,
            expiry_days: 7,
        }
    }
}

/// Constants driving the offer policy and counter-offer handling
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Minimum meaningful ask
    pub offer_floor: u64,
    /// Share of the missed amount targeted for partial recovery
    pub recovery_fraction: f64,
    /// Ratios above this get the long window
    pub high_burden_ratio: f64,
    /// Ratios above this (and at or below `high_burden_ratio`) get the middle window
    pub moderate_burden_ratio: f64,
    pub high_burden_days: u32,
    pub moderate_burden_days: u32,
    pub low_burden_days: u32,
    /// Absolute floor for an acceptable counter-offer
    pub counter_floor: u64,
    /// Share of the current offer a counter-offer must reach
    pub counter_fraction: f64,
    /// Borrowers below this wallet are skipped by auto-negotiation
    pub auto_wallet_floor: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            offer_floor: 250,
            recovery_fraction: 0.25,
            high_burden_ratio: 1.2,
            moderate_burden_ratio: 0.8,
            high_burden_days: 14,
            moderate_burden_days: 10,
            low_burden_days: 7,
            counter_floor: 200,
            counter_fraction: 0.5,
            auto_wallet_floor: 300,
        }
    }
}

/// Top-level engine configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    pub seed: SeedDefaults,
    pub policy: PolicyConfig,
}

impl NegotiationConfig {
    /// Load configuration from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!("Loaded negotiation config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let policy = &self.policy;

        if self.seed.expiry_days == 0 {
            return Err(AuraError::InvalidConfig(
                "seed.expiry_days must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&policy.recovery_fraction) {
            return Err(AuraError::InvalidConfig(format!(
                "policy.recovery_fraction must be within [0, 1], got {}",
                policy.recovery_fraction
            )));
        }
        if !(0.0..=1.0).contains(&policy.counter_fraction) {
            return Err(AuraError::InvalidConfig(format!(
                "policy.counter_fraction must be within [0, 1], got {}",
                policy.counter_fraction
            )));
        }
        if policy.moderate_burden_ratio > policy.high_burden_ratio {
            return Err(AuraError::InvalidConfig(format!(
                "policy.moderate_burden_ratio ({}) exceeds policy.high_burden_ratio ({})",
                policy.moderate_burden_ratio, policy.high_burden_ratio
            )));
        }
        if policy.high_burden_days == 0
            || policy.moderate_burden_days == 0
            || policy.low_burden_days == 0
        {
            return Err(AuraError::InvalidConfig(
                "expiry windows must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
