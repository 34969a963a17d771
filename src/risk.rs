//! Risk assessments supplied by the external scoring model

use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default-probability bands used by the lender dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    HighRisk,
    AtRisk,
    Healthy,
}

impl RiskTier {
    pub fn classify(probability: f64) -> Self {
        if probability > 0.45 {
            RiskTier::HighRisk
        } else if probability > 0.25 {
            RiskTier::AtRisk
        } else {
            RiskTier::Healthy
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTier::HighRisk => "High Risk - Defaulted",
            RiskTier::AtRisk => "At Risk",
            RiskTier::Healthy => "Active & Healthy",
        };
        f.write_str(label)
    }
}

/// Output of the scoring model for one borrower
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub user_id: UserId,
    /// Predicted default probability in `[0, 1]`
    pub probability: f64,
    pub risk_factors: Vec<String>,
}

impl RiskAssessment {
    pub fn tier(&self) -> RiskTier {
        RiskTier::classify(self.probability)
    }
}
