//! Read-only snapshot of the negotiation store for display

use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::types::{DecisionRecord, LogEntry, NegotiationRecord, NegotiationStatus};

/// Aggregated view consumed by the dashboard layer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiationSummary {
    pub total_recovered: u64,
    /// Count per status; every status is present, zero when unseen
    pub counts: BTreeMap<NegotiationStatus, usize>,
    pub negotiations: HashMap<UserId, NegotiationRecord>,
    pub log: Vec<LogEntry>,
    pub decisions: Vec<DecisionRecord>,
}

impl NegotiationSummary {
    pub fn count(&self, status: NegotiationStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Total number of borrowers tracked
    pub fn total_borrowers(&self) -> usize {
        self.negotiations.len()
    }
}

/// Tally statuses, pre-filling all known statuses with zero
pub(crate) fn count_statuses<'a>(
    records: impl Iterator<Item = &'a NegotiationRecord>,
) -> BTreeMap<NegotiationStatus, usize> {
    let mut counts: BTreeMap<NegotiationStatus, usize> =
        NegotiationStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for record in records {
        *counts.entry(record.status).or_insert(0) += 1;
    }
    counts
}
