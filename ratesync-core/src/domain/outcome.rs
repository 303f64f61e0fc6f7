//! Reconciliation outcomes

use serde::Serialize;

/// Reason attached to a record skipped because creation is disabled
pub const NOT_ADDED_BY_POLICY: &str = "not-added-by-policy";

/// Result of writing one record to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum ReconciliationOutcome {
    Updated,
    Created,
    Skipped(String),
    Failed(String),
}

impl ReconciliationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Created => "created",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// Outcome for one currency code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    pub code: String,
    #[serde(flatten)]
    pub outcome: ReconciliationOutcome,
}

/// Everything a reconciliation pass did, in feed order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub outcomes: Vec<RecordOutcome>,
    /// Codes that hit "not found" while creation was disabled
    pub skipped: Vec<String>,
}

impl ReconcileReport {
    pub fn push(&mut self, code: impl Into<String>, outcome: ReconciliationOutcome) {
        self.outcomes.push(RecordOutcome {
            code: code.into(),
            outcome,
        });
    }

    pub fn count(&self, label: &str) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.label() == label).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_failed()).count()
    }
}
