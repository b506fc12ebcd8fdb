//! Run phases, logged on every transition.

use tracing::info;

/// Where a sync run currently is
///
/// `Idle -> Fetching -> Normalizing -> Diffing -> (Skip | Reconciling) -> (Done | Failed)`,
/// where reconciling walks `DeletingPolicy -> DeletingLists -> CreatingLists -> UpsertingPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Normalizing,
    Diffing,
    Skip,
    DeletingPolicy,
    DeletingLists,
    CreatingLists,
    UpsertingPolicy,
    Done,
    Failed,
}

impl Phase {
    /// Log entry into this phase
    pub fn enter(self) {
        info!(phase = %self, "Entering phase");
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Normalizing => "normalizing",
            Self::Diffing => "diffing",
            Self::Skip => "skip",
            Self::DeletingPolicy => "deleting-policy",
            Self::DeletingLists => "deleting-lists",
            Self::CreatingLists => "creating-lists",
            Self::UpsertingPolicy => "upserting-policy",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
