// ── Resource reconciliation ──
//
// One reconciler per resource kind, each exposing the lifecycle the
// calling engine drives: create, read, update, delete, import. The
// reconcilers mutate flat attribute bags in place; the engine owns
// diffing and persistence.

pub mod app;
pub mod record;
pub mod zone;

pub use app::{AppConfigReconciler, AppConfigState, AppReconciler, AppState, InstallMethod};
pub use record::RecordReconciler;
pub use zone::{ZoneReconciler, ZoneState};

/// What a read learned about a tracked instance.
///
/// `Gone` means the instance vanished remotely; the engine reacts by
/// dropping it from tracked state, so it is a signal, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Found,
    Gone,
}

impl ReadOutcome {
    #[must_use]
    pub fn is_gone(self) -> bool {
        matches!(self, Self::Gone)
    }
}
