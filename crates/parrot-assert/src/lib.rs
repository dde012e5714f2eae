pub mod assertions;
pub mod snapshot;

pub use assertions::CallAssertions;
pub use snapshot::{CallSnapshot, HistorySnapshot, SnapshotError};
