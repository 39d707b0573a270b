//! Per-run plumbing shared by the restore and post phases

pub mod outputs;
pub mod state;

pub use outputs::{names, OutputSink};
pub use state::{PendingSave, PendingSaves};
