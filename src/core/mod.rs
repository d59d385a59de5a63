pub mod error;
pub mod runner;

pub use error::ProbeError;
pub use runner::{ExampleRunner, ReceiptPolicy, RunOutcome, COMPLETION_MARKER};
