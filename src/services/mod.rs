// Hardware normalization and charts
pub mod memory;
pub mod hardware;
pub mod charts;

// Session and console flow
pub mod credential_file;
pub mod session_gate;
pub mod operations;
pub mod debounce;
pub mod forms;

// Re-export commonly used functions
pub use credential_file::{load_credentials, persist_credentials, random_session_id};
pub use session_gate::{DenyReason, GateDecision};
pub use operations::{run, ConsoleView, OperationArgs, OperationKey};
