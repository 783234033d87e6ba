/*
[INPUT]:  Public API exports for kana-perps-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod dashboard;
pub mod desk;
pub mod error;
pub mod quantity;
pub mod refresh;
pub mod state_machine;
pub mod workflow;

// Re-export main types for convenience
pub use config::{ConfigError, ConsoleConfig};
pub use dashboard::Dashboard;
pub use desk::TradeDesk;
pub use error::{ErrorKind, SubmissionError, ValidationFailure};
pub use quantity::{OrderForm, TransferAmount};
pub use refresh::{RefreshCallback, RefreshHandle, RefreshScheduler};
pub use state_machine::{StateError, TransactionStateMachine, WorkflowState};
pub use workflow::{
    Collaborators, IntentKind, Notification, SettledTransaction, Submission, TransactionIntent,
    TransactionWorkflow, WorkflowSettings,
};
