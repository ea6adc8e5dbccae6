//! Domain layer: backend selection, the log record, and worker lifecycle.
//!
//! These types carry no I/O. The persistence layer maps [`LogRecord`]s onto
//! each backend's storage and the service layer drives [`WorkerState`].

pub mod backend_kind;
pub mod log_record;
pub mod worker_state;

pub use backend_kind::BackendKind;
pub use log_record::LogRecord;
pub use worker_state::WorkerState;
