//! Notifier engine: state persistence, portal and relay IO, and the run orchestrator.
mod persist;
mod runner;
mod source;
mod store;
mod transport;
mod types;

pub use persist::{ensure_state_dir, parent_dir, AtomicFileWriter, PersistError};
pub use runner::{EnabledCategories, RunSettings, Runner, DEFAULT_LESSON_WINDOW_DAYS};
pub use source::{
    HttpPortalConnector, HttpPortalSource, PortalConnector, PortalCredentials, PortalSource,
};
pub use store::{StateStore, StoreError, DEFAULT_STATE_FILENAME};
pub use transport::{Transport, WebhookTransport};
pub use types::{
    DispatchError, DispatchFailure, HttpSettings, RunError, RunSummary, SourceError,
    SourceFailure,
};
