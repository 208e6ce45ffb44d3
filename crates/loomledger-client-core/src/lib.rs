//! Platform-free client core for the LoomLedger dashboard pages.
//!
//! Every browser-facing behaviour of the web shell is modelled here as plain
//! Rust state behind small traits (`KeyValueStore`, `Navigator`,
//! `HttpTransport`), so the WASM shell only moves values between these types
//! and the DOM.

pub mod config;
pub mod confirm;
pub mod error;
pub mod http;
pub mod nav;
pub mod notifications;
pub mod preferences;
pub mod search;
pub mod session;
pub mod storage;
pub mod toast;

pub use config::{ClientConfig, ConfigError};
pub use confirm::{ConfirmDialog, ConfirmError, ConfirmFailure, ConfirmOptions, ConfirmOutcome};
pub use error::{ApiError, ApiErrorKind};
pub use http::{ApiClient, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use notifications::{Notification, PollGate, PollLease};
pub use preferences::{SidebarState, Theme, UiPreferences};
pub use search::{SearchInput, SearchPanel, SearchPolicy, SearchResult, SearchSession, SearchTicket};
pub use session::{Navigator, SessionStore};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use toast::{ToastKind, ToastSpec};
