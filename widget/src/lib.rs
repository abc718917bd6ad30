//! Terminal host for the quick-capture notes widget.
//!
//! Wires `quicknote-core` to real I/O: ureq for HTTP, a JSON file for the
//! persisted settings, simplelog for diagnostics, and stdin/stdout for the UI.
//! The terminal has no always-on-top capability, so pinning only updates the
//! on-screen indicator.

pub mod app;
pub mod config;
pub mod logging;
pub mod store;
pub mod terminal;
pub mod transport;

pub use app::{run, Command};
pub use config::HostConfig;
pub use store::FileStore;
pub use terminal::TerminalView;
pub use transport::UreqTransport;
