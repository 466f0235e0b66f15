//! Chrome DevTools Protocol transport.
//!
//! Attaches to an already-running Chromium instance (a remote sandbox browser
//! or a locally started one with `--remote-debugging-port`) and exposes the
//! page operations the extraction engine consumes: navigation, DOM queries,
//! clicks, key presses, scrolling, and script evaluation.

pub mod client;
pub mod error;
pub mod protocol;
pub mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use session::PageSession;
