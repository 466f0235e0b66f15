//! CDP page session for interacting with a single page.
//!
//! Split by concern: command dispatch in [`core`], navigation and waits in
//! [`navigation`], DOM queries in [`dom`], mouse/keyboard in [`input`],
//! script evaluation in [`js`].

mod core;
mod dom;
mod input;
mod js;
mod navigation;

pub use self::core::PageSession;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
