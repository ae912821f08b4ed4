//! HTTP clients for the Balance pipeline's external collaborators.
//!
//! Implements the `balance-core` gateway traits against JSON services: the
//! mail gateway (search + fetch + send) and an OpenAI-compatible
//! chat-completions endpoint for merchant classification. The wire protocols
//! live entirely in this crate; the workers only see the traits.

pub mod categorize;
pub mod error;
pub mod mailbox;
pub mod notify;

pub use categorize::ChatCategorizer;
pub use error::{Error, Result};
pub use mailbox::HttpMailbox;
pub use notify::HttpNotifier;
