//! Access control gate
//!
//! Owner plus snapshot-creation whitelist. The owner administers the
//! whitelist and configuration; whitelisted principals may trigger
//! snapshots. Held by composition, not inheritance: the snapshot manager
//! keeps an `AccessControl` value and consults it on every gated call.

pub mod error;
pub mod gate;

pub use error::{AccessError, Result};
pub use gate::AccessControl;
