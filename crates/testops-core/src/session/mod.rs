//! Session domain module.
//!
//! This module contains all session-related domain models, the active
//! cursor, change events and the `SessionManager` that owns them.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionPurpose`, `SessionSummary`)
//! - `message`: Conversation message types (`MessageRole`, `Message`)
//! - `cursor`: Active session pointer and working message list (`ActiveCursor`)
//! - `event`: Change notifications (`SessionEvent`)
//! - `manager`: Session lifecycle and persistence (`SessionManager`)
//!
//! # Usage
//!
//! ```ignore
//! use testops_core::session::{SessionManager, SessionPurpose, MessageRole};
//!
//! let mut manager = SessionManager::new(store, ids);
//! manager.hydrate();
//! manager.create(SessionPurpose::Ui)?;
//! manager.append_message(MessageRole::User, "test login")?;
//! ```

mod cursor;
mod event;
mod manager;
mod message;
mod model;

pub use cursor::ActiveCursor;
pub use event::{SessionEvent, SessionListener};
pub use manager::{BootstrapReason, HydrationOutcome, SessionManager};
pub use message::{Message, MessageRole};
pub use model::{Session, SessionPurpose, SessionSummary};
