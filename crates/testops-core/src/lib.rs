//! Core domain of the TestOps session manager.
//!
//! Sessions, their messages and pipeline progress, the active-session
//! cursor, and the persistence contract they share with the key/value store.

pub mod config;
pub mod error;
pub mod id;
pub mod session;
pub mod storage;
pub mod theme;
pub mod workflow;

pub use config::AppConfig;
// Re-export common error type
pub use error::{Result, TestOpsError};
pub use id::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use session::{Message, MessageRole, Session, SessionManager, SessionPurpose};
pub use storage::{KeyValueStore, KeyValueStoreExt};
pub use workflow::{WorkflowData, WorkflowStage, WorkflowTransitions};
