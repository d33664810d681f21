//! Chat history persistence
//!
//! - [`types`]: the persisted data model ([`ChatSession`], [`Message`])
//! - [`store`]: [`SessionStore`], read-all / append / delete over one blob
//! - [`summary`]: listing rows and relative date labels for history views

pub mod store;
pub mod summary;
pub mod types;

pub use store::{ErrorPolicy, SaveOutcome, SessionStore, DEFAULT_HISTORY_KEY};
pub use summary::{format_session_date, summarize, SessionSummary};
pub use types::{display_time_now, new_session_id, ChatSession, Message, Role};
