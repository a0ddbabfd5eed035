//! tally-classify: chat-completion categorization with keyword fallback

pub mod prompt;
pub mod remote;

pub use prompt::{match_category, ReplyMatch};
pub use remote::{RemoteClassifier, RemoteConfig};
