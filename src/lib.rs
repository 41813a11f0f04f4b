//! toxilens — client for a YouTube comment toxicity-analysis backend.
//!
//! ## Flow
//! 1. [`client::ToxiClient::start_analysis`] launches a job and returns a
//!    [`session::Session`] with a server-assigned id
//! 2. [`session::attach`] opens the per-session WebSocket progress channel
//!    and streams events into caller-supplied callbacks
//! 3. On completion, [`digest::aggregate`] merges main-comment and reply
//!    classifications into a ranked toxic-item digest
//! 4. [`categories::map_categories`] resolves raw category flags to display
//!    names with severity tiers

pub mod categories;
pub mod cli;
pub mod client;
pub mod digest;
pub mod error;
pub mod history;
pub mod protocol;
pub mod session;

pub use categories::{map_categories, Severity, ToxicCategory};
pub use client::{ClientConfig, ToxiClient};
pub use digest::{aggregate, ToxicDigest};
pub use error::ToxiError;
pub use protocol::{AnalysisRequest, AnalysisResult, ChannelEvent, CommentRecord};
pub use session::{attach, ProgressHandle, Session, SessionStatus};
