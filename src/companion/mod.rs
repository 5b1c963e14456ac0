//! The chat companion: mood detection, reply selection and prompts.
//!
//! Nothing in this module can fail. [`mood::classify_mood`] is a pure keyword
//! scan and [`responses::ResponseSelector`] always produces a reply.

pub mod mood;
pub mod prompts;
pub mod responses;

pub use mood::classify_mood;
pub use responses::{Reply, ReplyKind, ResponseSelector};
