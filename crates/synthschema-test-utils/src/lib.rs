//! Test helpers shared across synthschema crates.

pub mod author;
pub mod llm;

pub use author::{CountingAuthor, FailingAuthor, FixedAuthor, ScriptedAuthor};
pub use llm::{FailingLLM, FixedChatResponse, FixedLLM, RecordingChatLLM};
