//! # punch-llm
//!
//! Task suggestion gateway.
//!
//! - **Contract**: [`SuggestTasks`] turns a trade name into a list of
//!   suggested task texts, or an error. Failures are never flattened into an
//!   empty list.
//! - **Gemini**: [`google::GeminiSuggester`] issues one `generateContent`
//!   call with a JSON array response schema and parses the first candidate.
//! - **Unconfigured**: [`UnconfiguredSuggester`] stands in when no API key is
//!   available and always fails with [`SuggestionError::NotConfigured`].
//!
//! ## Crate Position
//!
//! Depends on nothing internal. Depended on by punch-runtime and punch-app.

#![deny(unsafe_code)]

pub mod errors;
pub mod google;
pub mod suggester;

pub use errors::SuggestionError;
pub use suggester::{SuggestTasks, UnconfiguredSuggester, suggestion_prompt};
