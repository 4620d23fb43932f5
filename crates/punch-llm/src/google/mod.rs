//! Gemini `generateContent` suggester.
//!
//! `provider` holds the HTTP client; `types` the wire format.

pub mod provider;
pub mod types;

pub use provider::GeminiSuggester;
pub use types::GeminiConfig;
