//! The suggestion contract and the fixed prompt.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::SuggestionError;

/// Number of tasks the prompt asks for.
pub const SUGGESTION_COUNT: usize = 5;

/// Something that can propose tasks for a trade.
#[async_trait]
pub trait SuggestTasks: Send + Sync {
    /// Suggest task texts for `trade`. Never returns an empty list on success.
    async fn suggest_tasks(&self, trade: &str) -> Result<Vec<String>, SuggestionError>;
}

/// Prompt sent for a trade.
#[must_use]
pub fn suggestion_prompt(trade: &str) -> String {
    format!(
        "List exactly {SUGGESTION_COUNT} common construction tasks for the {trade} trade \
         in a residential unit. Respond only with a JSON array of strings, one short \
         task description per element."
    )
}

/// Suggester used when no API key is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredSuggester;

#[async_trait]
impl SuggestTasks for UnconfiguredSuggester {
    async fn suggest_tasks(&self, trade: &str) -> Result<Vec<String>, SuggestionError> {
        debug!(trade, "suggestion requested without an API key");
        Err(SuggestionError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn prompt_names_trade_and_count() {
        let prompt = suggestion_prompt("Plumbing");
        assert!(prompt.contains("Plumbing"));
        assert!(prompt.contains("exactly 5"));
        assert!(prompt.contains("JSON array of strings"));
    }

    #[tokio::test]
    async fn unconfigured_always_fails() {
        let err = UnconfiguredSuggester.suggest_tasks("Drywall").await.unwrap_err();
        assert_matches!(err, SuggestionError::NotConfigured);
    }
}
