//! Gemini suggester implementing [`SuggestTasks`].
//!
//! One POST per request, API key in the `x-goog-api-key` header. No retry
//! and no client-side timeout; every failure is returned to the caller.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error, instrument};

use crate::errors::SuggestionError;
use crate::suggester::{SuggestTasks, suggestion_prompt};

use super::types::{
    DEFAULT_BASE_URL, GeminiConfig, GeminiContent, GeminiPart, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, ResponseSchema,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini-backed task suggester.
pub struct GeminiSuggester {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiSuggester {
    /// Create a new suggester.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!(
            "{base_url}/v1beta/models/{}:generateContent",
            self.config.model
        )
    }

    fn build_headers(&self) -> Result<HeaderMap, SuggestionError> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|e| SuggestionError::InvalidApiKey(e.to_string()))?;
        let _ = headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    fn build_request(trade: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![GeminiContent {
                role: Some("user".into()),
                parts: vec![GeminiPart {
                    text: Some(suggestion_prompt(trade)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: ResponseSchema::string_array(),
            },
        }
    }
}

/// Decode the model's text part: a JSON array of task strings.
///
/// Elements are trimmed and blank elements dropped; an array with nothing
/// left is [`SuggestionError::EmptySuggestions`].
pub fn parse_task_list(text: &str) -> Result<Vec<String>, SuggestionError> {
    let raw: Vec<String> = serde_json::from_str(text.trim()).map_err(|e| {
        SuggestionError::MalformedResponse(format!("expected a JSON array of strings: {e}"))
    })?;
    let tasks: Vec<String> = raw
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tasks.is_empty() {
        return Err(SuggestionError::EmptySuggestions);
    }
    Ok(tasks)
}

/// Extract a human-readable message from an error body.
fn parse_api_error(body: &str, status: u16) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| format!("HTTP {status}: {body}"))
}

#[async_trait]
impl SuggestTasks for GeminiSuggester {
    #[instrument(skip_all, fields(provider = "gemini", model = %self.config.model, trade = %trade))]
    async fn suggest_tasks(&self, trade: &str) -> Result<Vec<String>, SuggestionError> {
        let url = self.endpoint();
        let headers = self.build_headers()?;
        let request = Self::build_request(trade);

        debug!(%url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = parse_api_error(&body_text, status.as_u16());
            error!(status = status.as_u16(), %message, "Gemini API error");
            return Err(SuggestionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            SuggestionError::MalformedResponse(format!("undecodable response body: {e}"))
        })?;
        let text = body.first_text().ok_or_else(|| {
            SuggestionError::MalformedResponse("missing candidates[0].content.parts[0].text".into())
        })?;

        let tasks = parse_task_list(text)?;
        debug!(count = tasks.len(), "suggestions received");
        Ok(tasks)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config(base_url: Option<String>) -> GeminiConfig {
        GeminiConfig {
            model: "gemini-2.0-flash".into(),
            api_key: "test-key".into(),
            base_url,
        }
    }

    fn candidate_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    async fn server_returning(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    // ── Request building ────────────────────────────────────────────────

    #[test]
    fn endpoint_uses_model_and_trims_slash() {
        let suggester = GeminiSuggester::new(test_config(Some("http://x/".into())));
        assert_eq!(
            suggester.endpoint(),
            "http://x/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn endpoint_defaults_to_public_api() {
        let suggester = GeminiSuggester::new(test_config(None));
        assert!(suggester.endpoint().starts_with(DEFAULT_BASE_URL));
    }

    #[test]
    fn headers_carry_api_key() {
        let suggester = GeminiSuggester::new(test_config(None));
        let headers = suggester.build_headers().unwrap();
        assert_eq!(headers[API_KEY_HEADER], "test-key");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn headers_reject_unsendable_key() {
        let mut config = test_config(None);
        config.api_key = "bad\nkey".into();
        let suggester = GeminiSuggester::new(config);
        assert_matches!(
            suggester.build_headers(),
            Err(SuggestionError::InvalidApiKey(_))
        );
    }

    #[test]
    fn request_body_shape() {
        let value = serde_json::to_value(GeminiSuggester::build_request("Painting")).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        let prompt = value["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Painting"));
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            value["generationConfig"]["responseSchema"],
            json!({"type": "ARRAY", "items": {"type": "STRING"}})
        );
    }

    // ── Parsing ─────────────────────────────────────────────────────────

    #[test]
    fn parse_task_list_accepts_string_array() {
        let tasks = parse_task_list(r#"["Install conduit", " Label breakers "]"#).unwrap();
        assert_eq!(tasks, vec!["Install conduit", "Label breakers"]);
    }

    #[test]
    fn parse_task_list_rejects_non_array() {
        assert_matches!(
            parse_task_list(r#"{"tasks": []}"#),
            Err(SuggestionError::MalformedResponse(_))
        );
        assert_matches!(
            parse_task_list("not json"),
            Err(SuggestionError::MalformedResponse(_))
        );
        assert_matches!(
            parse_task_list("[1, 2]"),
            Err(SuggestionError::MalformedResponse(_))
        );
    }

    #[test]
    fn parse_task_list_empty_is_error() {
        assert_matches!(parse_task_list("[]"), Err(SuggestionError::EmptySuggestions));
        assert_matches!(
            parse_task_list(r#"["  ", ""]"#),
            Err(SuggestionError::EmptySuggestions)
        );
    }

    #[test]
    fn parse_api_error_prefers_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(parse_api_error(body, 400), "API key not valid");
        assert_eq!(parse_api_error("boom", 502), "HTTP 502: boom");
    }

    // ── HTTP (mock server) ──────────────────────────────────────────────

    #[tokio::test]
    async fn suggest_tasks_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body(r#"["Rough-in wiring","Install conduit"]"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let suggester = GeminiSuggester::new(test_config(Some(server.uri())));
        let tasks = suggester.suggest_tasks("Electrical").await.unwrap();
        assert_eq!(tasks, vec!["Rough-in wiring", "Install conduit"]);
    }

    #[tokio::test]
    async fn suggest_tasks_non_success_status() {
        let server = server_returning(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "Permission denied"}
        })))
        .await;

        let suggester = GeminiSuggester::new(test_config(Some(server.uri())));
        let err = suggester.suggest_tasks("Plumbing").await.unwrap_err();
        assert_matches!(err, SuggestionError::Api { status: 403, message } if message == "Permission denied");
    }

    #[tokio::test]
    async fn suggest_tasks_missing_candidates() {
        let server = server_returning(ResponseTemplate::new(200).set_body_json(json!({}))).await;
        let suggester = GeminiSuggester::new(test_config(Some(server.uri())));
        assert_matches!(
            suggester.suggest_tasks("Drywall").await,
            Err(SuggestionError::MalformedResponse(_))
        );
    }

    #[tokio::test]
    async fn suggest_tasks_text_not_json() {
        let server = server_returning(
            ResponseTemplate::new(200).set_body_json(candidate_body("Sure! Here are tasks")),
        )
        .await;
        let suggester = GeminiSuggester::new(test_config(Some(server.uri())));
        assert_matches!(
            suggester.suggest_tasks("Flooring").await,
            Err(SuggestionError::MalformedResponse(_))
        );
    }

    #[tokio::test]
    async fn suggest_tasks_empty_array() {
        let server =
            server_returning(ResponseTemplate::new(200).set_body_json(candidate_body("[]"))).await;
        let suggester = GeminiSuggester::new(test_config(Some(server.uri())));
        assert_matches!(
            suggester.suggest_tasks("Painting").await,
            Err(SuggestionError::EmptySuggestions)
        );
    }

    #[tokio::test]
    async fn suggest_tasks_body_not_json() {
        let server =
            server_returning(ResponseTemplate::new(200).set_body_string("<html>")).await;
        let suggester = GeminiSuggester::new(test_config(Some(server.uri())));
        assert_matches!(
            suggester.suggest_tasks("Painting").await,
            Err(SuggestionError::MalformedResponse(_))
        );
    }

    #[tokio::test]
    async fn suggest_tasks_unreachable_host() {
        let suggester =
            GeminiSuggester::new(test_config(Some("http://127.0.0.1:9".into())));
        assert_matches!(
            suggester.suggest_tasks("Painting").await,
            Err(SuggestionError::Http(_))
        );
    }
}
