//! The remote learning service client.
//!
//! One `reqwest`-backed client implements all three collaborator traits.
//! The service's responses are duck-shaped: payloads arrive either bare or
//! nested under a `data` key, and leaderboard rows may omit fields.
//! Everything is normalized here, at the boundary, into the strict core
//! types.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use examdeck_core::leaderboard::ParticipantScore;
use examdeck_core::model::TestDefinition;
use examdeck_core::submission::SubmissionRecord;
use examdeck_core::traits::{LeaderboardSource, SubmissionReceipt, SubmissionSink, TestSource};

use crate::config::ClientConfig;
use crate::error::ApiError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the remote learning service.
pub struct ApiClient {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        Self::with_timeout(base_url, api_token, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, api_token: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            client,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_timeout(
            &config.base_url,
            config.api_token.clone(),
            config.timeout_secs,
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(ApiError::NotFound(what.to_string()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status,
                message: parse_error_message(&body),
            });
        }

        let body = response.text().await.map_err(|e| ApiError::Http {
            status: 0,
            message: format!("failed to read response: {e}"),
        })?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Http {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })
    }
}

/// Strip the optional `data` envelope some endpoints wrap payloads in.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            match map.remove("data") {
                Some(Value::Null) | None => Value::Object(map),
                Some(inner) => inner,
            }
        }
        other => other,
    }
}

/// Pull a human-readable message out of an error body, whatever its shape.
fn parse_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

/// Loose leaderboard row as the service actually sends it.
#[derive(Debug, Deserialize)]
struct WireParticipant {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    correct_answers: Option<u32>,
    #[serde(default)]
    time_spent: Option<u64>,
}

#[async_trait]
impl TestSource for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_test(&self, test_id: &str) -> anyhow::Result<TestDefinition> {
        let url = format!("{}/tests/{}", self.base_url, test_id);
        let request = self.authorize(self.client.get(&url));
        let value = self
            .read_json(request, &format!("test '{test_id}'"))
            .await?;

        let test: TestDefinition = serde_json::from_value(unwrap_envelope(value))
            .map_err(|e| anyhow::anyhow!("malformed test definition for '{test_id}': {e}"))?;
        Ok(test)
    }
}

#[async_trait]
impl SubmissionSink for ApiClient {
    #[instrument(skip(self, record), fields(test = %record.test, user = %record.user))]
    async fn submit(&self, record: &SubmissionRecord) -> anyhow::Result<SubmissionReceipt> {
        let url = format!("{}/submissions", self.base_url);
        let request = self.authorize(self.client.post(&url)).json(record);
        let value = self.read_json(request, "submission endpoint").await?;

        if value.is_null() {
            return Ok(SubmissionReceipt::default());
        }

        let value = unwrap_envelope(value);
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let stored = serde_json::from_value::<SubmissionRecord>(value).ok();
        Ok(SubmissionReceipt { id, stored })
    }
}

#[async_trait]
impl LeaderboardSource for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_scores(&self, test_id: &str) -> anyhow::Result<Vec<ParticipantScore>> {
        let url = format!("{}/tests/{}/leaderboard", self.base_url, test_id);
        let request = self.authorize(self.client.get(&url));
        let value = self
            .read_json(request, &format!("leaderboard for test '{test_id}'"))
            .await?;

        let rows: Vec<WireParticipant> = serde_json::from_value(unwrap_envelope(value))
            .map_err(|e| anyhow::anyhow!("malformed leaderboard for '{test_id}': {e}"))?;

        let scores = rows
            .into_iter()
            .filter_map(|row| {
                let Some(user) = row.user else {
                    tracing::warn!("dropping leaderboard row without a user");
                    return None;
                };
                Some(ParticipantScore {
                    user,
                    // A missing score is a degraded record, not an error.
                    score: row.score.unwrap_or(0.0),
                    correct_answers: row.correct_answers,
                    time_spent: row.time_spent,
                })
            })
            .collect();

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_test_json() -> Value {
        serde_json::json!({
            "id": "algebra-basics",
            "name": "Algebra Basics",
            "subject": "math",
            "lesson": "linear-equations",
            "duration_secs": 600,
            "questions": [{
                "id": "q1",
                "text": "Solve x + 1 = 3",
                "options": [
                    {"id": "q1:a", "text": "1"},
                    {"id": "q1:b", "text": "2"}
                ],
                "correct_options": ["B"],
                "positive_mark": 1.0,
                "negative_mark": 0.5
            }]
        })
    }

    fn sample_record() -> SubmissionRecord {
        SubmissionRecord {
            id: None,
            user: "alice".into(),
            test: "algebra-basics".into(),
            subject: "math".into(),
            lesson: "linear-equations".into(),
            total_questions: 1,
            correct_answers: 1,
            wrong_answers: 0,
            skipped_questions: 0,
            score: 1.0,
            average_score: 100.0,
            time_spent: 42,
            submitted_at: Utc::now(),
            detailed_answers: vec![],
        }
    }

    #[tokio::test]
    async fn fetch_test_bare_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tests/algebra-basics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_test_json()))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let test = client.fetch_test("algebra-basics").await.unwrap();
        assert_eq!(test.id, "algebra-basics");
        assert_eq!(test.questions.len(), 1);
        assert_eq!(test.questions[0].correct_options[0].to_string(), "B");
    }

    #[tokio::test]
    async fn fetch_test_enveloped_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tests/algebra-basics"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": sample_test_json()})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let test = client.fetch_test("algebra-basics").await.unwrap();
        assert_eq!(test.id, "algebra-basics");
    }

    #[tokio::test]
    async fn fetch_test_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tests/algebra-basics"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_test_json()))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("secret-token".into()));
        assert!(client.fetch_test("algebra-basics").await.is_ok());
    }

    #[tokio::test]
    async fn fetch_test_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tests/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let err = client.fetch_test("ghost").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submissions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("stale".into()));
        let err = client.submit(&sample_record()).await.unwrap_err();
        assert!(err.to_string().contains("authentication"));
    }

    #[tokio::test]
    async fn submit_reads_enveloped_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submissions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"id": "sub-9"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let receipt = client.submit(&sample_record()).await.unwrap();
        assert_eq!(receipt.id.as_deref(), Some("sub-9"));
    }

    #[tokio::test]
    async fn submit_server_error_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submissions"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": {"message": "storage offline"}})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let err = client.submit(&sample_record()).await.unwrap_err();
        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert!(api_err.is_transient());
        assert!(err.to_string().contains("storage offline"));
    }

    #[tokio::test]
    async fn leaderboard_rows_are_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tests/algebra-basics/leaderboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"user": "alice", "score": 80.0},
                    {"user": "bob"},
                    {"score": 55.0}
                ]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let scores = client.fetch_scores("algebra-basics").await.unwrap();

        // The row without a user is dropped; the missing score becomes 0.
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].user, "alice");
        assert_eq!(scores[0].score, 80.0);
        assert_eq!(scores[1].user, "bob");
        assert_eq!(scores[1].score, 0.0);
    }

    #[test]
    fn envelope_unwrapping() {
        let enveloped = serde_json::json!({"data": {"id": "x"}});
        assert_eq!(unwrap_envelope(enveloped), serde_json::json!({"id": "x"}));

        let bare = serde_json::json!({"id": "x"});
        assert_eq!(unwrap_envelope(bare.clone()), bare);

        let null_data = serde_json::json!({"data": null, "id": "x"});
        assert_eq!(unwrap_envelope(null_data), serde_json::json!({"id": "x"}));
    }

    #[test]
    fn error_message_parsing() {
        assert_eq!(parse_error_message(r#"{"message": "boom"}"#), "boom");
        assert_eq!(parse_error_message(r#"{"error": "boom"}"#), "boom");
        assert_eq!(
            parse_error_message(r#"{"error": {"message": "boom"}}"#),
            "boom"
        );
        assert_eq!(parse_error_message("plain text"), "plain text");
    }
}
