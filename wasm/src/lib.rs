use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wasm_bindgen::prelude::*;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GoodFirstIssue {
    pub title: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: String,
    pub stars: u32,
    pub difficulty: String,
    pub good_first_issues: Vec<GoodFirstIssue>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QueryResponse {
    pub recommendations: Vec<Repository>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// POST the query to `{api_base}/query-agent`. Pass an empty base for
/// same-origin requests.
#[wasm_bindgen]
pub async fn query_agent(api_base: String, query: String) -> Result<JsValue, JsValue> {
    if query.trim().is_empty() {
        return Err(JsValue::from_str("Query is required"));
    }

    let url = endpoint(&api_base, "query-agent");
    let resp = Request::post(&url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .body(json!({ "query": query }).to_string())
        .map_err(|e| JsValue::from_str(&format!("Request build failed: {e}")))?
        .send()
        .await
        .map_err(|e| {
            JsValue::from_str(&format!(
                "Cannot connect to backend server ({url}): {e}"
            ))
        })?;

    if !resp.ok() {
        let text = resp.text().await.unwrap_or_default();
        return Err(JsValue::from_str(&error_message(resp.status(), &text)));
    }

    let data = resp
        .json::<QueryResponse>()
        .await
        .map_err(|e| JsValue::from_str(&format!("Response parse error: {e}")))?;

    serde_wasm_bindgen::to_value(&data)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// True when `{api_base}/health` answers with a 2xx.
#[wasm_bindgen]
pub async fn check_backend_health(api_base: String) -> bool {
    match Request::get(&endpoint(&api_base, "health")).send().await {
        Ok(resp) => resp.ok(),
        Err(_) => false,
    }
}

fn endpoint(api_base: &str, path: &str) -> String {
    format!("{}/{}", api_base.trim().trim_end_matches('/'), path)
}

/// Prefer the server's `{"error": ...}` message over the raw body.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => format!("API request failed with status {status}"),
        Err(_) => format!("API request failed with status {status}: {}", body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_path() {
        assert_eq!(endpoint("", "health"), "/health");
        assert_eq!(endpoint("http://localhost:8080", "query-agent"), "http://localhost:8080/query-agent");
        assert_eq!(endpoint("http://localhost:8080/api/", "health"), "http://localhost:8080/api/health");
    }

    #[test]
    fn error_message_uses_server_error_field() {
        assert_eq!(
            error_message(500, r#"{"error":"Failed to get AI recommendations"}"#),
            "Failed to get AI recommendations"
        );
        assert_eq!(error_message(502, "bad gateway"), "API request failed with status 502: bad gateway");
        assert_eq!(error_message(504, ""), "API request failed with status 504");
    }

    #[test]
    fn response_accepts_optional_agent_id() {
        let body = r#"{
            "recommendations": [{
                "name": "a/b", "url": "https://github.com/a/b", "description": "",
                "language": "Unknown", "stars": 0, "difficulty": "Beginner",
                "good_first_issues": [{ "title": "T", "url": "L" }]
            }],
            "message": "Here are some great repositories for you:"
        }"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.recommendations[0].good_first_issues[0].url, "L");
        assert!(parsed.agent_id.is_none());
    }
}
