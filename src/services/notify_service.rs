use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct NotifyUpstreamError {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl NotifyUpstreamError {
    fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }
}

impl std::fmt::Display for NotifyUpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{}: {}", self.status, body),
            None => write!(f, "{}", self.status),
        }
    }
}

fn email_api_base_url() -> String {
    std::env::var("EMAIL_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

fn email_api_host_header() -> String {
    std::env::var("EMAIL_API_HOST").unwrap_or_else(|_| "mail.localhost".to_string())
}

pub fn operator_email() -> String {
    std::env::var("SITE_OPERATOR_EMAIL").unwrap_or_else(|_| "operator@chosen.local".to_string())
}

fn api_headers(key: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(key) = key {
        if let Ok(auth_value) = HeaderValue::from_str(&format!("Bearer {}", key)) {
            headers.insert(AUTHORIZATION, auth_value);
        }
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn connect_failed(url: &str, err: impl ToString) -> NotifyUpstreamError {
    NotifyUpstreamError::new(
        StatusCode::BAD_GATEWAY,
        Some(serde_json::json!({
            "error": "connect_failed",
            "detail": err.to_string(),
            "url": url
        })),
    )
}

pub fn email_payload(to: &str, subject: &str, html: &str) -> Value {
    serde_json::json!({
        "to": to,
        "subject": subject,
        "html": html,
    })
}

/// Send one email through the notification API. No retry, no queue; a
/// failed send surfaces as an error for the caller to log or swallow.
pub async fn send_email(
    to: &str,
    subject: &str,
    html: &str,
) -> Result<Value, NotifyUpstreamError> {
    let base_url = email_api_base_url();
    let host_header = email_api_host_header();
    let api_key = std::env::var("EMAIL_API_KEY").ok();
    let url = format!("{}/api/v1/send", base_url.trim_end_matches('/'));

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .header("Host", host_header)
        .headers(api_headers(api_key.as_deref()))
        .json(&email_payload(to, subject, html))
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        return Err(NotifyUpstreamError::new(status, Some(body)));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_recipient_subject_and_body() {
        let payload = email_payload("operator@chosen.local", "Member of the Week", "<p>hi</p>");
        assert_eq!(payload["to"], "operator@chosen.local");
        assert_eq!(payload["subject"], "Member of the Week");
        assert_eq!(payload["html"], "<p>hi</p>");
    }

    #[test]
    fn headers_skip_authorization_without_a_key() {
        let headers = api_headers(None);
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");

        let headers = api_headers(Some("secret"));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
    }

    #[test]
    fn upstream_error_displays_status_and_body() {
        let err = NotifyUpstreamError::new(
            StatusCode::BAD_GATEWAY,
            Some(serde_json::json!({"error": "connect_failed"})),
        );
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.contains("connect_failed"));
    }
}
