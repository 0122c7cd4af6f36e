//! Form values submitted with a webhook request.
//!
//! # Responsibilities
//! - Decode `application/x-www-form-urlencoded` bodies (POST, PUT, PATCH)
//! - Decode the URL query string
//! - First-value lookup by key
//!
//! # Design Decisions
//! - Body values are stored ahead of query values, so the body wins on lookup
//! - Malformed input never fails the request; it just yields fewer values
//! - Size is enforced by the server's body limit layer; a body cut off by
//!   that limit fails the request instead of running the handler without it

use std::error::Error as StdError;

use axum::{
    body::Body,
    http::{header, request::Parts, Method, Request},
};
use http_body_util::LengthLimitError;
use thiserror::Error;

/// Default body size limit for webhook requests.
pub const MAX_FORM_BYTES: usize = 10 << 20;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Reasons a request's form values cannot be collected.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("request body exceeds the configured limit")]
    TooLarge,
}

/// Immutable bag of key/value form parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pairs: Vec<(String, String)>,
}

impl FormValues {
    /// Empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a urlencoded body and query string. Body pairs come first.
    pub fn parse(query: Option<&str>, body: Option<&[u8]>) -> Self {
        let mut pairs = Vec::new();
        if let Some(body) = body {
            pairs.extend(decode(body));
        }
        if let Some(query) = query {
            pairs.extend(decode(query.as_bytes()));
        }
        Self { pairs }
    }

    /// Add a value after the existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in submission order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Collect the form values of an inbound request, consuming its body.
    ///
    /// The body is read in full; limiting its size is left to the layers
    /// in front of the handler.
    pub async fn from_request(request: Request<Body>) -> Result<Self, FormError> {
        let (parts, body) = request.into_parts();

        let body_bytes = if carries_form_body(&parts) {
            match axum::body::to_bytes(body, usize::MAX).await {
                Ok(bytes) => Some(bytes),
                Err(e) if is_length_limit(&e) => return Err(FormError::TooLarge),
                Err(e) => {
                    tracing::warn!(
                        path = %parts.uri.path(),
                        error = %e,
                        "Failed to read form body, ignoring it"
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(Self::parse(parts.uri.query(), body_bytes.as_deref()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn decode(input: &[u8]) -> Vec<(String, String)> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(input).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discarding undecodable form data");
        Vec::new()
    })
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn carries_form_body(parts: &Parts) -> bool {
    if !matches!(parts.method, Method::POST | Method::PUT | Method::PATCH) {
        return false;
    }
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let form = FormValues::parse(Some("From=%2B15551234567&Body=hello+there"), None);
        assert_eq!(form.get("From"), Some("+15551234567"));
        assert_eq!(form.get("Body"), Some("hello there"));
        assert_eq!(form.get("To"), None);
    }

    #[test]
    fn test_body_takes_precedence() {
        let form = FormValues::parse(Some("Digits=1"), Some(b"Digits=9"));
        assert_eq!(form.get("Digits"), Some("9"));
        assert_eq!(form.get_all("Digits").collect::<Vec<_>>(), vec!["9", "1"]);
    }

    #[test]
    fn test_first_value_wins() {
        let form = FormValues::parse(Some("a=1&a=2"), None);
        assert_eq!(form.get("a"), Some("1"));
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_from_iter() {
        let form: FormValues = [("CallSid", "CA123")].into_iter().collect();
        assert_eq!(form.get("CallSid"), Some("CA123"));
        assert!(!form.is_empty());
    }

    #[tokio::test]
    async fn test_from_request_reads_form_body() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/voice?CallStatus=ringing")
            .header("Content-Type", "application/x-www-form-urlencoded; charset=utf-8")
            .body(Body::from("From=%2B15550001111"))
            .unwrap();

        let form = FormValues::from_request(req).await.unwrap();
        assert_eq!(form.get("From"), Some("+15550001111"));
        assert_eq!(form.get("CallStatus"), Some("ringing"));
    }

    #[tokio::test]
    async fn test_from_request_reads_past_default_limit() {
        let pad = "a".repeat(MAX_FORM_BYTES + 1);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/voice")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("From=alice&pad={pad}")))
            .unwrap();

        let form = FormValues::from_request(req).await.unwrap();
        assert_eq!(form.get("From"), Some("alice"));
    }

    #[tokio::test]
    async fn test_from_request_rejects_limited_body() {
        let limited = http_body_util::Limited::new(Body::from("From=alice&pad=aaaaaaaa"), 8);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/voice")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::new(limited))
            .unwrap();

        let result = FormValues::from_request(req).await;
        assert!(matches!(result, Err(FormError::TooLarge)));
    }

    #[tokio::test]
    async fn test_from_request_ignores_non_form_body() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/voice?a=1")
            .header("Content-Type", "application/json")
            .body(Body::from("b=2"))
            .unwrap();

        let form = FormValues::from_request(req).await.unwrap();
        assert_eq!(form.get("a"), Some("1"));
        assert_eq!(form.get("b"), None);
    }

    #[tokio::test]
    async fn test_from_request_get_uses_query_only() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/voice?a=1")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from("b=2"))
            .unwrap();

        let form = FormValues::from_request(req).await.unwrap();
        assert_eq!(form.get("a"), Some("1"));
        assert_eq!(form.get("b"), None);
    }
}
