//! Shared HTTP call wrapper.
//!
//! `HttpClient::call_api` is the single path every domain operation takes to
//! the server: it composes the URL and query string, attaches the debug
//! identity headers, checks the status and decodes the body. The decoded
//! value is returned untyped; callers check its shape.

use crate::auth::DebugIdentity;
use crate::config::{ClientConfig, normalize_base};
use crate::error::ApiError;
use crate::query::QueryParams;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// `X-Debug-User-ID`
pub const DEBUG_USER_ID_HEADER: HeaderName = HeaderName::from_static("x-debug-user-id");
/// `X-Debug-User-Roles`, comma-joined role names.
pub const DEBUG_USER_ROLES_HEADER: HeaderName = HeaderName::from_static("x-debug-user-roles");

/// Characters left as is in a query key or value, everything else is
/// percent-encoded.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub params: Option<QueryParams>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serializes `body` as the JSON request payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body).map_err(ApiError::Serialization)?;
        self.body = Some(encoded);
        Ok(self.header(CONTENT_TYPE.as_str(), "application/json"))
    }
}

/// Configure with the `set_*` methods before handing the client out; once it
/// is shared behind `&` the base URL and debug identity are read-only.
/// Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: Arc::new(Client::builder().build()?),
            config,
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn set_api_base(&mut self, base_url: &str) {
        self.config.base_url = normalize_base(base_url);
    }

    pub fn set_debug_auth(&mut self, user_id: impl Into<String>, roles: Vec<String>) {
        self.config.debug_identity = Some(DebugIdentity::new(user_id, roles));
    }

    pub fn clear_debug_auth(&mut self) {
        self.config.debug_identity = None;
    }

    pub async fn call_api(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = compose_url(&self.config.base_url, endpoint, options.params.as_ref());
        let headers = build_headers(&options.headers, self.config.debug_identity.as_ref())?;

        debug!(
            method = %options.method,
            url = %url,
            debug_identity = self.config.debug_identity.is_some(),
            "sending request"
        );

        let mut request = self.client.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %url, "received response");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %url, "request failed");
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let text = response.text().await?;
        parse_body(&text)
    }
}

/// Encodes `params` as `key=value` pairs joined by `&`. Null values are
/// skipped and arrays yield one pair per element.
pub fn build_query(params: &QueryParams) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => pairs.extend(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| encode_pair(key, item)),
            ),
            other => pairs.push(encode_pair(key, other)),
        }
    }
    pairs.join("&")
}

fn encode_pair(key: &str, value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!(
        "{}={}",
        utf8_percent_encode(key, QUERY_COMPONENT),
        utf8_percent_encode(&text, QUERY_COMPONENT)
    )
}

fn compose_url(base_url: &str, endpoint: &str, params: Option<&QueryParams>) -> String {
    let mut url = format!("{base_url}{endpoint}");
    if let Some(params) = params {
        url.push('?');
        url.push_str(&build_query(params));
    }
    url
}

fn build_headers(
    extra: &[(String, String)],
    identity: Option<&DebugIdentity>,
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
        headers.insert(name, header_value(value)?);
    }

    if let Some(identity) = identity {
        if !identity.user_id.is_empty() {
            headers.insert(DEBUG_USER_ID_HEADER, header_value(&identity.user_id)?);
        }
        if !identity.roles.is_empty() {
            headers.insert(
                DEBUG_USER_ROLES_HEADER,
                header_value(&identity.roles.join(","))?,
            );
        }
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(value.to_string()))
}

fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "response body is not valid JSON");
        ApiError::Parse(e)
    })
}

/// Pulls `message` out of the server's `{"message": ...}` error body.
fn error_message(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(entries: Value) -> QueryParams {
        serde_json::from_value(entries).unwrap()
    }

    #[test]
    fn arrays_become_one_pair_per_element() {
        let query = build_query(&params(json!({"tags": ["pvp", "big map", "ü"]})));
        assert_eq!(query, "tags=pvp&tags=big%20map&tags=%C3%BC");
    }

    #[test]
    fn null_values_are_skipped() {
        let query = build_query(&params(json!({"a": null, "b": 1, "c": null})));
        assert_eq!(query, "b=1");
    }

    #[test]
    fn false_and_zero_are_kept() {
        let query = build_query(&params(json!({"only_approved": false, "page": 0})));
        assert_eq!(query, "only_approved=false&page=0");
    }

    #[test]
    fn keys_and_values_are_percent_encoded() {
        let query = build_query(&params(json!({"search query": "a&b=c/d?"})));
        assert_eq!(query, "search%20query=a%26b%3Dc%2Fd%3F");
    }

    #[test]
    fn empty_array_emits_nothing() {
        let query = build_query(&params(json!({"limit": 10, "tags": []})));
        assert_eq!(query, "limit=10");
    }

    #[test]
    fn url_without_params_has_no_query() {
        assert_eq!(compose_url("http://h/api", "/posts/5", None), "http://h/api/posts/5");
    }

    #[test]
    fn url_with_params_appends_query() {
        let p = params(json!({"page": 2, "postID": 7}));
        assert_eq!(
            compose_url("http://h/api", "/comments", Some(&p)),
            "http://h/api/comments?page=2&postID=7"
        );
    }

    #[test]
    fn debug_identity_sets_both_headers() {
        let identity = DebugIdentity::new("u1", vec!["a".into(), "b".into()]);
        let headers = build_headers(&[], Some(&identity)).unwrap();
        assert_eq!(headers[DEBUG_USER_ID_HEADER], "u1");
        assert_eq!(headers[DEBUG_USER_ROLES_HEADER], "a,b");
    }

    #[test]
    fn empty_roles_skip_roles_header() {
        let identity = DebugIdentity::new("u1", Vec::new());
        let headers = build_headers(&[], Some(&identity)).unwrap();
        assert!(headers.contains_key(DEBUG_USER_ID_HEADER));
        assert!(!headers.contains_key(DEBUG_USER_ROLES_HEADER));
    }

    #[test]
    fn no_identity_no_debug_headers() {
        let headers = build_headers(&[("Content-Type".into(), "application/json".into())], None)
            .unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn invalid_identity_is_rejected() {
        let identity = DebugIdentity::new("u1\n", Vec::new());
        let err = build_headers(&[], Some(&identity)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader(_)));
    }

    #[test]
    fn blank_body_is_null() {
        assert_eq!(parse_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn invalid_body_is_parse_error() {
        assert!(matches!(parse_body("<html>"), Err(ApiError::Parse(_))));
    }

    #[test]
    fn error_message_is_extracted() {
        assert_eq!(
            error_message(r#"{"message":"Post not found"}"#).as_deref(),
            Some("Post not found")
        );
        assert_eq!(error_message("oops"), None);
    }

    #[test]
    fn json_options_set_content_type() {
        let options = RequestOptions::new(Method::POST).json(&json!({})).unwrap();
        assert_eq!(options.body.as_deref(), Some("{}"));
        assert_eq!(
            options.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }
}
