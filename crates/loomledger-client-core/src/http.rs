use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::session::{Navigator, SessionStore};
use crate::storage::KeyValueStore;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const SIGNUP_PATH_PREFIX: &str = "/signup";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        self.url = format!(
            "{}{separator}{}={}",
            self.url,
            urlencoding::encode(key),
            urlencoding::encode(value)
        );
        self
    }

    pub fn with_json_body(mut self, body: &Value) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body)
            .map_err(|error| ApiError::decode(0, format!("failed to serialize request body: {error}")))?;
        self.set_header(CONTENT_TYPE_HEADER, "application/json");
        self.body = Some(encoded);
        Ok(self)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .retain(|(header, _)| !header.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Sends one request. Transport-level failures (no HTTP status) are reported as
/// [`ApiError::network`]; any received response, including non-2xx, is `Ok`.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Request phase: adds `Authorization: Bearer <token>` when a token exists and
/// leaves the request untouched otherwise.
pub fn attach_bearer_token(request: &mut HttpRequest, token: Option<&str>) {
    if let Some(token) = token {
        request.set_header(AUTHORIZATION_HEADER, &format!("Bearer {token}"));
    }
}

/// Pages where a 401 must not bounce the user: the login page at `/` and the
/// signup flow.
pub fn is_auth_exempt_path(path: &str) -> bool {
    path == "/" || path.starts_with(SIGNUP_PATH_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    PassThrough,
    ExemptPath,
    LoggedOut,
}

/// Response phase. The caller still returns `error` afterwards in every branch.
pub fn intercept_failure<S: KeyValueStore, N: Navigator>(
    error: &ApiError,
    session: &SessionStore<S>,
    navigator: &N,
) -> FailureDisposition {
    if !error.is_unauthorized() {
        return FailureDisposition::PassThrough;
    }

    let path = navigator.current_path();
    if is_auth_exempt_path(&path) {
        tracing::debug!(%path, "unauthorized response on public page, keeping session");
        return FailureDisposition::ExemptPath;
    }

    tracing::warn!(%path, "unauthorized response, clearing session");
    session.logout(navigator);
    FailureDisposition::LoggedOut
}

/// HTTP client wrapped in the interceptor pair. Every call made through it
/// carries the session token and reacts to 401s.
#[derive(Debug)]
pub struct ApiClient<T, S, N> {
    base_url: String,
    transport: T,
    session: SessionStore<S>,
    navigator: N,
}

impl<T, S, N> ApiClient<T, S, N>
where
    T: HttpTransport,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn new(
        base_url: impl Into<String>,
        transport: T,
        session: SessionStore<S>,
        navigator: N,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            session,
            navigator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn logout(&self) {
        self.session.logout(&self.navigator);
    }

    /// Absolute URLs pass through; anything else is joined onto the API base.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        attach_bearer_token(&mut request, self.session.token().as_deref());

        let error = match self.transport.send(request).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => ApiError::from_response(response.status, &response.body),
            Err(error) => error,
        };

        intercept_failure(&error, &self.session, &self.navigator);
        Err(error)
    }

    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, ApiError> {
        let mut request = HttpRequest::get(self.resolve_url(path));
        for (key, value) in query {
            request = request.with_query(key, value);
        }
        let response = self.send(request).await?;
        decode_json(&response)
    }

    /// Generic JSON call used by page scripts. An empty response body decodes
    /// to `null`.
    pub async fn request_json(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let mut request = HttpRequest::new(method, self.resolve_url(path));
        if let Some(body) = body {
            request = request.with_json_body(body)?;
        }
        let response = self.send(request).await?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        decode_json(&response)
    }
}

fn decode_json<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApiError> {
    serde_json::from_str(&response.body).map_err(|error| {
        ApiError::decode(
            response.status,
            format!("failed to decode response: {error}"),
        )
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use async_trait::async_trait;

    use super::{HttpRequest, HttpResponse, HttpTransport};
    use crate::error::ApiError;

    /// Replays queued responses in order and records every request it sees.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct ScriptedTransport {
        pub(crate) requests: Rc<RefCell<Vec<HttpRequest>>>,
        responses: Rc<RefCell<VecDeque<Result<HttpResponse, ApiError>>>>,
    }

    impl ScriptedTransport {
        pub(crate) fn respond(&self, status: u16, body: &str) -> &Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub(crate) fn fail(&self, error: ApiError) -> &Self {
            self.responses.borrow_mut().push_back(Err(error));
            self
        }

        pub(crate) fn last_request(&self) -> Option<HttpRequest> {
            self.requests.borrow().last().cloned()
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::network("no scripted response")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use quickcheck::{TestResult, quickcheck};
    use serde_json::json;

    use super::testing::ScriptedTransport;
    use super::*;
    use crate::session::testing::RecordingNavigator;
    use crate::storage::MemoryStore;

    fn client_at(
        path: &str,
        token: Option<&str>,
    ) -> (
        ApiClient<ScriptedTransport, Rc<MemoryStore>, Rc<RecordingNavigator>>,
        ScriptedTransport,
        Rc<RecordingNavigator>,
    ) {
        let store = Rc::new(MemoryStore::default());
        let session = SessionStore::new(Rc::clone(&store));
        if let Some(token) = token {
            session.set_token(token).expect("set token");
        }
        let transport = ScriptedTransport::default();
        let navigator = Rc::new(RecordingNavigator::at(path));
        let client = ApiClient::new(
            "https://erp.example.com/api/v1/",
            transport.clone(),
            session,
            Rc::clone(&navigator),
        );
        (client, transport, navigator)
    }

    #[tokio::test]
    async fn attaches_bearer_header_when_token_present() {
        let (client, transport, _) = client_at("/invoices", Some("tok-9"));
        transport.respond(200, "[]");

        let _: Vec<Value> = client
            .get_json("/dashboard/search", &[("q", "silk")])
            .await
            .expect("search ok");

        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.header("authorization"), Some("Bearer tok-9"));
        assert_eq!(
            request.url,
            "https://erp.example.com/api/v1/dashboard/search?q=silk"
        );
    }

    #[tokio::test]
    async fn leaves_request_untouched_without_token() {
        let (client, transport, _) = client_at("/invoices", None);
        transport.respond(200, "{}");

        client
            .request_json(HttpMethod::Get, "/customers", None)
            .await
            .expect("request ok");

        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.header(AUTHORIZATION_HEADER), None);
        assert!(request.headers.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_outside_public_pages_logs_out_and_still_fails() {
        let (client, transport, navigator) = client_at("/invoices/view/7", Some("tok-1"));
        transport.respond(401, r#"{"detail":"Could not validate credentials"}"#);

        let error = client
            .request_json(HttpMethod::Get, "/invoices/7", None)
            .await
            .expect_err("401 must propagate");

        assert!(error.is_unauthorized());
        assert_eq!(error.message, "Could not validate credentials");
        assert!(!client.session().is_authenticated());
        assert_eq!(*navigator.redirects.borrow(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn unauthorized_on_signup_keeps_session_and_still_fails() {
        let (client, transport, navigator) = client_at("/signup/verify", Some("tok-1"));
        transport.respond(401, "{}");

        let error = client
            .request_json(HttpMethod::Post, "/auth/login", Some(&json!({"email": "a@b.c"})))
            .await
            .expect_err("401 must propagate");

        assert_eq!(error.status_code, 401);
        assert!(client.session().is_authenticated());
        assert_eq!(navigator.redirect_count(), 0);
    }

    #[tokio::test]
    async fn other_failures_pass_through_without_logout() {
        let (client, transport, navigator) = client_at("/items", Some("tok-1"));
        transport.respond(500, "oops");
        transport.fail(ApiError::network("connection reset"));

        let server = client
            .request_json(HttpMethod::Delete, "/items/3", None)
            .await
            .expect_err("500");
        let network = client
            .request_json(HttpMethod::Get, "/items", None)
            .await
            .expect_err("network");

        assert_eq!(server.status_code, 500);
        assert_eq!(network.status_code, 0);
        assert!(client.session().is_authenticated());
        assert_eq!(navigator.redirect_count(), 0);
    }

    #[tokio::test]
    async fn json_body_sets_content_type_and_empty_response_is_null() {
        let (client, transport, _) = client_at("/items", None);
        transport.respond(204, "");

        let value = client
            .request_json(HttpMethod::Post, "items", Some(&json!({"item_name": "Silk"})))
            .await
            .expect("created");

        assert_eq!(value, Value::Null);
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(r#"{"item_name":"Silk"}"#));
    }

    #[test]
    fn resolve_url_keeps_absolute_urls() {
        let (client, _, _) = client_at("/", None);
        assert_eq!(
            client.resolve_url("https://cdn.example.com/x.json"),
            "https://cdn.example.com/x.json"
        );
        assert_eq!(
            client.resolve_url("dashboard/notifications"),
            "https://erp.example.com/api/v1/dashboard/notifications"
        );
    }

    #[test]
    fn query_values_are_url_encoded() {
        let request = HttpRequest::get("/dashboard/search").with_query("q", "red & blue");
        assert_eq!(request.url, "/dashboard/search?q=red%20%26%20blue");
    }

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse(" patch "), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("TRACE"), None);
    }

    quickcheck! {
        fn bearer_header_carries_any_token(token: String) -> TestResult {
            if token.is_empty() {
                return TestResult::discard();
            }
            let mut request = HttpRequest::get("/x");
            attach_bearer_token(&mut request, Some(&token));
            TestResult::from_bool(
                request.header(AUTHORIZATION_HEADER) == Some(format!("Bearer {token}").as_str()),
            )
        }

        fn missing_token_adds_no_header(url: String) -> bool {
            let mut request = HttpRequest::get(url);
            attach_bearer_token(&mut request, None);
            request.headers.is_empty()
        }

        fn signup_subpaths_are_exempt(suffix: String) -> bool {
            is_auth_exempt_path(&format!("/signup{suffix}"))
        }

        fn other_paths_are_not_exempt(segment: String) -> TestResult {
            if segment.is_empty() || segment.starts_with("signup") {
                return TestResult::discard();
            }
            TestResult::from_bool(!is_auth_exempt_path(&format!("/{segment}")))
        }
    }
}
