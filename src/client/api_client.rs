// src/client/api_client.rs
// DOCUMENTATION: travel-guide REST API client
// PURPOSE: Base URL handling, bearer-token injection, status mapping and JSON decoding

use crate::client::RetryPolicy;
use crate::config::{init_http_client, Config};
use crate::errors::{GuideError, GuideResult};
use crate::services::ResponseCache;
use crate::session::SessionContext;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// File sent as multipart form data (avatars, attraction/restaurant images)
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Accept only images, since every upload endpoint stores pictures
    pub fn validate_image(&self) -> GuideResult<()> {
        if self.bytes.is_empty() {
            return Err(GuideError::ValidationError(format!(
                "{} is empty",
                self.file_name
            )));
        }
        if !self.content_type.starts_with("image/") {
            return Err(GuideError::ValidationError(format!(
                "{} is not an image ({})",
                self.file_name, self.content_type
            )));
        }
        Ok(())
    }

    fn to_form(&self, field: &str) -> GuideResult<Form> {
        let part = Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)
            .map_err(|e| GuideError::ValidationError(format!("Invalid content type: {}", e)))?;
        Ok(Form::new().part(field.to_string(), part))
    }
}

/// travel-guide API client
/// DOCUMENTATION: Cheap to clone; every clone shares the HTTP pool, the session
/// context and the reference-data cache
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client for making requests
    http: Client,
    /// Base URL of the backend, without trailing slash
    base_url: Arc<str>,
    /// Identity used for bearer-token injection
    session: SessionContext,
    /// Policy applied when a call does not pass its own
    policy: RetryPolicy,
    /// Policy for attraction/restaurant detail fetches
    detail_policy: RetryPolicy,
    /// Shared cache for reference data (cities, tags)
    cache: Option<Arc<ResponseCache>>,
}

impl ApiClient {
    /// Create new API client
    pub fn new(http: Client, base_url: impl AsRef<str>, session: SessionContext) -> Self {
        let policy = RetryPolicy::default();
        Self {
            http,
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
            session,
            detail_policy: RetryPolicy::detail(3, policy.timeout),
            policy,
            cache: None,
        }
    }

    /// Create client from application configuration
    pub fn from_config(config: &Config, session: SessionContext) -> GuideResult<Self> {
        let http = init_http_client(config)?;
        let timeout = config.request_timeout();
        Ok(Self::new(http, &config.api_base_url, session)
            .with_policy(RetryPolicy::single(timeout))
            .with_detail_policy(RetryPolicy::detail(config.detail_retry_attempts, timeout)))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_detail_policy(mut self, policy: RetryPolicy) -> Self {
        self.detail_policy = policy;
        self
    }

    /// Attach a shared reference-data cache
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn detail_policy(&self) -> &RetryPolicy {
        &self.detail_policy
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a JSON resource with the default policy
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GuideResult<T> {
        self.get_with_policy(path, &self.policy).await
    }

    /// GET a JSON resource with an explicit policy
    pub async fn get_with_policy<T: DeserializeOwned>(
        &self,
        path: &str,
        policy: &RetryPolicy,
    ) -> GuideResult<T> {
        let body = self
            .execute(Method::GET, path, policy, |req| Ok(req))
            .await?;
        decode(path, &body)
    }

    /// GET a JSON resource with query parameters
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> GuideResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let body = self
            .execute(Method::GET, path, &self.policy, |req| Ok(req.query(query)))
            .await?;
        decode(path, &body)
    }

    /// GET through the reference-data cache
    /// DOCUMENTATION: Falls back to a plain GET when no cache is attached
    pub async fn get_cached<T: DeserializeOwned>(
        &self,
        path: &str,
        ttl: Option<Duration>,
    ) -> GuideResult<T> {
        let Some(cache) = &self.cache else {
            return self.get(path).await;
        };

        let key = ResponseCache::generate_key(path, None);
        if let Some(cached) = cache.get(&key).await {
            match serde_json::from_str(&cached) {
                Ok(value) => return Ok(value),
                Err(e) => log::warn!("Discarding undecodable cache entry {}: {}", key, e),
            }
        }

        let body = self
            .execute(Method::GET, path, &self.policy, |req| Ok(req))
            .await?;
        let value = decode(path, &body)?;
        match ttl {
            Some(ttl) => cache.set_with_ttl(key, body, ttl).await,
            None => cache.set(key, body).await,
        }
        Ok(value)
    }

    /// POST a JSON body; never retried
    pub async fn post<B, T>(&self, path: &str, body: &B) -> GuideResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let policy = self.policy.without_retries();
        let text = self
            .execute(Method::POST, path, &policy, |req| Ok(req.json(body)))
            .await?;
        decode(path, &text)
    }

    /// PUT a JSON body; never retried
    pub async fn put<B, T>(&self, path: &str, body: &B) -> GuideResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let policy = self.policy.without_retries();
        let text = self
            .execute(Method::PUT, path, &policy, |req| Ok(req.json(body)))
            .await?;
        decode(path, &text)
    }

    /// DELETE a resource; the response body is ignored
    pub async fn delete(&self, path: &str) -> GuideResult<()> {
        let policy = self.policy.without_retries();
        self.execute(Method::DELETE, path, &policy, |req| Ok(req))
            .await?;
        Ok(())
    }

    /// POST a single file as multipart/form-data
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file: &FileUpload,
    ) -> GuideResult<T> {
        let policy = self.policy.without_retries();
        let text = self
            .execute(Method::POST, path, &policy, |req| {
                Ok(req.multipart(file.to_form(field)?))
            })
            .await?;
        decode(path, &text)
    }

    /// Send a request under a policy and return the raw success body
    /// DOCUMENTATION: Injects the bearer token, maps non-success statuses to
    /// GuideError and expires the session whose token got a 401
    async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        policy: &RetryPolicy,
        build: F,
    ) -> GuideResult<String>
    where
        F: Fn(RequestBuilder) -> GuideResult<RequestBuilder>,
    {
        let url = self.url(path);
        let label = format!("{} {}", method, path);

        policy
            .run(&label, |attempt| {
                let url = url.clone();
                let method = method.clone();
                let build = &build;
                async move {
                    let token = self.session.token().await;
                    let mut request = self.http.request(method.clone(), &url);
                    if let Some(token) = &token {
                        request = request.bearer_auth(token);
                    }
                    let request = build(request)?;

                    log::debug!("{} {} (attempt {})", method, url, attempt);

                    let response = request.send().await.map_err(|e| {
                        log::error!("Request {} {} failed: {}", method, url, e);
                        GuideError::from(e)
                    })?;

                    let status = response.status();
                    let body = response.text().await.map_err(GuideError::from)?;

                    if status.is_success() {
                        return Ok(body);
                    }

                    log::warn!("{} {} returned {}", method, url, status);
                    if status == StatusCode::UNAUTHORIZED {
                        if let Some(token) = &token {
                            self.session.expire_if(token).await;
                        }
                    }
                    Err(GuideError::from_status(status, &body))
                }
            })
            .await
    }
}

/// Decode a JSON body, naming the path in the error
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> GuideResult<T> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", path, e);
        GuideError::DecodeError(format!("{}: {}", path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, UserRole};
    use crate::services::CityService;
    use crate::test_support::{client_for, session, stub_server, stub_server_gated};
    use tokio::sync::Notify;

    fn client() -> ApiClient {
        ApiClient::new(
            Client::new(),
            "https://guide.example.com/api/",
            SessionContext::anonymous(),
        )
    }

    #[test]
    fn test_url_joining() {
        let client = client();
        assert_eq!(client.url("/cities"), "https://guide.example.com/api/cities");
        assert_eq!(
            client.url("attractions/5/reviews"),
            "https://guide.example.com/api/attractions/5/reviews"
        );
    }

    #[test]
    fn test_default_policies() {
        let client = client();
        assert_eq!(client.policy().max_attempts, 1);
        assert_eq!(client.detail_policy().max_attempts, 3);
        assert!(client.cache().is_none());
    }

    #[test]
    fn test_decode_reports_path() {
        let err = decode::<City>("/cities/1", "{not json").unwrap_err();
        match err {
            GuideError::DecodeError(msg) => assert!(msg.starts_with("/cities/1")),
            other => panic!("unexpected error {:?}", other),
        }

        let city: City =
            decode("/cities/1", r#"{"id": 1, "name": "Prague", "country": "CZ"}"#).unwrap();
        assert_eq!(city.name, "Prague");
    }

    #[test]
    fn test_file_upload_validation() {
        let ok = FileUpload::new("avatar.png", "image/png", vec![1, 2, 3]);
        assert!(ok.validate_image().is_ok());
        assert!(ok.to_form("avatar").is_ok());

        let empty = FileUpload::new("avatar.png", "image/png", Vec::new());
        assert!(empty.validate_image().is_err());

        let pdf = FileUpload::new("menu.pdf", "application/pdf", vec![1]);
        assert!(pdf.validate_image().is_err());
    }

    #[tokio::test]
    async fn test_bearer_token_is_injected() {
        let server = stub_server(vec![(200, r#"[{"id":1,"name":"Prague","country":"CZ"}]"#)]).await;
        let client = client_for(&server.base_url, Some(session(3, UserRole::User))).await;

        let cities: Vec<City> = client.get("/cities").await.unwrap();
        assert_eq!(cities.len(), 1);

        let requests = server.requests();
        assert!(requests[0].starts_with("GET /cities HTTP/1.1"));
        assert!(requests[0]
            .to_ascii_lowercase()
            .contains("authorization: bearer jwt-token"));
    }

    #[tokio::test]
    async fn test_anonymous_requests_carry_no_token() {
        let server = stub_server(vec![(200, "[]")]).await;
        let client = client_for(&server.base_url, None).await;

        let cities: Vec<City> = client.get("/cities").await.unwrap();
        assert!(cities.is_empty());
        assert!(!server.requests()[0]
            .to_ascii_lowercase()
            .contains("authorization:"));
    }

    #[tokio::test]
    async fn test_unauthorized_response_expires_session() {
        let server = stub_server(vec![(401, r#"{"message":"jwt expired"}"#)]).await;
        let client = client_for(&server.base_url, Some(session(3, UserRole::User))).await;

        let result: GuideResult<Vec<City>> = client.get("/cities").await;
        assert_eq!(result, Err(GuideError::Unauthorized));
        assert!(!client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_late_unauthorized_keeps_newer_session() {
        let gate = Arc::new(Notify::new());
        let server = stub_server_gated(vec![(401, r#"{"message":"jwt expired"}"#)], gate.clone()).await;
        let client = client_for(&server.base_url, Some(session(3, UserRole::User))).await;

        let pending = {
            let client = client.clone();
            tokio::spawn(async move { client.get::<Vec<City>>("/cities").await })
        };
        while server.requests().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Sign in again while the old request is still unanswered
        let mut fresh = session(3, UserRole::User);
        fresh.token = "fresh-token".to_string();
        client.session().login(fresh).await.unwrap();

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), Err(GuideError::Unauthorized));
        assert_eq!(client.session().token().await.as_deref(), Some("fresh-token"));
    }

    #[tokio::test]
    async fn test_mutations_are_not_retried() {
        let server = stub_server(vec![(503, "busy"), (200, "{}")]).await;
        let client = client_for(&server.base_url, Some(session(3, UserRole::User)))
            .await
            .with_policy(RetryPolicy::fixed(
                3,
                Duration::from_secs(2),
                Duration::from_millis(1),
            ));

        let result: GuideResult<serde_json::Value> =
            client.post("/reviews", &serde_json::json!({"rating": 5})).await;
        assert!(matches!(result, Err(GuideError::ServerError { status: 503, .. })));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_reference_data_is_cached() {
        let server = stub_server(vec![(200, r#"[{"id":1,"name":"Prague","country":"CZ"}]"#)]).await;
        let client = client_for(&server.base_url, None)
            .await
            .with_cache(Arc::new(ResponseCache::new(60)));

        let first = CityService::list(&client).await.unwrap();
        let second = CityService::list(&client).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_error_body_is_mapped() {
        let server = stub_server(vec![(404, r#"{"message":"City 9 not found"}"#)]).await;
        let client = client_for(&server.base_url, None).await;

        let result: GuideResult<City> = client.get("/cities/9").await;
        assert_eq!(result, Err(GuideError::NotFound("City 9 not found".to_string())));
    }
}
