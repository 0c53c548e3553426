use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::activity_api::ActivityApi;
use crate::auth_api::AuthApi;
use crate::category_api::CategoryApi;
use crate::error::{ClientError, ClientResult};
use crate::status_api::StatusApi;
use crate::token_store::TokenStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient {
    http: Client,
    base_url: String,
    store: TokenStore,
}

/// Joins a base URL and an API path with exactly one slash between them.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: TokenStore) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("activityflow-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn activities(&self) -> ActivityApi<'_> {
        ActivityApi::new(self)
    }

    pub fn categories(&self) -> CategoryApi<'_> {
        CategoryApi::new(self)
    }

    pub fn statuses(&self) -> StatusApi<'_> {
        StatusApi::new(self)
    }

    /// A request with the stored bearer token attached, when there is one.
    pub(crate) fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        Ok(match self.store.token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(response).await)
        }
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        Ok(self.send(builder).await?.json().await?)
    }

    /// `None` on 404, the decoded body otherwise.
    pub(crate) async fn send_optional<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<Option<T>> {
        match self.send_json(builder).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `false` on 404, `true` on any success status.
    pub(crate) async fn send_flag(&self, builder: RequestBuilder) -> ClientResult<bool> {
        match self.send(builder).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

async fn status_error(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        tracing::debug!("Server rejected the stored token");
    }
    ClientError::Status { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_urls_with_one_slash() {
        assert_eq!(
            join_url("http://localhost:5000/", "/api/activities"),
            "http://localhost:5000/api/activities"
        );
        assert_eq!(
            join_url("http://localhost:5000", "api/categories/3"),
            "http://localhost:5000/api/categories/3"
        );
    }

    #[test]
    fn url_uses_the_configured_base() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new(
            "https://tasks.example.com/",
            TokenStore::new(dir.path().join("tokens.json")),
        )
        .unwrap();
        assert_eq!(client.url("/health"), "https://tasks.example.com/health");
    }

    #[test]
    fn stored_token_is_sent_as_bearer() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        store.set("abc", "def").unwrap();
        let client = ApiClient::new("http://localhost:5000", store).unwrap();

        let request = client
            .request(Method::GET, "/api/activities")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer abc");
        assert_eq!(request.url().as_str(), "http://localhost:5000/api/activities");
    }

    #[test]
    fn anonymous_requests_have_no_authorization_header() {
        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new("http://localhost:5000", TokenStore::new(dir.path().join("t.json"))).unwrap();
        let request = client.request(Method::GET, "/health").unwrap().build().unwrap();
        assert!(request.headers().get("authorization").is_none());
    }
}
