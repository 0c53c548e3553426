use activityflow_shared::auth::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, WhoAmI};
use reqwest::{Method, RequestBuilder, StatusCode};

use crate::api_client::ApiClient;
use crate::error::{ClientError, ClientResult};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Stores the issued tokens on success.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let builder = self.client.request(Method::POST, "/api/auth/login")?.json(&body);
        self.exchange(builder).await
    }

    pub async fn register(&self, email: &str, password: &str, confirm_password: &str) -> ClientResult<AuthResponse> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        };
        let builder = self.client.request(Method::POST, "/api/auth/register")?.json(&body);
        self.exchange(builder).await
    }

    /// Swaps the stored refresh token for a new pair.
    pub async fn refresh(&self) -> ClientResult<AuthResponse> {
        let refresh_token = self
            .client
            .store()
            .refresh_token()?
            .ok_or_else(|| ClientError::Auth("Not logged in".to_string()))?;
        let body = RefreshTokenRequest { refresh_token };
        let builder = self.client.request(Method::POST, "/api/auth/refresh-token")?.json(&body);
        self.exchange(builder).await
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.client.store().clear()
    }

    pub fn is_authenticated(&self) -> ClientResult<bool> {
        Ok(self.token()?.is_some())
    }

    pub fn token(&self) -> ClientResult<Option<String>> {
        self.client.store().token()
    }

    pub async fn whoami(&self) -> ClientResult<WhoAmI> {
        let builder = self.client.request(Method::GET, "/api/auth/test-auth")?;
        self.client.send_json(builder).await
    }

    /// Auth endpoints answer 400 with an `AuthResponse` body on business failures.
    async fn exchange(&self, builder: RequestBuilder) -> ClientResult<AuthResponse> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() && status != StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let auth: AuthResponse = response.json().await?;
        if auth.success && !auth.token.is_empty() {
            self.client.store().set(&auth.token, &auth.refresh_token)?;
        }
        Ok(auth)
    }
}
