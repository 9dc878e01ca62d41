//! HTTP client for network-based API calls

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{LoginRequest, LoginResponse};
use shared::response::ApiErrorBody;

use crate::{ClientConfig, ClientError, ClientResult, Session};

/// HTTP client for the back-office REST API.
///
/// Admin requests carry the session's bearer token; a 401 clears the session
/// so the host application can send the user back to the login screen.
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send the request and return the body of a 2xx response
    async fn send(&self, request: RequestBuilder, authorized: bool) -> ClientResult<String> {
        let request = match self.session.bearer().await {
            Some(auth) if authorized => request.header(reqwest::header::AUTHORIZATION, auth),
            _ => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected the session token");
            self.session.clear().await;
            return Err(ClientError::Unauthorized);
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message: ApiErrorBody::message_from(&body),
        })
    }

    /// Encode a JSON request body; failures are reported before anything is sent
    fn encode<B: Serialize + ?Sized>(body: &B) -> ClientResult<Vec<u8>> {
        Ok(serde_json::to_vec(body)?)
    }

    fn json_request(request: RequestBuilder, body: Vec<u8>) -> RequestBuilder {
        request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
        serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Authorized GET, decoding the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let body = self.send(self.client.get(&url), true).await?;
        Self::decode(&body)
    }

    /// Unauthenticated GET for public listings
    pub async fn get_public<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET (public)");
        let body = self.send(self.client.get(&url), false).await?;
        Self::decode(&body)
    }

    /// Authorized POST with JSON body; the response body is ignored
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let url = self.url(path);
        let body = Self::encode(body)?;
        tracing::debug!(%url, "POST");
        self.send(Self::json_request(self.client.post(&url), body), true)
            .await?;
        Ok(())
    }

    /// Authorized PUT with JSON body; the response body is ignored
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let url = self.url(path);
        let body = Self::encode(body)?;
        tracing::debug!(%url, "PUT");
        self.send(Self::json_request(self.client.put(&url), body), true)
            .await?;
        Ok(())
    }

    /// Authorized DELETE
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let url = self.url(path);
        tracing::debug!(%url, "DELETE");
        self.send(self.client.delete(&url), true).await?;
        Ok(())
    }

    // ========== Auth API ==========

    /// Log in and store the issued token in the session
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let url = self.url("login");
        let payload = Self::encode(&request)?;
        let body = self
            .send(Self::json_request(self.client.post(&url), payload), false)
            .await?;
        let login: LoginResponse = Self::decode(&body)?;
        if login.token.trim().is_empty() {
            return Err(ClientError::InvalidResponse("Missing login token".into()));
        }
        self.session.set_token(login.token).await;
        tracing::info!("Logged in as {}", email);
        Ok(())
    }

    /// Check the stored token with the backend; any failure ends the session
    pub async fn verify(&self) -> ClientResult<()> {
        if !self.session.is_authenticated().await {
            return Err(ClientError::Unauthorized);
        }
        let url = self.url("verify");
        match self.send(self.client.get(&url), true).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.session.clear().await;
                Err(e)
            }
        }
    }

    /// Forget the token locally
    pub async fn logout(&self) {
        self.session.clear().await;
    }
}
