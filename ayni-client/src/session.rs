//! Session - the bearer token shared by every admin request
//!
//! The session is created once and handed to both the HTTP client and the
//! board, so login, logout and token rejection all go through one place.

use tokio::sync::RwLock;

/// Holds the bearer token obtained at login
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    /// Anonymous session
    pub fn new() -> Self {
        Self::default()
    }

    /// Session resumed from a previously issued token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Drop the token (logout, or the backend rejected it)
    pub async fn clear(&self) {
        if self.token.write().await.take().is_some() {
            tracing::info!("Session cleared");
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// `Authorization` header value, if logged in
    pub async fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| format!("Bearer {}", t))
    }
}
