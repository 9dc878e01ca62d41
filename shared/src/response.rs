//! API Response types
//!
//! The backend answers successful calls with the bare resource and failed
//! ones with a small JSON object carrying a human-readable message under
//! either `error` or `message`.

use serde::{Deserialize, Serialize};

/// Error body returned on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Server-provided message, preferring `error` over `message`
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }

    /// Extract the message from a raw response body, if it is one of ours
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(ApiErrorBody::into_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_body() {
        assert_eq!(
            ApiErrorBody::message_from(r#"{"error":"Pedido no encontrado"}"#).as_deref(),
            Some("Pedido no encontrado")
        );
        assert_eq!(
            ApiErrorBody::message_from(r#"{"message":"Token inválido"}"#).as_deref(),
            Some("Token inválido")
        );
        assert_eq!(ApiErrorBody::message_from(r#"{"error":""}"#), None);
        assert_eq!(ApiErrorBody::message_from("<html>502</html>"), None);
    }
}
