//! Response envelope shared by every service
//!
//! Exactly one of `data` and `errors` is populated. `messages` carries an
//! optional note alongside successful data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebResponse<T> {
    pub data: Option<T>,
    pub messages: Option<String>,
    pub errors: Option<String>,
}

impl<T> WebResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            messages: None,
            errors: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            messages: Some(message.into()),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            messages: None,
            errors: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_serialize_as_null() {
        let json = serde_json::to_value(WebResponse::ok("OK")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "data": "OK", "messages": null, "errors": null })
        );
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let parsed: WebResponse<i64> = serde_json::from_str(r#"{"errors":"boom"}"#).unwrap();
        assert!(!parsed.is_success());
        assert_eq!(parsed.data, None);
        assert_eq!(parsed.errors.as_deref(), Some("boom"));
    }
}
