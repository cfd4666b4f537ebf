//! JSON response envelope shared by every route.

use serde::Serialize;
use utoipa::ToSchema;

/// `{ "success": bool, "message": string, "data": T | null }`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = ApiResponse::success("ok", json!({"answer": 42}));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"success": true, "message": "ok", "data": {"answer": 42}})
        );
    }

    #[test]
    fn test_error_envelope_without_data() {
        let body = ApiResponse::<()>::error("Not found", None);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"success": false, "message": "Not found", "data": null})
        );
    }
}
