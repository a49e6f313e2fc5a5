//! HTTP rendering of `BridgeError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_core::BridgeError;

/// Plain-text error response: 400 for bad requests, 500 for everything else.
#[derive(Debug)]
pub struct ErrorResponse(pub BridgeError);

impl From<BridgeError> for ErrorResponse {
    fn from(err: BridgeError) -> Self {
        ErrorResponse(err)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.0.response_body()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let resp = ErrorResponse(BridgeError::BadRequest("nope".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn backend_and_misc_errors_map_to_500() {
        let errors = [
            BridgeError::Backend {
                status: 404,
                body: String::new(),
            },
            BridgeError::MalformedResponse("x".to_string()),
            BridgeError::Deserialization("x".to_string()),
            BridgeError::Transport("x".to_string()),
        ];
        for err in errors {
            let resp = ErrorResponse::from(err).into_response();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn body_is_plain_text() {
        let resp = ErrorResponse(BridgeError::BadRequest("nope".to_string())).into_response();
        let content_type = resp.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }
}
