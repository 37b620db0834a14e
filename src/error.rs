use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// One failed required-field check, in the shape clients already parse.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub msg: &'static str,
    pub param: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{msg}")]
    NotFound { status: StatusCode, msg: &'static str },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Missing-resource errors answer 400 with a fixed message, matching the
    /// original route surface.
    pub fn not_found(msg: &'static str) -> Self {
        Self::NotFound {
            status: StatusCode::BAD_REQUEST,
            msg,
        }
    }

    /// The third-party proxies are the one place that answers 404.
    pub fn upstream_not_found(msg: &'static str) -> Self {
        Self::NotFound {
            status: StatusCode::NOT_FOUND,
            msg,
        }
    }
}

#[derive(Serialize)]
struct MsgBody {
    msg: &'static str,
}

#[derive(Serialize)]
struct ErrorsBody {
    errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ErrorsBody { errors })).into_response()
            }
            ApiError::NotFound { status, msg } => (status, Json(MsgBody { msg })).into_response(),
            ApiError::Internal(e) => {
                // The cause stays in the server log; callers get the fixed body.
                error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MsgBody { msg: "Server Error" }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_answers_400_with_field_errors() {
        let err = ApiError::Validation(vec![FieldError {
            msg: "Status is required",
            param: "status",
        }]);
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["errors"][0]["msg"], "Status is required");
        assert_eq!(body["errors"][0]["param"], "status");
    }

    #[tokio::test]
    async fn not_found_carries_its_fixed_message() {
        let res = ApiError::not_found("Profile not found").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["msg"], "Profile not found");

        let res = ApiError::upstream_not_found("No Github profile found").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["msg"], "No Github profile found");
    }

    #[tokio::test]
    async fn internal_answers_generic_500() {
        let res = ApiError::Internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["msg"], "Server Error");
        // The cause must never leak into the body.
        assert!(!body.to_string().contains("connection refused"));
    }
}
