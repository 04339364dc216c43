use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalyst_coach::CoachError;
use catalyst_core::error::CatalystError;

// ---------------------------------------------------------------------------
// Internal sentinels
// ---------------------------------------------------------------------------

/// Carries an explicit 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. The body is always
/// `{"error": "<message>"}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if let Some(e) = self.0.downcast_ref::<CatalystError>() {
            return match e {
                CatalystError::NoCycle
                | CatalystError::GoalNotFound(_)
                | CatalystError::TacticNotFound(_) => StatusCode::NOT_FOUND,
                CatalystError::WeekOutOfRange(_)
                | CatalystError::InvalidFrequency(_)
                | CatalystError::InvalidBlockKind(_)
                | CatalystError::InvalidHour(_)
                | CatalystError::InvalidUserKey(_) => StatusCode::BAD_REQUEST,
                CatalystError::InvalidDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CatalystError::Remote(_) | CatalystError::RemoteStatus { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                CatalystError::HomeNotFound
                | CatalystError::Io(_)
                | CatalystError::Yaml(_)
                | CatalystError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if let Some(e) = self.0.downcast_ref::<CoachError>() {
            return match e {
                CoachError::MissingApiKey(_) => StatusCode::SERVICE_UNAVAILABLE,
                CoachError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                CoachError::WeekOutOfRange(_) => StatusCode::BAD_REQUEST,
                CoachError::Http(_)
                | CoachError::Status { .. }
                | CoachError::UnexpectedResponse(_) => StatusCode::BAD_GATEWAY,
            };
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn goal_not_found_maps_to_404() {
        let err = AppError(CatalystError::GoalNotFound("g".into()).into());
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn week_out_of_range_maps_to_400() {
        let err = AppError(CatalystError::WeekOutOfRange(13).into());
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn remote_failure_maps_to_502() {
        let err = AppError(
            CatalystError::RemoteStatus {
                status: 500,
                body: "boom".into(),
            }
            .into(),
        );
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn coach_timeout_maps_to_504() {
        let err = AppError(CoachError::Timeout(60).into());
        assert_eq!(status_of(err), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn coach_upstream_error_maps_to_502() {
        let err = AppError(
            CoachError::Status {
                status: 429,
                body: "slow down".into(),
            }
            .into(),
        );
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_api_key_maps_to_503() {
        let err = AppError(CoachError::MissingApiKey("OPENROUTER_API_KEY".into()).into());
        assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn unknown_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_is_json() {
        let response = AppError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
