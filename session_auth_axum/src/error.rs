use http::StatusCode;
use session_auth::AuthError;

/// Message for every credential failure, so responses do not reveal which
/// accounts exist
pub(crate) const INVALID_CREDENTIALS: &str = "Please provide valid credentials";

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Status code and client-facing message for an [`AuthError`]
pub(crate) fn auth_error_status(e: &AuthError) -> (StatusCode, String) {
    if e.is_invalid_credentials() {
        (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS.to_string())
    } else if e.is_client_error() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if e.is_retryable() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }
}

/// Map [`AuthError`] variants to status codes
impl<T> IntoResponseError<T> for Result<T, AuthError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| auth_error_status(&e))
    }
}
