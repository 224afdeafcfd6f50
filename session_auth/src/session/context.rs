use headers::HeaderMapExt;
use http::header::{AUTHORIZATION, HeaderMap};

use super::types::{SessionInfo, User};

/// Per-request state for identity resolution.
///
/// Holds the incoming headers, the session and identity once they have been
/// resolved, and the `Set-Cookie` headers the HTTP layer must add to the
/// response. One context lives for exactly one request.
#[derive(Debug, Default)]
pub struct RequestContext {
    headers: HeaderMap,
    session: Option<Option<SessionInfo>>,
    user: Option<User>,
    response_headers: HeaderMap,
}

impl RequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of a non-empty `Authorization` header.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    /// Value of the named request cookie, if present and non-empty.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let cookies = self.headers.typed_get::<headers::Cookie>()?;
        cookies
            .get(name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// The memoized session: `None` when not yet resolved.
    pub fn session(&self) -> Option<Option<&SessionInfo>> {
        self.session.as_ref().map(Option::as_ref)
    }

    pub(crate) fn set_session(&mut self, session: Option<SessionInfo>) {
        self.session = Some(session);
    }

    /// The memoized identity, if resolution already ran for this request.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Headers to add to the response, currently only `Set-Cookie`.
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub(crate) fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response_headers
    }

    pub fn take_response_headers(&mut self) -> HeaderMap {
        std::mem::take(&mut self.response_headers)
    }
}
