use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::session::context::RequestContext;
use crate::session::errors::SessionError;
use crate::utils::header_set_cookie;

/// Queue a `Set-Cookie` carrying the session id, valid for `ttl`.
pub(crate) fn set_session_cookie(
    ctx: &mut RequestContext,
    cookie_name: &str,
    session_id: &str,
    ttl: Duration,
) -> Result<(), SessionError> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    header_set_cookie(
        ctx.response_headers_mut(),
        cookie_name,
        session_id,
        expires_at,
        max_age,
    )?;
    Ok(())
}

/// Queue a `Set-Cookie` that makes the client drop the session cookie.
pub(crate) fn clear_session_cookie(
    ctx: &mut RequestContext,
    cookie_name: &str,
) -> Result<(), SessionError> {
    header_set_cookie(
        ctx.response_headers_mut(),
        cookie_name,
        "",
        Utc::now() - chrono::Duration::days(1),
        0,
    )?;
    Ok(())
}
