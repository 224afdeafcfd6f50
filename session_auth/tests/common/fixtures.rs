use base64::{Engine as _, engine::general_purpose};
use http::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use session_auth::{Account, RequestContext};

/// Test account fixtures
pub struct TestAccounts;

impl TestAccounts {
    pub const ALICE_PASSWORD: &'static str = "s3cret";

    /// Active account `alice` / `s3cret`
    pub fn alice() -> Account {
        let mut account = Account::new("alice", "alice@x.com");
        account.first_name = "Alice".to_string();
        account.last_name = "Liddell".to_string();
        account.is_active = true;
        account
            .set_password(Self::ALICE_PASSWORD)
            .expect("hash password");
        account
    }

    /// Active superuser `admin` / `admin-pass`
    pub fn admin() -> Account {
        let mut account = Account::new("admin", "admin@x.com");
        account.is_active = true;
        account.is_superuser = true;
        account.set_password("admin-pass").expect("hash password");
        account
    }
}

/// A request carrying only the given session cookie
pub fn request_with_session(session_id: &str) -> RequestContext {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("session_id={session_id}")).expect("cookie header"),
    );
    RequestContext::new(headers)
}

/// A request carrying `Authorization: Basic base64(login:password)`
pub fn request_with_basic(login: &str, password: &str) -> RequestContext {
    let token = general_purpose::STANDARD.encode(format!("{login}:{password}"));
    request_with_authorization(&format!("Basic {token}"))
}

pub fn request_with_authorization(value: &str) -> RequestContext {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(value).expect("authorization header"),
    );
    RequestContext::new(headers)
}

/// All `Set-Cookie` values queued on the context
pub fn set_cookies(ctx: &RequestContext) -> Vec<String> {
    ctx.response_headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("ascii cookie").to_string())
        .collect()
}

/// Whether a queued cookie clears the session on the client
pub fn clears_session_cookie(ctx: &RequestContext) -> bool {
    set_cookies(ctx)
        .iter()
        .any(|c| c.starts_with("session_id=;") && c.contains("Max-Age=0"))
}
