//! Authorization header injection

use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::session::SessionContext;

/// Scheme prefix expected by the server: `Authorization: Token <key>`
pub const TOKEN_SCHEME: &str = "Token";

/// Sets the `Authorization` header from the current session token
///
/// The token is read on every request, so a login or logout takes effect on
/// the next call without reinstalling anything.
pub struct AuthInterceptor {
    session: Arc<dyn SessionContext>,
}

impl AuthInterceptor {
    pub fn new(session: Arc<dyn SessionContext>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<dyn SessionContext> {
        &self.session
    }

    /// Apply to an outbound request
    ///
    /// Without a token the request is left untouched. The header is replaced,
    /// never appended, so a request carries at most one `Authorization`.
    pub fn intercept(&self, request: &mut reqwest::Request) -> ApiResult<()> {
        let Some(token) = self.session.token() else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("{} {}", TOKEN_SCHEME, token))
            .map_err(|e| ApiError::Interceptor(format!("invalid token: {}", e)))?;
        value.set_sensitive(true);

        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Session};
    use crate::session::SessionStore;
    use reqwest::{Method, Request, Url};

    fn request() -> Request {
        Request::new(Method::GET, Url::parse("http://localhost/api/auth/me/").unwrap())
    }

    #[test]
    fn test_sets_token_header() {
        let store = Arc::new(SessionStore::in_memory());
        store.save(&Session::new("abc", Member::named("alice")));
        let interceptor = AuthInterceptor::new(store);

        let mut req = request();
        interceptor.intercept(&mut req).unwrap();

        assert_eq!(req.headers().get(AUTHORIZATION).unwrap(), "Token abc");
    }

    #[test]
    fn test_no_token_leaves_request_alone() {
        let interceptor = AuthInterceptor::new(Arc::new(SessionStore::in_memory()));

        let mut req = request();
        interceptor.intercept(&mut req).unwrap();

        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_replaces_existing_header() {
        let store = Arc::new(SessionStore::in_memory());
        store.save(&Session::new("abc", Member::named("alice")));
        let interceptor = AuthInterceptor::new(store);

        let mut req = request();
        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Token stale"));
        interceptor.intercept(&mut req).unwrap();
        interceptor.intercept(&mut req).unwrap();

        let values: Vec<_> = req.headers().get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values, vec!["Token abc"]);
    }

    #[test]
    fn test_invalid_token_rejects_request() {
        let store = Arc::new(SessionStore::in_memory());
        store.save(&Session::new("bad\ntoken", Member::named("alice")));
        let interceptor = AuthInterceptor::new(store);

        let result = interceptor.intercept(&mut request());
        assert!(matches!(result, Err(ApiError::Interceptor(_))));
    }
}
