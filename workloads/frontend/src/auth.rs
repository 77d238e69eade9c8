//! Login status as seen by the server render.

use async_trait::async_trait;
use concinnity_sdk::prelude::*;

/// Cookie the backend issues on login.
pub const TOKEN_COOKIE: &str = "token";

/// Header API clients send their token in.
pub const TOKEN_HEADER: &str = "Authentication";

/// Whether the visitor carries a session token.
///
/// The token is not verified here. The backend checks it on every API call;
/// the frontend only uses it to decide where to send the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    LoggedIn,
    Anonymous,
}

impl LoginStatus {
    /// Read the status from the `token` cookie or the `Authentication`
    /// header, in that order.
    pub fn from_request(request: &RenderRequest) -> Self {
        let token = request
            .cookie(TOKEN_COOKIE)
            .or_else(|| request.header(TOKEN_HEADER))
            .map(str::trim)
            .unwrap_or_default();

        if token.is_empty() {
            Self::Anonymous
        } else {
            Self::LoggedIn
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

/// App-level props: the login status, exposed to the client for hydration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginStatusProps;

#[async_trait]
impl InitialPropsHook for LoginStatusProps {
    async fn initial_props(&self, request: &RenderRequest) -> Result<serde_json::Value, BoxError> {
        Ok(serde_json::json!({
            "loginStatus": LoginStatus::from_request(request).is_logged_in(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_anonymous_without_token() {
        let request = RenderRequest::new(Method::GET, "/").with_header("cookie", "theme=dark");
        assert_eq!(LoginStatus::from_request(&request), LoginStatus::Anonymous);
    }

    #[test]
    fn test_token_cookie() {
        let request =
            RenderRequest::new(Method::GET, "/").with_header("Cookie", "theme=dark; token=abc123");
        assert!(LoginStatus::from_request(&request).is_logged_in());
    }

    #[test]
    fn test_authentication_header() {
        let request = RenderRequest::new(Method::GET, "/").with_header("authentication", "abc123");
        assert!(LoginStatus::from_request(&request).is_logged_in());
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let request = RenderRequest::new(Method::GET, "/").with_header("cookie", "token=");
        assert_eq!(LoginStatus::from_request(&request), LoginStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_login_status_props() {
        let request = RenderRequest::new(Method::GET, "/").with_header("cookie", "token=t");

        let props = LoginStatusProps.initial_props(&request).await.unwrap();
        assert_eq!(props, serde_json::json!({ "loginStatus": true }));
    }
}
