use serde::Serialize;
use serde_json::Value;

use super::discard;
use crate::api::{endpoints, HttpClient};
use crate::error::ApiError;

/// Operator login form.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthApi {
    client: HttpClient,
}

impl AuthApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Check the credentials upstream. Any 2xx answer counts as success.
    pub async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        self.client.post(endpoints::auth::LOGIN, Some(credentials)).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client
            .post::<Value, ()>(endpoints::auth::LOGOUT, None)
            .await
            .and_then(discard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestBody;
    use crate::testing::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn login_posts_json_credentials() {
        let mock = MockTransport::new();
        mock.respond_json(200, json!({"ok": true}));
        let api = AuthApi::new(mock.client());

        let creds = Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        api.login(&creds).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.path, "/auth/login");
        match &request.body {
            RequestBody::Json(body) => assert_eq!(body["username"], "admin"),
            other => panic!("unexpected body {:?}", other),
        }
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[tokio::test]
    async fn rejected_login_keeps_server_message() {
        let mock = MockTransport::new();
        mock.respond_json(401, json!({"detail": "Invalid credentials"}));
        let api = AuthApi::new(mock.client());

        let err = api
            .login(&Credentials {
                username: "admin".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(401));
        assert_eq!(err.message(), "Invalid credentials");
    }
}
