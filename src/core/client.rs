//! Modem HTTP client
//!
//! This module provides the async HTTP session used to talk to the modem's
//! web management pages. The modem tracks logins with a session cookie, so
//! the underlying client keeps a cookie store for its whole lifetime.

use crate::core::constants::{endpoint, form};
use crate::core::source::{ModemError, StatusSource};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Cookie-carrying session against one modem
pub struct ModemClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl ModemClient {
    /// Create a new modem client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Modem base URL, e.g. `http://192.168.0.1:80`
    /// * `username` - Administrator user name
    /// * `password` - Administrator password
    /// * `timeout` - Request timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns `ModemError::Http` if the HTTP client cannot be built
    pub fn new(
        base_url: String,
        username: String,
        password: String,
        timeout: u64,
    ) -> Result<Self, ModemError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
        })
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, endpoint::LOGIN)
    }

    pub fn status_url(&self) -> String {
        format!("{}{}", self.base_url, endpoint::WAN_DSL_INFO)
    }
}

#[async_trait]
impl StatusSource for ModemClient {
    async fn login(&self) -> Result<(), ModemError> {
        let params = [
            (form::SUBMIT, form::SUBMIT_VALUE),
            (form::USERNAME, self.username.as_str()),
            (form::PASSWORD, self.password.as_str()),
        ];

        let response = self
            .client
            .post(self.login_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            debug!("Login failed with status {}", status);
            return Err(ModemError::LoginRejected(status.as_u16()));
        }

        debug!("Login success");
        Ok(())
    }

    async fn fetch_status(&self) -> Result<String, ModemError> {
        let response = self.client.get(self.status_url()).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ModemError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::tests::SAMPLE_BODY;
    use axum::{
        Form, Router,
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::{get, post},
    };
    use std::collections::HashMap;

    const SESSION_COOKIE: &str = "SESSION=abc123";

    async fn fake_login(Form(params): Form<HashMap<String, String>>) -> impl IntoResponse {
        let accepted = params.get("loginSubmitValue").map(String::as_str) == Some("1")
            && params.get("admin_username").map(String::as_str) == Some("admin")
            && params.get("admin_password").map(String::as_str) == Some("secret");

        if accepted {
            (
                StatusCode::OK,
                [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
                "ok",
            )
                .into_response()
        } else {
            StatusCode::FORBIDDEN.into_response()
        }
    }

    async fn fake_status(headers: HeaderMap) -> impl IntoResponse {
        let logged_in = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|cookie| cookie.contains(SESSION_COOKIE));

        if logged_in {
            SAMPLE_BODY.into_response()
        } else {
            "<html>login required</html>".into_response()
        }
    }

    /// Serve a fake modem on an ephemeral port and return its base URL
    async fn spawn_fake_modem() -> String {
        let app = Router::new()
            .route("/login.cgi", post(fake_login))
            .route("/GetWANDSLInfo.cgi", get(fake_status))
            .route(
                "/broken/GetWANDSLInfo.cgi",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String, password: &str) -> ModemClient {
        ModemClient::new(base_url, "admin".to_string(), password.to_string(), 5).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client("http://192.168.0.1:80/".to_string(), "secret");
        assert_eq!(client.login_url(), "http://192.168.0.1:80/login.cgi");
        assert_eq!(client.status_url(), "http://192.168.0.1:80/GetWANDSLInfo.cgi");
        assert_eq!(client.source_name(), "http://192.168.0.1:80");
    }

    #[tokio::test]
    async fn test_login_then_fetch_uses_session_cookie() {
        let base_url = spawn_fake_modem().await;
        let client = client(base_url, "secret");

        let before = client.fetch_status().await.unwrap();
        assert!(before.contains("login required"));

        client.login().await.unwrap();
        let body = client.fetch_status().await.unwrap();
        assert_eq!(body, SAMPLE_BODY);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let base_url = spawn_fake_modem().await;
        let client = client(base_url, "wrong");

        match client.login().await {
            Err(ModemError::LoginRejected(403)) => {}
            other => panic!("unexpected login result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_ok_status() {
        let base_url = spawn_fake_modem().await;
        let client = client(format!("{}/broken", base_url), "secret");

        match client.fetch_status().await {
            Err(ModemError::Status(500)) => {}
            other => panic!("unexpected fetch result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_modem() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(format!("http://{}", addr), "secret");
        match client.fetch_status().await {
            Err(ModemError::Unreachable(_)) => {}
            other => panic!("unexpected fetch result: {:?}", other),
        }
    }
}
