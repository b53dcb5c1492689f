use std::sync::Arc;

use serde_json::json;

use crate::ports::{HttpRequest, HttpTransport};

pub const REGISTRATION_FAILED_TEXT: &str = "Registration failed. Please contact support.";

/// Announces a new chat to the registration endpoint on `/start`.
#[derive(Clone)]
pub struct RegistrationClient {
    url: String,
    http: Arc<dyn HttpTransport>,
}

impl RegistrationClient {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    /// Register the chat and return the greeting (or failure) text.
    pub async fn register(&self, chat_id: i64, username: Option<&str>) -> String {
        let req = HttpRequest::post_json(
            self.url.clone(),
            json!({ "chat_id": chat_id, "username": username }),
        );

        match self.http.execute(req).await {
            Ok(resp) if resp.status == 200 => greeting(username),
            Ok(resp) => {
                tracing::warn!(chat_id, status = resp.status, "registration rejected");
                REGISTRATION_FAILED_TEXT.to_string()
            }
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "registration request failed");
                REGISTRATION_FAILED_TEXT.to_string()
            }
        }
    }
}

fn greeting(username: Option<&str>) -> String {
    let name = username.unwrap_or("there");
    format!("Hi, {name}! This bot checks IMEI numbers. Send /imei to submit an IMEI.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{ok, unreachable, FakeTransport};

    const URL: &str = "https://reg.test/auth/telegram";

    #[tokio::test]
    async fn success_greets_user_and_posts_chat() {
        let fake = Arc::new(FakeTransport::new([ok(200, "{}")]));
        let reg = RegistrationClient::new(URL, fake.clone());

        let text = reg.register(42, Some("alice")).await;
        assert!(text.starts_with("Hi, alice!"));
        assert!(text.contains("/imei"));

        let reqs = fake.requests();
        assert_eq!(reqs[0].url, URL);
        assert_eq!(
            reqs[0].json,
            Some(json!({"chat_id": 42, "username": "alice"}))
        );
        assert!(reqs[0].headers.is_empty());
    }

    #[tokio::test]
    async fn failures_return_fixed_text() {
        let fake = Arc::new(FakeTransport::new([ok(500, "nope"), unreachable()]));
        let reg = RegistrationClient::new(URL, fake.clone());

        assert_eq!(reg.register(1, None).await, REGISTRATION_FAILED_TEXT);
        assert_eq!(reg.register(1, None).await, REGISTRATION_FAILED_TEXT);
        assert_eq!(
            fake.requests()[1].json,
            Some(json!({"chat_id": 1, "username": null}))
        );
    }
}
