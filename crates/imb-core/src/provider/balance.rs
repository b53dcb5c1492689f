use std::sync::Arc;

use serde::Deserialize;

use crate::{
    domain::Balance,
    errors::ProviderError,
    ports::{HttpRequest, HttpTransport, TransportError},
};

use super::ProviderSettings;

/// Shown when the account endpoint cannot be reached at all.
pub const BALANCE_UNREACHABLE_MESSAGE: &str =
    "Failed to check the balance. Check the API authorization.";

#[derive(Deserialize)]
struct AccountBody {
    /// Whole queries only; negative or fractional values fail to decode.
    balance: Balance,
}

/// Reads the remaining prepaid query count. Never cached.
#[derive(Clone)]
pub struct BalanceGate {
    settings: ProviderSettings,
    http: Arc<dyn HttpTransport>,
}

impl BalanceGate {
    pub fn new(settings: ProviderSettings, http: Arc<dyn HttpTransport>) -> Self {
        Self { settings, http }
    }

    pub async fn fetch_balance(&self) -> Result<Balance, ProviderError> {
        let req = HttpRequest::get(self.settings.account_url()).bearer_json(&self.settings.api_key);

        let resp = self.http.execute(req).await.map_err(|e| match e {
            TransportError::Connect(_) => {
                ProviderError::Unreachable(BALANCE_UNREACHABLE_MESSAGE.to_string())
            }
            TransportError::Other(msg) => ProviderError::Transport(msg),
        })?;

        if resp.status != 200 {
            return Err(ProviderError::Status {
                status: resp.status,
                body: resp.body,
            });
        }

        let body: AccountBody = serde_json::from_str(&resp.body)
            .map_err(|e| ProviderError::Malformed(format!("account body: {e}")))?;

        tracing::debug!(balance = body.balance, "provider balance fetched");
        Ok(body.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::HttpMethod;
    use crate::provider::testing::{ok, settings, unreachable, FakeTransport};

    fn gate(fake: &Arc<FakeTransport>) -> BalanceGate {
        BalanceGate::new(settings(), fake.clone())
    }

    #[tokio::test]
    async fn returns_balance_on_200() {
        let fake = Arc::new(FakeTransport::new([ok(200, r#"{"balance": 42, "id": 7}"#)]));
        assert_eq!(gate(&fake).fetch_balance().await, Ok(42));

        let reqs = fake.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, HttpMethod::Get);
        assert_eq!(reqs[0].url, "https://imei.test/v1/account");
        assert!(reqs[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer key-123".to_string())));
        assert!(reqs[0]
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));
    }

    #[tokio::test]
    async fn non_200_carries_status() {
        let fake = Arc::new(FakeTransport::new([ok(401, "unauthorized")]));
        let err = gate(&fake).fetch_balance().await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn connect_failure_uses_fixed_message() {
        let fake = Arc::new(FakeTransport::new([unreachable()]));
        let err = gate(&fake).fetch_balance().await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Unreachable(BALANCE_UNREACHABLE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn malformed_or_negative_balance_is_rejected() {
        let fake = Arc::new(FakeTransport::new([
            ok(200, r#"{"credits": 3}"#),
            ok(200, r#"{"balance": -1}"#),
        ]));
        let g = gate(&fake);
        assert!(matches!(
            g.fetch_balance().await,
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            g.fetch_balance().await,
            Err(ProviderError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn fractional_balance_is_malformed() {
        let fake = Arc::new(FakeTransport::new([ok(200, r#"{"balance": 12.5}"#)]));
        assert!(matches!(
            gate(&fake).fetch_balance().await,
            Err(ProviderError::Malformed(_))
        ));
    }
}
