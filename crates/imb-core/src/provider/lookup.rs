use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    domain::{DeviceRecord, LookupOutcome},
    errors::ProviderError,
    imei::Imei,
    ports::{HttpRequest, HttpResponse, HttpTransport, TransportError},
};

use super::{BalanceGate, ProviderSettings};

/// Shown when the checks endpoint cannot be reached at all.
pub const LOOKUP_UNREACHABLE_MESSAGE: &str =
    "Error while checking the IMEI. Please try again later or contact support.";

/// Submits an IMEI to the provider, gated on a non-zero balance.
///
/// Each `lookup` performs at most one paid request and never retries.
#[derive(Clone)]
pub struct DeviceLookupClient {
    settings: ProviderSettings,
    balance: BalanceGate,
    http: Arc<dyn HttpTransport>,
}

impl DeviceLookupClient {
    pub fn new(settings: ProviderSettings, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            balance: BalanceGate::new(settings.clone(), http.clone()),
            settings,
            http,
        }
    }

    pub async fn lookup(&self, imei: &Imei) -> LookupOutcome {
        let balance = match self.balance.fetch_balance().await {
            Ok(b) => b,
            Err(e) => return LookupOutcome::ProviderError(e),
        };
        if balance == 0 {
            tracing::warn!("provider balance is zero, skipping paid check");
            return LookupOutcome::InsufficientBalance;
        }

        let req = HttpRequest::post_json(
            self.settings.checks_url(),
            json!({ "deviceId": imei.as_str(), "serviceId": self.settings.service_id }),
        )
        .bearer_json(&self.settings.api_key);

        match self.http.execute(req).await {
            Ok(resp) => parse_check_response(imei, resp),
            Err(TransportError::Connect(e)) => {
                tracing::warn!(error = %e, "provider unreachable");
                LookupOutcome::ProviderError(ProviderError::Unreachable(
                    LOOKUP_UNREACHABLE_MESSAGE.to_string(),
                ))
            }
            Err(TransportError::Other(e)) => {
                LookupOutcome::ProviderError(ProviderError::Transport(e))
            }
        }
    }
}

fn parse_check_response(imei: &Imei, resp: HttpResponse) -> LookupOutcome {
    match resp.status {
        200 => match parse_found(imei, &resp.body) {
            Ok(record) => LookupOutcome::Found(record),
            Err(e) => LookupOutcome::ProviderError(e),
        },
        400 | 404 => {
            let detail = serde_json::from_str::<Value>(&resp.body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));
            match detail {
                Some(detail) => LookupOutcome::NotFound(detail),
                None => LookupOutcome::ProviderError(ProviderError::Status {
                    status: resp.status,
                    body: resp.body,
                }),
            }
        }
        status => LookupOutcome::ProviderError(ProviderError::Status {
            status,
            body: resp.body,
        }),
    }
}

fn parse_found(imei: &Imei, body: &str) -> Result<DeviceRecord, ProviderError> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("checks body: {e}")))?;

    let entries: Vec<Value> = match v {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => {
            return Err(ProviderError::Malformed(
                "checks body is not an array".to_string(),
            ))
        }
    };

    let entry = entries
        .iter()
        .find(|e| e.get("deviceId").and_then(|d| d.as_str()) == Some(imei.as_str()))
        .ok_or_else(|| ProviderError::NoMatchingRecord(imei.to_string()))?;

    let props = entry
        .get("properties")
        .and_then(|p| p.as_object())
        .ok_or_else(|| ProviderError::Malformed("entry has no properties object".to_string()))?;

    Ok(DeviceRecord::from_properties(props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyValue;
    use crate::ports::HttpMethod;
    use crate::provider::testing::{ok, settings, unreachable, FakeTransport};

    const IMEI: &str = "490154203237518";
    const ACCOUNT: &str = "https://imei.test/v1/account";
    const CHECKS: &str = "https://imei.test/v1/checks";

    fn imei() -> Imei {
        Imei::parse(IMEI).unwrap()
    }

    fn client(fake: &Arc<FakeTransport>) -> DeviceLookupClient {
        DeviceLookupClient::new(settings(), fake.clone())
    }

    fn found_body() -> String {
        json!([
            {"deviceId": "356938035643809", "properties": {"deviceName": "other"}},
            {"deviceId": IMEI, "properties": {
                "deviceName": "iPhone 12",
                "simLock": false,
                "estPurchaseDate": 1600000000
            }}
        ])
        .to_string()
    }

    #[tokio::test]
    async fn zero_balance_skips_paid_request() {
        let fake = Arc::new(FakeTransport::new([ok(200, r#"{"balance": 0}"#)]));
        let out = client(&fake).lookup(&imei()).await;

        assert_eq!(out, LookupOutcome::InsufficientBalance);
        assert_eq!(fake.calls_to(ACCOUNT), 1);
        assert_eq!(fake.calls_to(CHECKS), 0);
    }

    #[tokio::test]
    async fn balance_failure_is_provider_error_without_submission() {
        let fake = Arc::new(FakeTransport::new([ok(500, "boom")]));
        let out = client(&fake).lookup(&imei()).await;

        assert!(matches!(
            out,
            LookupOutcome::ProviderError(ProviderError::Status { status: 500, .. })
        ));
        assert_eq!(fake.calls_to(CHECKS), 0);
    }

    #[tokio::test]
    async fn found_picks_matching_entry_and_sends_expected_request() {
        let fake = Arc::new(FakeTransport::new([
            ok(200, r#"{"balance": 5}"#),
            ok(200, &found_body()),
        ]));
        let out = client(&fake).lookup(&imei()).await;

        let rec = match out {
            LookupOutcome::Found(rec) => rec,
            other => panic!("expected Found, got {other:?}"),
        };
        assert_eq!(
            rec.device_name,
            Some(PropertyValue::Text("iPhone 12".to_string()))
        );
        assert_eq!(rec.sim_lock, Some(PropertyValue::Flag(false)));
        assert_eq!(rec.purchase_timestamp, Some(1_600_000_000));

        let reqs = fake.requests();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[1].method, HttpMethod::Post);
        assert_eq!(reqs[1].url, CHECKS);
        assert_eq!(
            reqs[1].json,
            Some(json!({"deviceId": IMEI, "serviceId": 1}))
        );
        assert!(reqs[1]
            .headers
            .contains(&("Authorization".to_string(), "Bearer key-123".to_string())));
    }

    #[tokio::test]
    async fn not_found_carries_provider_detail() {
        let fake = Arc::new(FakeTransport::new([
            ok(200, r#"{"balance": 5}"#),
            ok(404, r#"{"detail": "Device not found"}"#),
        ]));
        let out = client(&fake).lookup(&imei()).await;
        assert_eq!(out, LookupOutcome::NotFound("Device not found".to_string()));
    }

    #[tokio::test]
    async fn bad_request_without_detail_is_provider_error() {
        let fake = Arc::new(FakeTransport::new([
            ok(200, r#"{"balance": 5}"#),
            ok(400, "<html>bad</html>"),
        ]));
        let out = client(&fake).lookup(&imei()).await;
        assert_eq!(
            out,
            LookupOutcome::ProviderError(ProviderError::Status {
                status: 400,
                body: "<html>bad</html>".to_string()
            })
        );
    }

    #[tokio::test]
    async fn other_status_carries_raw_body() {
        let fake = Arc::new(FakeTransport::new([
            ok(200, r#"{"balance": 5}"#),
            ok(502, "upstream down"),
        ]));
        let out = client(&fake).lookup(&imei()).await;
        let LookupOutcome::ProviderError(e) = out else {
            panic!("expected ProviderError");
        };
        assert!(e.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn unreachable_submission_is_provider_error() {
        let fake = Arc::new(FakeTransport::new([ok(200, r#"{"balance": 5}"#), unreachable()]));
        let out = client(&fake).lookup(&imei()).await;
        assert_eq!(
            out,
            LookupOutcome::ProviderError(ProviderError::Unreachable(
                LOOKUP_UNREACHABLE_MESSAGE.to_string()
            ))
        );
        assert_eq!(fake.calls_to(CHECKS), 1);
    }

    #[tokio::test]
    async fn unmatched_device_id_is_provider_error() {
        let body = json!([{"deviceId": "356938035643809", "properties": {}}]).to_string();
        let fake = Arc::new(FakeTransport::new([ok(200, r#"{"balance": 5}"#), ok(200, &body)]));
        let out = client(&fake).lookup(&imei()).await;
        assert_eq!(
            out,
            LookupOutcome::ProviderError(ProviderError::NoMatchingRecord(IMEI.to_string()))
        );
    }

    #[tokio::test]
    async fn single_object_and_missing_properties() {
        let single = json!({"deviceId": IMEI, "properties": {"network": "Unlocked"}}).to_string();
        let bare = json!([{"deviceId": IMEI}]).to_string();
        let fake = Arc::new(FakeTransport::new([
            ok(200, r#"{"balance": 5}"#),
            ok(200, &single),
            ok(200, r#"{"balance": 5}"#),
            ok(200, &bare),
        ]));
        let c = client(&fake);

        assert!(matches!(c.lookup(&imei()).await, LookupOutcome::Found(_)));
        assert!(matches!(
            c.lookup(&imei()).await,
            LookupOutcome::ProviderError(ProviderError::Malformed(_))
        ));
    }
}
