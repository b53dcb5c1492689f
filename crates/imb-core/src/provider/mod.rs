//! imeicheck.net client: balance gate and device lookup.
//!
//! Both clients are stateless apart from immutable settings and the shared
//! transport, so one instance can serve concurrent conversations.

pub mod balance;
pub mod lookup;

use crate::config::Config;

pub use balance::BalanceGate;
pub use lookup::DeviceLookupClient;

/// Connection settings for the lookup provider.
#[derive(Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub service_id: u32,
}

impl ProviderSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            base_url: cfg.imei_api_base_url.clone(),
            api_key: cfg.imei_api_key.clone(),
            service_id: cfg.imei_service_id,
        }
    }

    pub fn account_url(&self) -> String {
        format!("{}/v1/account", self.base_url)
    }

    pub fn checks_url(&self) -> String {
        format!("{}/v1/checks", self.base_url)
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("service_id", &self.service_id)
            .finish()
    }
}
