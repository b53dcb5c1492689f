use std::sync::Arc;

use imb_core::{config::Config, conversation::ImeiService};
use imb_http::ReqwestTransport;

#[tokio::main]
async fn main() -> Result<(), imb_core::Error> {
    imb_core::logging::init("imb")?;

    let cfg = Arc::new(Config::load()?);
    tracing::debug!(config = ?cfg, "configuration loaded");

    let http = Arc::new(ReqwestTransport::new()?);
    let service = Arc::new(ImeiService::new(&cfg, http));

    imb_telegram::router::run_polling(cfg, service)
        .await
        .map_err(|e| imb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
