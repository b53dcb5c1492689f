//! Core side of the chat conversation: one update in, one reply out.

use std::sync::Arc;

use crate::{
    config::Config,
    domain::LookupOutcome,
    imei::{classify, Imei, ImeiInput},
    messaging::{
        port::MessagingPort,
        types::{IncomingUpdate, Reply},
    },
    ports::HttpTransport,
    provider::{DeviceLookupClient, ProviderSettings},
    registration::RegistrationClient,
    report, Result,
};

pub const ASK_FOR_IMEI_TEXT: &str = "Okay! Send me a 15-digit IMEI to check.";
pub const INVALID_FORMAT_TEXT: &str =
    "Please send only a 15-digit numeric IMEI. Send /imei to check another IMEI.";

pub fn invalid_imei_text(imei: &Imei) -> String {
    format!("IMEI {imei} is invalid. Send /imei to check another IMEI.")
}

/// Stateless request handler shared by all chats.
#[derive(Clone)]
pub struct ImeiService {
    lookup: DeviceLookupClient,
    registration: RegistrationClient,
}

impl ImeiService {
    pub fn new(cfg: &Config, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            lookup: DeviceLookupClient::new(ProviderSettings::from_config(cfg), http.clone()),
            registration: RegistrationClient::new(cfg.registration_url.clone(), http),
        }
    }

    pub async fn handle(&self, update: &IncomingUpdate) -> Reply {
        match update {
            IncomingUpdate::Command(cmd) if cmd.name == "start" => {
                let text = self
                    .registration
                    .register(cmd.chat_id.0, cmd.username.as_deref())
                    .await;
                Reply::plain(text)
            }
            IncomingUpdate::Command(cmd) if cmd.name == "imei" => Reply::plain(ASK_FOR_IMEI_TEXT),
            // Unknown commands fall through to the IMEI check and fail the shape test.
            IncomingUpdate::Command(_) => Reply::plain(INVALID_FORMAT_TEXT),
            IncomingUpdate::Text(msg) => self.check_text(&msg.text).await,
        }
    }

    /// Handle the update and deliver the reply to its chat.
    pub async fn respond(
        &self,
        update: &IncomingUpdate,
        messenger: &dyn MessagingPort,
    ) -> Result<()> {
        let reply = self.handle(update).await;
        messenger
            .send_html(update.chat_id(), update.message_id(), &reply.to_html())
            .await?;
        Ok(())
    }

    async fn check_text(&self, text: &str) -> Reply {
        let imei = match classify(text) {
            ImeiInput::Candidate(imei) => imei,
            ImeiInput::InvalidShape => return Reply::plain(INVALID_FORMAT_TEXT),
        };
        if !imei.has_valid_checksum() {
            return Reply::plain(invalid_imei_text(&imei));
        }

        tracing::info!(imei = %imei, "looking up device");
        let outcome = self.lookup.lookup(&imei).await;
        match &outcome {
            LookupOutcome::Found(_) => tracing::info!(imei = %imei, "device found"),
            LookupOutcome::NotFound(detail) => {
                tracing::info!(imei = %imei, detail = %detail, "device not found")
            }
            LookupOutcome::InsufficientBalance => {
                tracing::warn!(imei = %imei, "lookup refused: insufficient balance")
            }
            LookupOutcome::ProviderError(e) => {
                tracing::warn!(imei = %imei, error = %e, "lookup failed")
            }
        }

        Reply::markdown(report::render(&outcome))
    }
}
