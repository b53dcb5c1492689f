//! User-facing report text for a lookup outcome (markdown).

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::domain::{DeviceRecord, LookupOutcome, PropertyValue};
use crate::errors::ProviderError;
use crate::formatting::{escape_link_target, escape_markdown};

pub const NOT_PROVIDED: &str = "Not provided";

pub const LOOKUP_FAILED_TEXT: &str =
    "Error while checking the IMEI. Send /imei to check again or contact support.";
pub const INSUFFICIENT_BALANCE_TEXT: &str =
    "⚠️ The current balance is insufficient to run a check. Please top up the account.";
const RETRY_HINT: &str = "Send /imei to check another IMEI or contact support.";

/// Render any outcome. Never fails: absent or unusable fields become placeholders.
pub fn render(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Found(record) => render_record(record, &Local),
        LookupOutcome::NotFound(detail) => {
            format!("❌ {}\n\n{RETRY_HINT}", escape_markdown(detail))
        }
        LookupOutcome::InsufficientBalance => INSUFFICIENT_BALANCE_TEXT.to_string(),
        // Unreachable carries a user-facing apology; other failures stay generic.
        LookupOutcome::ProviderError(ProviderError::Unreachable(message)) => {
            escape_markdown(message)
        }
        LookupOutcome::ProviderError(_) => LOOKUP_FAILED_TEXT.to_string(),
    }
}

/// Render a device report with purchase dates shown in `tz`.
///
/// Provider values are escaped, so they never open bold spans or links.
pub fn render_record<Tz>(record: &DeviceRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let purchase_date = record
        .purchase_timestamp
        .and_then(|secs| format_timestamp(secs, tz))
        .unwrap_or_else(|| NOT_PROVIDED.to_string());
    let image = record
        .image_url
        .as_deref()
        .map(escape_link_target)
        .unwrap_or_else(|| NOT_PROVIDED.to_string());

    [
        format!(
            "🔍 **Device information for IMEI {}**:",
            or_placeholder(&record.imei)
        ),
        line("📱", "Device name", &record.device_name),
        line("🌍", "Purchase country", &record.purchase_country),
        format!("🗓️ **Purchase date**: {purchase_date}"),
        line("🔒", "SIM lock", &record.sim_lock),
        line("🛡️", "Warranty status", &record.warranty_status),
        line("🛠️", "Repair coverage", &record.repair_coverage),
        line("🆘", "Technical support", &record.technical_support),
        line("🎨", "Model description", &record.model_description),
        line("📦", "Demo unit", &record.demo_unit),
        line("🔄", "Refurbished", &record.refurbished),
        line("📶", "Network", &record.network),
        line("🇺🇸", "US block status", &record.usa_block_status),
        line("🔒", "Find My iPhone (FMI)", &record.find_my_device),
        line("🚫", "Lost mode", &record.lost_mode),
        format!("🖼️ [Device image]({image})"),
    ]
    .join("\n")
}

fn line(marker: &str, label: &str, value: &Option<PropertyValue>) -> String {
    format!("{marker} **{label}**: {}", or_placeholder(value))
}

fn or_placeholder(value: &Option<PropertyValue>) -> String {
    value
        .as_ref()
        .map(|v| escape_markdown(&v.to_string()))
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

/// `YYYY-MM-DD HH:MM:SS` in `tz`; `None` when the timestamp is out of range.
pub fn format_timestamp<Tz>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| {
        dt.with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}
