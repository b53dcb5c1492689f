use std::fmt;

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Remaining prepaid provider queries.
pub type Balance = u64;

/// A single scalar value reported by the lookup provider.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Flag(bool),
    Number(serde_json::Number),
}

impl PropertyValue {
    /// Map a raw JSON value; `null` means "not provided".
    ///
    /// Arrays and objects keep their JSON text rather than failing the record.
    pub fn from_json(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Self::Flag(*b)),
            serde_json::Value::Number(n) => Some(Self::Number(n.clone())),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Text(other.to_string())),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(true) => f.write_str("Yes"),
            Self::Flag(false) => f.write_str("No"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Device metadata returned for one IMEI. Every field is independently optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceRecord {
    pub device_name: Option<PropertyValue>,
    pub purchase_country: Option<PropertyValue>,
    /// Estimated purchase date, epoch seconds.
    pub purchase_timestamp: Option<i64>,
    pub sim_lock: Option<PropertyValue>,
    pub warranty_status: Option<PropertyValue>,
    pub repair_coverage: Option<PropertyValue>,
    pub technical_support: Option<PropertyValue>,
    pub model_description: Option<PropertyValue>,
    pub demo_unit: Option<PropertyValue>,
    pub refurbished: Option<PropertyValue>,
    pub network: Option<PropertyValue>,
    pub usa_block_status: Option<PropertyValue>,
    pub find_my_device: Option<PropertyValue>,
    pub lost_mode: Option<PropertyValue>,
    pub image_url: Option<String>,
    pub imei: Option<PropertyValue>,
}

impl DeviceRecord {
    /// Build a record from the provider's `properties` object.
    ///
    /// Missing keys, `null`s and unusable timestamps degrade to `None`.
    pub fn from_properties(props: &serde_json::Map<String, serde_json::Value>) -> Self {
        let field = |key: &str| props.get(key).and_then(PropertyValue::from_json);

        Self {
            device_name: field("deviceName"),
            purchase_country: field("purchaseCountry"),
            purchase_timestamp: props.get("estPurchaseDate").and_then(parse_epoch_seconds),
            sim_lock: field("simLock"),
            warranty_status: field("warrantyStatus"),
            repair_coverage: field("repairCoverage"),
            technical_support: field("technicalSupport"),
            model_description: field("modelDesc"),
            demo_unit: field("demoUnit"),
            refurbished: field("refurbished"),
            network: field("network"),
            usa_block_status: field("usaBlockStatus"),
            find_my_device: field("fmiOn"),
            lost_mode: field("lostMode"),
            image_url: props
                .get("image")
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            imei: field("imei"),
        }
    }
}

fn parse_epoch_seconds(v: &serde_json::Value) -> Option<i64> {
    match v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Result of one provider lookup. Consumed immediately by the report renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome {
    Found(DeviceRecord),
    /// Provider explicitly reported no record; carries its `detail` text.
    NotFound(String),
    InsufficientBalance,
    ProviderError(crate::errors::ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(v: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_and_null_fields_are_not_provided() {
        let rec = DeviceRecord::from_properties(&props(json!({
            "deviceName": "iPhone 11",
            "warrantyStatus": null,
        })));
        assert_eq!(
            rec.device_name,
            Some(PropertyValue::Text("iPhone 11".to_string()))
        );
        assert_eq!(rec.warranty_status, None);
        assert_eq!(rec.network, None);
        assert_eq!(rec.image_url, None);
    }

    #[test]
    fn timestamps_accept_float_and_numeric_string() {
        let a = DeviceRecord::from_properties(&props(json!({"estPurchaseDate": 1600000000.7})));
        assert_eq!(a.purchase_timestamp, Some(1_600_000_000));

        let b = DeviceRecord::from_properties(&props(json!({"estPurchaseDate": "1600000000"})));
        assert_eq!(b.purchase_timestamp, Some(1_600_000_000));

        let c = DeviceRecord::from_properties(&props(json!({"estPurchaseDate": "soon"})));
        assert_eq!(c.purchase_timestamp, None);
    }

    #[test]
    fn flags_and_nested_values_display() {
        let rec = DeviceRecord::from_properties(&props(json!({
            "fmiOn": true,
            "lostMode": false,
            "network": ["GSM", "LTE"],
        })));
        assert_eq!(rec.find_my_device.unwrap().to_string(), "Yes");
        assert_eq!(rec.lost_mode.unwrap().to_string(), "No");
        assert_eq!(rec.network.unwrap().to_string(), r#"["GSM","LTE"]"#);
    }
}
