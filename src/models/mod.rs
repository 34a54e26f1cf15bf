//! Records and payloads exchanged with the admin API.

pub mod bottle;
pub mod dashboard;
pub mod fondomat;
pub mod reward;
pub mod user;
pub mod vendor;

pub use bottle::{Bottle, BottleMaterial, BottlePatch, BottleQuery, BottleStats, NewBottle};
pub use dashboard::{DashboardStats, DashboardSummary, RewardIssued};
pub use fondomat::{
    DetailedFondomat, Fondomat, FondomatPatch, FondomatStats, FondomatStatus, NewFondomat, QrCode,
};
pub use reward::{NewReward, Reward, RewardPatch, RewardsStats};
pub use user::{User, UsersStats};
pub use vendor::{
    NewVendor, Vendor, VendorCreated, VendorCredentials, VendorPatch, VendorState, VendorStats,
};

use serde::{Deserialize, Deserializer};

/// Text fields the API may send as `null`.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields the API sends either as a JSON string or a number (`"0.5"` / `0.5`).
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Null(()) => String::new(),
    })
}

/// Timestamps arrive either as RFC 3339 or as naive ISO strings (assumed UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Result<DateTime<Utc>, String> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| format!("invalid timestamp: {}", value))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_str(&v.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => super::parse(&raw).map(Some).map_err(D::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
