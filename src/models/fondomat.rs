use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{null_as_empty, timestamp};
use crate::controller::{require, require_opt, Entity, Searchable, Tally, Validate};
use crate::error::ApiError;

/// Reverse-vending machine accepting containers in exchange for points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fondomat {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default)]
    pub latitude: Decimal,
    #[serde(default)]
    pub longitude: Decimal,
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default)]
    pub collected_total: i64,
    #[serde(default)]
    pub total_income: Decimal,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

/// Machine record with the telemetry shown on the detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedFondomat {
    #[serde(flatten)]
    pub fondomat: Fondomat,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub installation_date: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub last_maintenance: Option<DateTime<Utc>>,
    #[serde(default)]
    pub collected_today: i64,
    #[serde(default)]
    pub collected_week: i64,
    #[serde(default)]
    pub collected_month: i64,
    #[serde(default)]
    pub avg_collected_per_day: f64,
    #[serde(default)]
    pub peak_hour_start: Option<String>,
    #[serde(default)]
    pub peak_hour_end: Option<String>,
    #[serde(default)]
    pub min_activity_hour_start: Option<String>,
    #[serde(default)]
    pub min_activity_hour_end: Option<String>,
    #[serde(default)]
    pub points_issued: i64,
    #[serde(default)]
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FondomatStatus {
    Active,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FondomatStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub maintenance: u64,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub total_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub qr_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFondomat {
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_active: bool,
    pub status: FondomatStatus,
    pub model: String,
    pub software_version: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FondomatPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FondomatStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl FondomatStatus {
    /// Anything the API reports besides `active` and `maintenance` counts as inactive.
    pub fn of(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "active" => FondomatStatus::Active,
            "maintenance" => FondomatStatus::Maintenance,
            _ => FondomatStatus::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FondomatStatus::Active => "active",
            FondomatStatus::Maintenance => "maintenance",
            FondomatStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for FondomatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FondomatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(FondomatStatus::Active),
            "maintenance" => Ok(FondomatStatus::Maintenance),
            "inactive" => Ok(FondomatStatus::Inactive),
            other => Err(format!(
                "unknown status '{}', expected active, maintenance or inactive",
                other
            )),
        }
    }
}

impl Fondomat {
    pub fn status_kind(&self) -> FondomatStatus {
        FondomatStatus::of(&self.status)
    }
}

impl Entity for Fondomat {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Fondomat {
    type Category = FondomatStatus;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.name),
            Cow::Borrowed(&self.location),
            Cow::Owned(self.id.to_string()),
        ]
    }

    fn in_category(&self, status: &FondomatStatus) -> bool {
        self.status_kind() == *status
    }
}

impl Tally<Fondomat> for FondomatStats {
    fn on_insert(&mut self, fondomat: &Fondomat) {
        self.total += 1;
        match fondomat.status_kind() {
            FondomatStatus::Active => self.active += 1,
            FondomatStatus::Maintenance => self.maintenance += 1,
            FondomatStatus::Inactive => self.inactive += 1,
        }
        self.total_income += fondomat.total_income;
    }

    fn on_remove(&mut self, fondomat: &Fondomat) {
        self.total = self.total.saturating_sub(1);
        let counter = match fondomat.status_kind() {
            FondomatStatus::Active => &mut self.active,
            FondomatStatus::Maintenance => &mut self.maintenance,
            FondomatStatus::Inactive => &mut self.inactive,
        };
        *counter = counter.saturating_sub(1);
        self.total_income -= fondomat.total_income;
    }
}

fn check_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), ApiError> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ApiError::invalid_field("latitude", "must be between -90 and 90"));
        }
    }
    if let Some(lon) = longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ApiError::invalid_field("longitude", "must be between -180 and 180"));
        }
    }
    Ok(())
}

impl Validate for NewFondomat {
    fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("location", &self.location)?;
        check_coordinates(Some(self.latitude), Some(self.longitude))
    }
}

impl Validate for FondomatPatch {
    fn validate(&self) -> Result<(), ApiError> {
        require_opt("name", self.name.as_deref())?;
        require_opt("location", self.location.as_deref())?;
        check_coordinates(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn machine(status: &str, income: i64) -> Fondomat {
        serde_json::from_value(json!({
            "id": 1, "name": "Chilonzor-1", "location": "Chilonzor metro",
            "latitude": "41.2756", "longitude": "69.2034", "is_active": status == "active",
            "status": status, "collected_total": 120, "total_income": income.to_string(),
            "created_at": "2024-01-10T08:00:00"
        }))
        .unwrap()
    }

    #[test]
    fn unknown_status_counts_as_inactive() {
        assert_eq!(FondomatStatus::of("Maintenance"), FondomatStatus::Maintenance);
        assert_eq!(FondomatStatus::of("offline"), FondomatStatus::Inactive);
    }

    #[test]
    fn tally_partitions_by_status_and_tracks_income() {
        let mut stats = FondomatStats::default();
        stats.on_insert(&machine("active", 100));
        stats.on_insert(&machine("maintenance", 40));
        stats.on_remove(&machine("maintenance", 40));
        assert_eq!(stats.total, 1);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.maintenance, 0);
        assert_eq!(stats.total_income, Decimal::new(100, 0));
    }

    #[test]
    fn detailed_fondomat_flattens_base_record() {
        let detailed: DetailedFondomat = serde_json::from_value(json!({
            "id": 9, "name": "Yunusobod", "location": "Mega Planet", "latitude": "41.36",
            "longitude": "69.28", "is_active": true, "status": "active", "collected_total": 5,
            "total_income": "1500.00", "created_at": "2024-01-10T08:00:00Z",
            "model": "YX-200", "installation_date": "2024-01-01", "last_maintenance": null,
            "collected_today": 3, "peak_hour_start": "18:00", "points_issued": 77
        }))
        .unwrap();
        assert_eq!(detailed.fondomat.id, 9);
        assert_eq!(detailed.model.as_deref(), Some("YX-200"));
        assert!(detailed.installation_date.is_some());
        assert!(detailed.last_maintenance.is_none());
        assert_eq!(detailed.points_issued, 77);
    }

    #[test]
    fn coordinates_are_range_checked() {
        let patch = FondomatPatch {
            latitude: Some(91.0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(FondomatPatch::default().validate().is_ok());
    }
}
