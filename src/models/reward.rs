use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{null_as_empty, timestamp};
use crate::api::{FormPayload, ImageUpload};
use crate::controller::{require, require_opt, Entity, Searchable, Tally, Validate};
use crate::error::ApiError;

/// Catalog item redeemable for points, supplied by a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    #[serde(default)]
    pub vendor_id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub points_required: i64,
    #[serde(default)]
    pub price_uzs: Decimal,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub issued_total: u64,
    #[serde(default)]
    pub popularity: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsStats {
    #[serde(default)]
    pub total_issued: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReward {
    pub vendor_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub price_uzs: Decimal,
    pub quantity: i64,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_required: Option<i64>,
    pub price_uzs: Option<Decimal>,
    pub quantity: Option<i64>,
    pub image: Option<ImageUpload>,
}

impl Reward {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

impl Entity for Reward {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Reward {
    /// Supplying vendor
    type Category = i64;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.name),
            Cow::Borrowed(&self.description),
            Cow::Owned(self.id.to_string()),
        ]
    }

    fn in_category(&self, vendor_id: &i64) -> bool {
        self.vendor_id == Some(*vendor_id)
    }
}

impl Tally<Reward> for RewardsStats {
    fn on_insert(&mut self, reward: &Reward) {
        self.total_issued += reward.issued_total;
    }

    fn on_remove(&mut self, reward: &Reward) {
        self.total_issued = self.total_issued.saturating_sub(reward.issued_total);
    }
}

fn check_amounts(points: Option<i64>, price: Option<Decimal>, quantity: Option<i64>) -> Result<(), ApiError> {
    if matches!(points, Some(p) if p <= 0) {
        return Err(ApiError::invalid_field("points_required", "must be greater than 0"));
    }
    if matches!(price, Some(p) if p.is_sign_negative()) {
        return Err(ApiError::invalid_field("price_uzs", "must not be negative"));
    }
    if matches!(quantity, Some(q) if q < 0) {
        return Err(ApiError::invalid_field("quantity", "must not be negative"));
    }
    Ok(())
}

impl Validate for NewReward {
    fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        check_amounts(Some(self.points_required), Some(self.price_uzs), Some(self.quantity))?;
        if self.image.is_none() {
            return Err(ApiError::missing_field("image"));
        }
        Ok(())
    }
}

impl Validate for RewardPatch {
    fn validate(&self) -> Result<(), ApiError> {
        require_opt("name", self.name.as_deref())?;
        check_amounts(self.points_required, self.price_uzs, self.quantity)
    }
}

impl NewReward {
    pub fn to_form(&self) -> Result<FormPayload, ApiError> {
        let image = self.image.clone().ok_or_else(|| ApiError::missing_field("image"))?;
        Ok(FormPayload::new()
            .text("name", self.name.trim())
            .text("description", self.description.as_deref().unwrap_or_default())
            .text("points_required", self.points_required)
            .text("price_uzs", self.price_uzs)
            .text("quantity", self.quantity)
            .text_opt("vendor_id", self.vendor_id)
            .file("image", image))
    }
}

impl RewardPatch {
    pub fn to_form(&self) -> FormPayload {
        let form = FormPayload::new()
            .text_opt("name", self.name.as_deref().map(str::trim))
            .text_opt("description", self.description.as_deref())
            .text_opt("points_required", self.points_required)
            .text_opt("price_uzs", self.price_uzs)
            .text_opt("quantity", self.quantity);
        match &self.image {
            Some(image) => form.file("image", image.clone()),
            None => form,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reward() -> NewReward {
        NewReward {
            vendor_id: Some(3),
            name: "Cinema ticket".into(),
            description: None,
            points_required: 200,
            price_uzs: Decimal::new(45000, 0),
            quantity: 10,
            image: Some(ImageUpload::new("ticket.jpg", vec![0xff, 0xd8])),
        }
    }

    #[test]
    fn create_requires_an_image() {
        let mut input = reward();
        assert!(input.validate().is_ok());
        input.image = None;
        assert_eq!(input.validate().unwrap_err(), ApiError::missing_field("image"));
    }

    #[test]
    fn points_must_be_positive() {
        let mut input = reward();
        input.points_required = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_form_sends_blank_description() {
        let form = reward().to_form().unwrap();
        assert_eq!(form.field("description"), Some(""));
        assert_eq!(form.field("price_uzs"), Some("45000"));
        assert_eq!(form.field("vendor_id"), Some("3"));
        assert_eq!(form.files[0].0, "image");
    }

    #[test]
    fn decodes_price_sent_as_string() {
        let reward: Reward = serde_json::from_value(json!({
            "id": 1, "vendor_id": 3, "name": "Cinema ticket", "description": null,
            "image": "/media/ticket.jpg", "points_required": 200, "price_uzs": "45000.00",
            "quantity": 10, "issued_total": 4, "popularity": 12,
            "created_at": "2024-04-01T09:00:00", "updated_at": "2024-04-02T09:00:00"
        }))
        .unwrap();
        assert_eq!(reward.price_uzs, Decimal::new(45000, 0));
        assert!(reward.description.is_empty());
        assert!(reward.in_category(&3));
    }
}
