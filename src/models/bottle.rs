use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{string_or_number, timestamp};
use crate::api::{FormPayload, ImageUpload};
use crate::controller::{require, require_opt, Entity, Searchable, Tally, Validate};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleMaterial {
    Plastic,
    Aluminum,
}

/// Container type accepted by the machines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottle {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: String,
    pub material: BottleMaterial,
    pub sku: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BottleStats {
    pub total: u64,
}

/// Server-side filter of the bottles collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BottleQuery {
    pub search: Option<String>,
    pub material: Option<BottleMaterial>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBottle {
    pub name: String,
    /// Volume in litres as typed by the operator
    pub size: String,
    pub material: BottleMaterial,
    pub sku: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BottlePatch {
    pub name: Option<String>,
    pub size: Option<String>,
    pub material: Option<BottleMaterial>,
    pub sku: Option<String>,
    pub image: Option<ImageUpload>,
}

impl BottleMaterial {
    pub fn as_str(&self) -> &'static str {
        match self {
            BottleMaterial::Plastic => "plastic",
            BottleMaterial::Aluminum => "aluminum",
        }
    }
}

impl std::fmt::Display for BottleMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BottleMaterial {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plastic" => Ok(BottleMaterial::Plastic),
            "aluminum" | "aluminium" => Ok(BottleMaterial::Aluminum),
            other => Err(format!("unknown material '{}', expected plastic or aluminum", other)),
        }
    }
}

impl BottleQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(material) = self.material {
            pairs.push(("material".to_string(), material.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        pairs
    }
}

fn check_size(size: &str) -> Result<f64, ApiError> {
    require("size", size)?;
    match size.trim().replace(',', ".").parse::<f64>() {
        Ok(v) if v > 0.0 && v.is_finite() => Ok(v),
        _ => Err(ApiError::invalid_field("size", "must be a positive number")),
    }
}

impl Validate for NewBottle {
    fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        check_size(&self.size)?;
        require("sku", &self.sku)
    }
}

impl Validate for BottlePatch {
    fn validate(&self) -> Result<(), ApiError> {
        require_opt("name", self.name.as_deref())?;
        if let Some(size) = &self.size {
            check_size(size)?;
        }
        require_opt("sku", self.sku.as_deref())
    }
}

impl NewBottle {
    pub fn to_form(&self) -> Result<FormPayload, ApiError> {
        let size = check_size(&self.size)?;
        let form = FormPayload::new()
            .text("name", self.name.trim())
            .text("size", size)
            .text("material", self.material)
            .text("sku", self.sku.trim());
        Ok(match &self.image {
            Some(image) => form.file("image", image.clone()),
            None => form,
        })
    }
}

impl BottlePatch {
    pub fn to_form(&self) -> Result<FormPayload, ApiError> {
        let size = match &self.size {
            Some(s) => Some(check_size(s)?),
            None => None,
        };
        let form = FormPayload::new()
            .text_opt("name", self.name.as_deref().map(str::trim))
            .text_opt("size", size)
            .text_opt("material", self.material)
            .text_opt("sku", self.sku.as_deref().map(str::trim));
        Ok(match &self.image {
            Some(image) => form.file("image", image.clone()),
            None => form,
        })
    }
}

impl Entity for Bottle {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Bottle {
    type Category = BottleMaterial;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.name),
            Cow::Borrowed(&self.sku),
            Cow::Owned(self.id.to_string()),
        ]
    }

    fn in_category(&self, material: &BottleMaterial) -> bool {
        self.material == *material
    }
}

impl Tally<Bottle> for BottleStats {
    fn on_insert(&mut self, _bottle: &Bottle) {
        self.total += 1;
    }

    fn on_remove(&mut self, _bottle: &Bottle) {
        self.total = self.total.saturating_sub(1);
    }
}
