use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{null_as_empty, timestamp};
use crate::controller::{require, require_opt, Entity, Searchable, Tally, Validate};
use crate::error::ApiError;

/// Third-party supplier of rewards, with its own platform login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub login: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contact_email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contact_phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub terms: String,
    #[serde(default)]
    pub commission_percent: Decimal,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Vendor counters. The API sends none, so they are derived from the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VendorStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorState {
    Active,
    Inactive,
}

/// Generated credentials. Shown to the operator once and never cached.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCredentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VendorCreated {
    pub vendor: Vendor,
    #[serde(flatten)]
    pub credentials: VendorCredentials,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVendor {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub terms: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub commission_percent: Decimal,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VendorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub commission_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl std::fmt::Debug for VendorCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorCredentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl VendorStats {
    pub fn from_vendors(vendors: &[Vendor]) -> Self {
        let mut stats = Self::default();
        for vendor in vendors {
            stats.on_insert(vendor);
        }
        stats
    }
}

impl Entity for Vendor {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Vendor {
    type Category = VendorState;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.name),
            Cow::Borrowed(&self.login),
            Cow::Borrowed(&self.contact_email),
            Cow::Borrowed(&self.contact_phone),
        ]
    }

    fn in_category(&self, state: &VendorState) -> bool {
        match state {
            VendorState::Active => self.is_active,
            VendorState::Inactive => !self.is_active,
        }
    }
}

impl Tally<Vendor> for VendorStats {
    fn on_insert(&mut self, vendor: &Vendor) {
        self.total += 1;
        if vendor.is_active {
            self.active += 1;
        } else {
            self.inactive += 1;
        }
    }

    fn on_remove(&mut self, vendor: &Vendor) {
        self.total = self.total.saturating_sub(1);
        if vendor.is_active {
            self.active = self.active.saturating_sub(1);
        } else {
            self.inactive = self.inactive.saturating_sub(1);
        }
    }
}

fn check_commission(value: Decimal) -> Result<(), ApiError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ApiError::invalid_field("commission_percent", "must be between 0 and 100"));
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), ApiError> {
    if !value.contains('@') {
        return Err(ApiError::invalid_field("contact_email", "must be an email address"));
    }
    Ok(())
}

impl Validate for NewVendor {
    fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("contact_email", &self.contact_email)?;
        check_email(&self.contact_email)?;
        require("contact_phone", &self.contact_phone)?;
        check_commission(self.commission_percent)
    }
}

impl Validate for VendorPatch {
    fn validate(&self) -> Result<(), ApiError> {
        require_opt("name", self.name.as_deref())?;
        require_opt("login", self.login.as_deref())?;
        require_opt("contact_email", self.contact_email.as_deref())?;
        if let Some(email) = &self.contact_email {
            check_email(email)?;
        }
        require_opt("contact_phone", self.contact_phone.as_deref())?;
        if let Some(commission) = self.commission_percent {
            check_commission(commission)?;
        }
        Ok(())
    }
}
