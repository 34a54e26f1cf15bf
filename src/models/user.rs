use std::borrow::Cow;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{null_as_empty, timestamp};
use crate::controller::{Entity, Searchable, Tally};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_BLOCKED: &str = "blocked";

/// End user of the mobile app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub bottle_count: i64,
    #[serde(default)]
    pub aluminum_bottle_count: i64,
    #[serde(default)]
    pub total_payout: Decimal,
    #[serde(default)]
    pub total_bottles_submitted: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub blocked: u64,
    #[serde(default)]
    pub new_this_month: u64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn display_name(&self) -> String {
        let full = self.full_name();
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.status == STATUS_BLOCKED
    }

    pub fn mark_blocked(&mut self) {
        self.is_active = false;
        self.status = STATUS_BLOCKED.to_string();
    }

    pub fn mark_active(&mut self) {
        self.is_active = true;
        self.status = STATUS_ACTIVE.to_string();
    }

    fn joined_this_month(&self) -> bool {
        let now = Utc::now();
        self.created_at.year() == now.year() && self.created_at.month() == now.month()
    }
}

impl Entity for User {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for User {
    /// Status value as sent by the API (`active`, `blocked`, `pending`)
    type Category = String;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.full_name()),
            Cow::Borrowed(&self.username),
            Cow::Borrowed(&self.email),
            Cow::Borrowed(&self.phone),
            Cow::Owned(self.id.to_string()),
        ]
    }

    fn in_category(&self, status: &String) -> bool {
        self.status.eq_ignore_ascii_case(status)
    }
}

impl Tally<User> for UsersStats {
    fn on_insert(&mut self, user: &User) {
        self.total += 1;
        match user.status.as_str() {
            STATUS_ACTIVE => self.active += 1,
            STATUS_BLOCKED => self.blocked += 1,
            _ => {}
        }
        if user.joined_this_month() {
            self.new_this_month += 1;
        }
    }

    fn on_remove(&mut self, user: &User) {
        self.total = self.total.saturating_sub(1);
        match user.status.as_str() {
            STATUS_ACTIVE => self.active = self.active.saturating_sub(1),
            STATUS_BLOCKED => self.blocked = self.blocked.saturating_sub(1),
            _ => {}
        }
        if user.joined_this_month() {
            self.new_this_month = self.new_this_month.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(status: &str) -> User {
        serde_json::from_value(json!({
            "id": 5, "username": "aziz", "avatar": null, "phone": "+998901112233",
            "first_name": "Aziz", "last_name": "Karimov", "email": null,
            "is_active": status == STATUS_ACTIVE, "status": status, "role": "user",
            "balance": "12500.00", "points": 340, "level": 2, "bottle_count": 40,
            "aluminum_bottle_count": 12, "total_payout": "8000", "total_bottles_submitted": 52,
            "created_at": "2023-11-02T10:15:00"
        }))
        .unwrap()
    }

    #[test]
    fn null_text_fields_become_empty() {
        let u = user(STATUS_ACTIVE);
        assert!(u.email.is_empty());
        assert_eq!(u.display_name(), "Aziz Karimov");
        assert_eq!(u.balance, Decimal::new(1250000, 2));
    }

    #[test]
    fn blocking_moves_user_between_counters() {
        let before = user(STATUS_ACTIVE);
        let mut after = before.clone();
        after.mark_blocked();

        let mut stats = UsersStats { total: 3, active: 2, blocked: 1, new_this_month: 0 };
        stats.on_replace(&before, &after);

        assert!(!after.is_active);
        assert!(after.is_blocked());
        assert_eq!(stats, UsersStats { total: 3, active: 1, blocked: 2, new_this_month: 0 });
    }

    #[test]
    fn search_covers_full_name_and_phone() {
        let u = user(STATUS_ACTIVE);
        let fields: Vec<String> = u.search_fields().into_iter().map(|f| f.into_owned()).collect();
        assert!(fields.contains(&"Aziz Karimov".to_string()));
        assert!(fields.contains(&"+998901112233".to_string()));
    }
}
