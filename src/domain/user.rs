//! User profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role; unknown values fall back to `User`
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Profile data as returned to the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// Whitelisted profile changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the changes to a profile in memory
    pub fn apply_to(&self, profile: &mut UserProfile) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                target.clone_from(v);
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<String>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        set(&mut profile.first_name, &self.first_name);
        set(&mut profile.last_name, &self.last_name);
        set(&mut profile.email, &self.email);
        set_opt(&mut profile.phone, &self.phone);
        set_opt(&mut profile.address, &self.address);
        set_opt(&mut profile.city, &self.city);
        set_opt(&mut profile.state, &self.state);
        set_opt(&mut profile.zip_code, &self.zip_code);
        set_opt(&mut profile.country, &self.country);
        profile.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            address: None,
            city: Some("London".to_string()),
            state: None,
            zip_code: None,
            country: None,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut p = profile();
        let changes = ProfileChanges {
            last_name: Some("King".to_string()),
            phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        changes.apply_to(&mut p);

        assert_eq!(p.first_name, "Ada");
        assert_eq!(p.last_name, "King");
        assert_eq!(p.phone.as_deref(), Some("555-0100"));
        assert_eq!(p.city.as_deref(), Some("London"));
    }

    #[test]
    fn test_empty_changes() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            city: Some("Paris".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_role_from_db() {
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert_eq!(Role::from_db("anything"), Role::User);
    }
}
