use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Staff role, gating which actions a signed-in user may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Cashier,
    #[default]
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Cashier => "cashier",
            Role::Guest => "guest",
        }
    }

    /// Admins and cashiers may ring up sales for any employee
    pub fn can_register_sales(&self) -> bool {
        matches!(self, Role::Admin | Role::Cashier)
    }

    /// Only admins may run cut reports and touch the loan ledger
    pub fn can_manage_finances(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "cashier" => Ok(Role::Cashier),
            "guest" => Ok(Role::Guest),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Staff profile row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name shown in summaries and reports
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
}

/// Profile row to insert for a freshly created auth identity
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub profile: UserProfile,
}

/// Body of the user provisioning endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl CreateUserRequest {
    pub fn into_profile(self) -> Result<UserProfile> {
        let profile = UserProfile {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            role: self.role.unwrap_or_default(),
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Body of the profile update endpoint; every field is required
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    pub fn into_parts(self) -> Result<(Uuid, UserProfile)> {
        let id = self
            .id
            .ok_or_else(|| AppError::validation("Missing required fields: id"))?;
        let role = self
            .role
            .ok_or_else(|| AppError::validation("Missing required fields: role"))?;
        let profile = UserProfile {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            role,
        };
        profile.validate()?;
        Ok((id, profile))
    }
}

impl UserProfile {
    fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("phone", &self.phone),
            ("email", &self.email),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if !self.email.contains('@') {
            return Err(AppError::validation(format!(
                "Invalid email address: {}",
                self.email
            )));
        }

        Ok(())
    }
}
