//! User entity.

use serde::{Deserialize, Serialize};

use super::alert::{deserialize_from_str, wire_token};
use crate::errors::SmartRentError;

/// Access role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = SmartRentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match wire_token(s).as_str() {
            "ADMIN" | "ADMINISTRATOR" | "ADMINISTRADOR" => Ok(Self::Admin),
            "USER" | "TENANT" | "USUARIO" => Ok(Self::User),
            _ => Err(SmartRentError::InvalidRole {
                role: s.to_string(),
            }),
        }
    }
}

deserialize_from_str!(UserRole);

/// A tenant or staff account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
