//! Account roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role tag stored on profiles under `rol`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Back-office administrator.
    Administrador,
    /// Courier delivering orders.
    Repartidor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Administrador, Role::Repartidor];

    /// Value stored in the `rol` field.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "ADMINISTRADOR",
            Role::Repartidor => "REPARTIDOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMINISTRADOR" | "ADMIN" => Ok(Role::Administrador),
            "REPARTIDOR" | "COURIER" => Ok(Role::Repartidor),
            other => Err(format!(
                "unknown role '{other}', expected ADMINISTRADOR or REPARTIDOR"
            )),
        }
    }
}
