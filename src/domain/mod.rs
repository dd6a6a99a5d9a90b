//! Domain types for users, access tokens and geographic reference data.
//!
//! Aggregates here are plain values: persistence lives in [`crate::db`], and
//! every repository read hands back a fully materialized aggregate.

pub mod email;
pub mod geo;
pub mod usuario;

pub use email::Email;
pub use geo::{Cidade, Estado, Regiao};
pub use usuario::{TokenAcesso, Usuario};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Invariant violations raised while building domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Password hash cannot be empty")]
    EmptyPasswordHash,

    #[error("Access token cannot be empty")]
    EmptyToken,

    #[error("Token creation time must be before its expiry")]
    InvalidTokenLifetime,

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

/// Unique identifier for a [`Usuario`].
///
/// Generated by the application, never by the database.
///
/// # Examples
///
/// ```rust
/// use sgp::domain::UsuarioId;
///
/// let id = UsuarioId::new();
/// assert!(!id.is_nil());
/// assert!(UsuarioId::nil().is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsuarioId(Uuid);

impl UsuarioId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub const fn value(&self) -> Uuid {
        self.0
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for UsuarioId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UsuarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UsuarioId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

impl From<Uuid> for UsuarioId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<UsuarioId> for Uuid {
    fn from(id: UsuarioId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usuario_id_round_trips_through_string() {
        let id = UsuarioId::new();
        let parsed: UsuarioId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn usuario_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<UsuarioId>().unwrap_err();
        assert_eq!(err, DomainError::InvalidId("not-a-uuid".to_string()));
    }

    #[test]
    fn generated_ids_are_never_nil() {
        assert!(!UsuarioId::new().is_nil());
        assert_ne!(UsuarioId::new(), UsuarioId::new());
    }
}
