//! Domain service for user registration and access-token authentication.

use thiserror::Error;

use crate::db::UnitOfWorkError;
use crate::domain::{DomainError, TokenAcesso, Usuario};
use crate::validation::{AddUsuarioRequest, GetByIdRequest, LoginRequest, ValidationResult};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<UnitOfWorkError> for AuthError {
    fn from(err: UnitOfWorkError) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for malformed requests and
    /// [`AuthError::EmailAlreadyRegistered`] when the address is taken.
    async fn registrar(&self, request: AddUsuarioRequest) -> Result<Usuario, AuthError>;

    /// Verifies credentials and issues a fresh access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn autenticar(&self, request: LoginRequest) -> Result<TokenAcesso, AuthError>;

    /// Resolves the owner of a token that has not expired yet.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] for unknown tokens and
    /// [`AuthError::TokenExpired`] for expired ones.
    async fn obter_usuario_por_token(&self, token: &str) -> Result<Usuario, AuthError>;

    /// Loads a user by id after validating the request.
    async fn obter_usuario(&self, request: GetByIdRequest) -> Result<Option<Usuario>, AuthError>;
}
