use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::db::unit_of_work::{PendingChange, UnitOfWork};
use crate::domain::{Email, TokenAcesso, Usuario, UsuarioId};
use crate::entities::{prelude::*, tokens_acesso, usuarios};

/// Repository for the user aggregate.
///
/// Every read returns the user with its full token collection. Writes are
/// staged on a [`UnitOfWork`] and only reach storage on commit.
pub struct UsuarioRepository {
    conn: DatabaseConnection,
}

impl UsuarioRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Staged writes
    // ========================================================================

    /// Stages a new user and its tokens. Email uniqueness is left to storage.
    pub fn add(&self, uow: &mut UnitOfWork, usuario: Usuario) {
        uow.stage(PendingChange::AddUsuario(Box::new(usuario)));
    }

    /// Stages a token for a user that is already stored.
    pub fn add_token(&self, uow: &mut UnitOfWork, token: TokenAcesso) {
        uow.stage(PendingChange::AddToken(token));
    }

    pub fn remove_tokens(&self, uow: &mut UnitOfWork, ids: Vec<Uuid>) {
        if !ids.is_empty() {
            uow.stage(PendingChange::RemoveTokens(ids));
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get_by_id(&self, id: UsuarioId) -> Result<Option<Usuario>> {
        let model = Usuarios::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        self.hydrate(model).await
    }

    pub async fn obter_por_email(&self, email: &Email) -> Result<Option<Usuario>> {
        let model = Usuarios::find()
            .filter(usuarios::Column::Email.eq(email.address()))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        self.hydrate(model).await
    }

    /// Owner of `token`, whether or not that token has expired.
    pub async fn obter_por_token(&self, token: &str) -> Result<Option<Usuario>> {
        if token.is_empty() {
            return Ok(None);
        }

        let model = Usuarios::find()
            .inner_join(TokensAcesso)
            .filter(tokens_acesso::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query user by access token")?;

        self.hydrate(model).await
    }

    pub async fn verifica_se_email_existe(&self, email: &Email) -> Result<bool> {
        let count = Usuarios::find()
            .filter(usuarios::Column::Email.eq(email.address()))
            .count(&self.conn)
            .await
            .context("Failed to check email existence")?;

        Ok(count > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Usuarios::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    pub async fn count_tokens(&self) -> Result<u64> {
        TokensAcesso::find()
            .count(&self.conn)
            .await
            .context("Failed to count access tokens")
    }

    async fn hydrate(&self, model: Option<usuarios::Model>) -> Result<Option<Usuario>> {
        let Some(model) = model else {
            return Ok(None);
        };

        let tokens = model
            .find_related(TokensAcesso)
            .order_by_asc(tokens_acesso::Column::CriadoEm)
            .all(&self.conn)
            .await
            .context("Failed to load access tokens")?;

        map_usuario_model(model, tokens).map(Some)
    }
}

// ============================================================================
// Model Conversion Helpers
// ============================================================================

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("Invalid stored timestamp: {raw}"))
}

fn map_token_model(m: tokens_acesso::Model) -> Result<TokenAcesso> {
    let id = Uuid::parse_str(&m.id).with_context(|| format!("Invalid token id: {}", m.id))?;
    let usuario_id: UsuarioId = m.usuario_id.parse()?;
    let criado_em = parse_timestamp(&m.criado_em)?;
    let expira_em = parse_timestamp(&m.expira_em)?;

    Ok(TokenAcesso::from_parts(
        id, usuario_id, m.token, criado_em, expira_em,
    )?)
}

fn map_usuario_model(m: usuarios::Model, tokens: Vec<tokens_acesso::Model>) -> Result<Usuario> {
    let id: UsuarioId = m.id.parse()?;
    let tokens = tokens
        .into_iter()
        .map(map_token_model)
        .collect::<Result<Vec<_>>>()?;

    Ok(Usuario::from_parts(
        id,
        m.nome,
        Email::new(&m.email),
        m.hash_senha,
        tokens,
    ))
}

pub(crate) fn usuario_active_model(u: &Usuario) -> usuarios::ActiveModel {
    usuarios::ActiveModel {
        id: Set(u.id().to_string()),
        nome: Set(u.nome().to_string()),
        email: Set(u.email().address().to_string()),
        hash_senha: Set(u.hash_senha().to_string()),
    }
}

pub(crate) fn token_active_model(t: &TokenAcesso) -> tokens_acesso::ActiveModel {
    tokens_acesso::ActiveModel {
        id: Set(t.id().to_string()),
        usuario_id: Set(t.usuario_id().to_string()),
        token: Set(t.token().to_string()),
        criado_em: Set(format_timestamp(t.criado_em())),
        expira_em: Set(format_timestamp(t.expira_em())),
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check `password` against a PHC-formatted hash. Parameters are read from the hash.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a random access token (64 character hex string)
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(
        String::with_capacity(crate::constants::auth::TOKEN_LENGTH),
        |mut acc, b| {
            use std::fmt::Write;
            let _ = write!(acc, "{b:02x}");
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse", &fast_params()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "correct horse").unwrap());
        assert!(!verify_password(&hash, "battery staple").unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(verify_password("not-a-phc-string", "whatever").is_err());
    }

    #[test]
    fn generated_tokens_are_hex_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn timestamps_round_trip_exactly() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&format_timestamp(now)).unwrap(), now);
    }
}
