//! `SeaORM` implementation of the `AuthService` trait.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::task;
use tracing::{info, warn};

use crate::config::{AuthConfig, Config, SecurityConfig};
use crate::db::Store;
use crate::db::repositories::usuario::{generate_token, hash_password, verify_password};
use crate::domain::{Email, TokenAcesso, Usuario, UsuarioId};
use crate::services::auth_service::{AuthError, AuthService};
use crate::validation::{
    AddUsuarioRequest, AddUsuarioRequestValidator, GetByIdRequest, GetByIdRequestValidator,
    LoginRequest, LoginRequestValidator,
};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    auth: AuthConfig,
    add_usuario_validator: AddUsuarioRequestValidator,
    login_validator: LoginRequestValidator,
    get_by_id_validator: GetByIdRequestValidator,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            security: config.security.clone(),
            auth: config.auth.clone(),
            add_usuario_validator: AddUsuarioRequestValidator::new(&config.auth),
            login_validator: LoginRequestValidator::new(),
            get_by_id_validator: GetByIdRequestValidator::new(),
        }
    }

    fn login_failed() -> AuthError {
        metrics::counter!("auth_logins_total", "result" => "failure").increment(1);
        AuthError::InvalidCredentials
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn registrar(&self, request: AddUsuarioRequest) -> Result<Usuario, AuthError> {
        let validation = self.add_usuario_validator.validate(&request);
        if !validation.is_valid() {
            return Err(AuthError::Validation(validation));
        }

        let email = Email::new(request.email.trim());
        let repo = self.store.usuarios();

        if repo.verifica_se_email_existe(&email).await? {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        // Argon2 is CPU-bound; keep it off the async workers
        let senha = request.senha;
        let security = self.security.clone();
        let hash = task::spawn_blocking(move || hash_password(&senha, &security))
            .await
            .context("Password hashing task panicked")??;

        let usuario = Usuario::new(request.nome.trim(), email, hash)?;

        let mut uow = self.store.unit_of_work();
        repo.add(&mut uow, usuario.clone());

        match uow.save_changes().await {
            Ok(_) => {}
            // Lost a race against another registration with the same address
            Err(e) if e.is_conflict() => return Err(AuthError::EmailAlreadyRegistered),
            Err(e) => return Err(e.into()),
        }

        metrics::counter!("auth_registrations_total").increment(1);
        info!(usuario_id = %usuario.id(), "User registered");
        Ok(usuario)
    }

    async fn autenticar(&self, request: LoginRequest) -> Result<TokenAcesso, AuthError> {
        let validation = self.login_validator.validate(&request);
        if !validation.is_valid() {
            return Err(AuthError::Validation(validation));
        }

        let email = Email::new(request.email.trim());
        let repo = self.store.usuarios();

        let Some(mut usuario) = repo.obter_por_email(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(Self::login_failed());
        };

        let password_hash = usuario.hash_senha().to_string();
        let senha = request.senha;
        let is_valid = task::spawn_blocking(move || verify_password(&password_hash, &senha))
            .await
            .context("Password verification task panicked")??;

        if !is_valid {
            warn!(usuario_id = %usuario.id(), "Login attempt with wrong password");
            return Err(Self::login_failed());
        }

        let now = Utc::now();
        let mut uow = self.store.unit_of_work();

        let mut stale = usuario.remover_tokens_expirados(now);
        stale.extend(usuario.limitar_tokens(self.auth.max_tokens_per_user.saturating_sub(1)));
        repo.remove_tokens(&mut uow, stale);

        let ttl = Duration::hours(i64::from(self.auth.token_ttl_hours));
        let token = TokenAcesso::new(generate_token(), now, now + ttl)?;
        let token = usuario.adicionar_token(token);
        repo.add_token(&mut uow, token.clone());

        uow.save_changes().await?;

        metrics::counter!("auth_logins_total", "result" => "success").increment(1);
        info!(usuario_id = %usuario.id(), expira_em = %token.expira_em(), "Access token issued");
        Ok(token)
    }

    async fn obter_usuario_por_token(&self, token: &str) -> Result<Usuario, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Unauthorized);
        }

        let usuario = self
            .store
            .usuarios()
            .obter_por_token(token)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let matched = usuario.find_token(token).ok_or(AuthError::Unauthorized)?;
        if matched.is_expirado(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(usuario)
    }

    async fn obter_usuario(&self, request: GetByIdRequest) -> Result<Option<Usuario>, AuthError> {
        let validation = self.get_by_id_validator.validate(&request);
        if !validation.is_valid() {
            return Err(AuthError::Validation(validation));
        }

        let Some(id) = request.id else {
            return Ok(None);
        };

        Ok(self.store.usuarios().get_by_id(UsuarioId::from(id)).await?)
    }
}
