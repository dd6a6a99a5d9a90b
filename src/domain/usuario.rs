use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DomainError, Email, UsuarioId};

/// Timestamped access credential owned by exactly one [`Usuario`].
///
/// `criado_em < expira_em` holds for every instance; expiry is passive, an
/// expired token stays stored until its owner prunes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAcesso {
    id: Uuid,
    usuario_id: UsuarioId,
    token: String,
    criado_em: DateTime<Utc>,
    expira_em: DateTime<Utc>,
}

impl TokenAcesso {
    /// Creates a token not yet attached to a user.
    ///
    /// The owner back-reference is filled in by [`Usuario::adicionar_token`].
    pub fn new(
        token: impl Into<String>,
        criado_em: DateTime<Utc>,
        expira_em: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DomainError::EmptyToken);
        }
        if criado_em >= expira_em {
            return Err(DomainError::InvalidTokenLifetime);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            usuario_id: UsuarioId::nil(),
            token,
            criado_em,
            expira_em,
        })
    }

    /// Rebuilds a token read back from storage.
    pub(crate) fn from_parts(
        id: Uuid,
        usuario_id: UsuarioId,
        token: String,
        criado_em: DateTime<Utc>,
        expira_em: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if criado_em >= expira_em {
            return Err(DomainError::InvalidTokenLifetime);
        }
        Ok(Self {
            id,
            usuario_id,
            token,
            criado_em,
            expira_em,
        })
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn usuario_id(&self) -> UsuarioId {
        self.usuario_id
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub const fn criado_em(&self) -> DateTime<Utc> {
        self.criado_em
    }

    #[must_use]
    pub const fn expira_em(&self) -> DateTime<Utc> {
        self.expira_em
    }

    #[must_use]
    pub fn is_expirado(&self, now: DateTime<Utc>) -> bool {
        now >= self.expira_em
    }
}

/// User aggregate. Owns its access tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usuario {
    id: UsuarioId,
    nome: String,
    email: Email,
    hash_senha: String,
    tokens: Vec<TokenAcesso>,
}

impl Usuario {
    pub fn new(
        nome: impl Into<String>,
        email: Email,
        hash_senha: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let hash_senha = hash_senha.into();
        if hash_senha.trim().is_empty() {
            return Err(DomainError::EmptyPasswordHash);
        }

        Ok(Self {
            id: UsuarioId::new(),
            nome: nome.into(),
            email,
            hash_senha,
            tokens: Vec::new(),
        })
    }

    /// Rebuilds the aggregate from storage. Tokens must already carry `id` as owner.
    pub(crate) fn from_parts(
        id: UsuarioId,
        nome: String,
        email: Email,
        hash_senha: String,
        tokens: Vec<TokenAcesso>,
    ) -> Self {
        debug_assert!(tokens.iter().all(|t| t.usuario_id == id));
        Self {
            id,
            nome,
            email,
            hash_senha,
            tokens,
        }
    }

    #[must_use]
    pub const fn id(&self) -> UsuarioId {
        self.id
    }

    #[must_use]
    pub fn nome(&self) -> &str {
        &self.nome
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn hash_senha(&self) -> &str {
        &self.hash_senha
    }

    #[must_use]
    pub fn tokens(&self) -> &[TokenAcesso] {
        &self.tokens
    }

    /// Points the token's back-reference at this user, stores it and hands back a copy.
    pub fn adicionar_token(&mut self, mut token: TokenAcesso) -> TokenAcesso {
        token.usuario_id = self.id;
        self.tokens.push(token.clone());
        token
    }

    /// Most recently created token that is still valid at `now`.
    #[must_use]
    pub fn token_ativo(&self, now: DateTime<Utc>) -> Option<&TokenAcesso> {
        self.tokens
            .iter()
            .filter(|t| !t.is_expirado(now))
            .max_by_key(|t| t.criado_em)
    }

    #[must_use]
    pub fn find_token(&self, token: &str) -> Option<&TokenAcesso> {
        self.tokens.iter().find(|t| t.token == token)
    }

    /// Drops expired tokens and returns their ids.
    pub fn remover_tokens_expirados(&mut self, now: DateTime<Utc>) -> Vec<Uuid> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tokens)
            .into_iter()
            .partition(|t| t.is_expirado(now));
        self.tokens = kept;
        expired.into_iter().map(|t| t.id).collect()
    }

    /// Drops the oldest tokens until at most `max` remain and returns their ids.
    pub fn limitar_tokens(&mut self, max: usize) -> Vec<Uuid> {
        if self.tokens.len() <= max {
            return Vec::new();
        }
        self.tokens.sort_by_key(|t| t.criado_em);
        let excess = self.tokens.len() - max;
        self.tokens.drain(..excess).map(|t| t.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_at(offset_hours: i64) -> TokenAcesso {
        let criado = Utc::now() + Duration::hours(offset_hours);
        TokenAcesso::new(format!("tok-{offset_hours}"), criado, criado + Duration::hours(8))
            .unwrap()
    }

    fn usuario() -> Usuario {
        Usuario::new("fulano", Email::new("Fulano@Example.com"), "$argon2id$hash").unwrap()
    }

    #[test]
    fn token_requires_creation_before_expiry() {
        let now = Utc::now();
        assert_eq!(
            TokenAcesso::new("abc", now, now).unwrap_err(),
            DomainError::InvalidTokenLifetime
        );
        assert_eq!(
            TokenAcesso::new("abc", now, now - Duration::seconds(1)).unwrap_err(),
            DomainError::InvalidTokenLifetime
        );
        assert!(TokenAcesso::new("abc", now, now + Duration::seconds(1)).is_ok());
    }

    #[test]
    fn token_rejects_blank_string() {
        let now = Utc::now();
        assert_eq!(
            TokenAcesso::new("  ", now, now + Duration::hours(1)).unwrap_err(),
            DomainError::EmptyToken
        );
    }

    #[test]
    fn usuario_rejects_blank_hash() {
        assert_eq!(
            Usuario::new("x", Email::new("x@y.z"), "").unwrap_err(),
            DomainError::EmptyPasswordHash
        );
    }

    #[test]
    fn adicionar_token_sets_back_reference() {
        let mut u = usuario();
        let id = u.id();
        let token = token_at(0);
        assert!(token.usuario_id().is_nil());

        let added = u.adicionar_token(token);
        assert_eq!(added.usuario_id(), id);
        assert_eq!(u.tokens(), std::slice::from_ref(&added));

        let second = u.adicionar_token(token_at(1));
        assert_eq!(u.tokens().last(), Some(&second));
        assert_eq!(u.tokens().len(), 2);
    }

    #[test]
    fn token_ativo_picks_newest_unexpired() {
        let mut u = usuario();
        u.adicionar_token(token_at(-20));
        u.adicionar_token(token_at(-2));
        u.adicionar_token(token_at(-1));

        let ativo = u.token_ativo(Utc::now()).unwrap();
        assert_eq!(ativo.token(), "tok--1");
    }

    #[test]
    fn remover_tokens_expirados_keeps_valid_ones() {
        let mut u = usuario();
        u.adicionar_token(token_at(-20));
        u.adicionar_token(token_at(-1));

        let removed = u.remover_tokens_expirados(Utc::now());
        assert_eq!(removed.len(), 1);
        assert_eq!(u.tokens().len(), 1);
        assert_eq!(u.tokens()[0].token(), "tok--1");
    }

    #[test]
    fn limitar_tokens_drops_oldest() {
        let mut u = usuario();
        for h in [-3, -1, -2] {
            u.adicionar_token(token_at(h));
        }

        let removed = u.limitar_tokens(2);
        assert_eq!(removed.len(), 1);
        let remaining: Vec<_> = u.tokens().iter().map(TokenAcesso::token).collect();
        assert_eq!(remaining, vec!["tok--2", "tok--1"]);
        assert!(u.limitar_tokens(5).is_empty());
    }
}
