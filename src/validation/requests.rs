use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use super::{ValidationResult, Validator};
use crate::config::AuthConfig;
use crate::constants::limits::{MAX_EMAIL_LENGTH, MAX_NOME_LENGTH};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"))
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Lookup by generated identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetByIdRequest {
    pub id: Option<Uuid>,
}

impl GetByIdRequest {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self { id: Some(id) }
    }
}

/// Identifier must be present, non-empty and not the nil UUID.
pub struct GetByIdRequestValidator {
    validator: Validator<GetByIdRequest>,
}

impl GetByIdRequestValidator {
    #[must_use]
    pub fn new() -> Self {
        let validator = Validator::new()
            .rule("id", |r: &GetByIdRequest| r.id.is_some(), "'Id' must not be null.")
            .rule(
                "id",
                |r: &GetByIdRequest| r.id.is_some_and(|id| !id.is_nil()),
                "'Id' must not be empty.",
            )
            .rule(
                "id",
                |r: &GetByIdRequest| r.id.is_none_or(|id| !id.is_nil()),
                format!("'Id' must not be equal to '{}'.", Uuid::nil()),
            );
        Self { validator }
    }

    pub fn validate(&self, request: &GetByIdRequest) -> ValidationResult {
        self.validator.validate(request)
    }
}

impl Default for GetByIdRequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddUsuarioRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

pub struct AddUsuarioRequestValidator {
    validator: Validator<AddUsuarioRequest>,
}

impl AddUsuarioRequestValidator {
    #[must_use]
    pub fn new(auth: &AuthConfig) -> Self {
        let min_password = auth.min_password_length;
        let validator = Validator::new()
            .rule(
                "nome",
                |r: &AddUsuarioRequest| !is_blank(&r.nome),
                "'Nome' must not be empty.",
            )
            .rule(
                "nome",
                |r: &AddUsuarioRequest| r.nome.trim().chars().count() <= MAX_NOME_LENGTH,
                format!("'Nome' must be {MAX_NOME_LENGTH} characters or fewer."),
            )
            .rule(
                "email",
                |r: &AddUsuarioRequest| !is_blank(&r.email),
                "'Email' must not be empty.",
            )
            .rule(
                "email",
                |r: &AddUsuarioRequest| is_blank(&r.email) || email_regex().is_match(r.email.trim()),
                "'Email' is not a valid email address.",
            )
            .rule(
                "email",
                |r: &AddUsuarioRequest| r.email.trim().chars().count() <= MAX_EMAIL_LENGTH,
                format!("'Email' must be {MAX_EMAIL_LENGTH} characters or fewer."),
            )
            .rule(
                "senha",
                |r: &AddUsuarioRequest| !r.senha.is_empty(),
                "'Senha' must not be empty.",
            )
            .rule(
                "senha",
                move |r: &AddUsuarioRequest| {
                    r.senha.is_empty() || r.senha.chars().count() >= min_password
                },
                format!("'Senha' must be at least {min_password} characters."),
            );
        Self { validator }
    }

    pub fn validate(&self, request: &AddUsuarioRequest) -> ValidationResult {
        self.validator.validate(request)
    }
}

/// Credentials exchanged for an access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

pub struct LoginRequestValidator {
    validator: Validator<LoginRequest>,
}

impl LoginRequestValidator {
    #[must_use]
    pub fn new() -> Self {
        let validator = Validator::new()
            .rule(
                "email",
                |r: &LoginRequest| !is_blank(&r.email),
                "'Email' must not be empty.",
            )
            .rule(
                "senha",
                |r: &LoginRequest| !r.senha.is_empty(),
                "'Senha' must not be empty.",
            );
        Self { validator }
    }

    pub fn validate(&self, request: &LoginRequest) -> ValidationResult {
        self.validator.validate(request)
    }
}

impl Default for LoginRequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_by_id_rejects_nil_id() {
        let result = GetByIdRequestValidator::new().validate(&GetByIdRequest::new(Uuid::nil()));
        assert!(!result.is_valid());
        assert!(result.failures().iter().all(|f| f.field == "id"));
    }

    #[test]
    fn get_by_id_rejects_missing_id() {
        let result = GetByIdRequestValidator::new().validate(&GetByIdRequest::default());
        assert!(!result.is_valid());
        assert_eq!(
            result.failures_for("id").next(),
            Some("'Id' must not be null.")
        );
    }

    #[test]
    fn get_by_id_accepts_generated_id() {
        let result = GetByIdRequestValidator::new().validate(&GetByIdRequest::new(Uuid::new_v4()));
        assert!(result.is_valid());
    }

    fn add_request(nome: &str, email: &str, senha: &str) -> AddUsuarioRequest {
        AddUsuarioRequest {
            nome: nome.to_string(),
            email: email.to_string(),
            senha: senha.to_string(),
        }
    }

    #[test]
    fn add_usuario_accepts_well_formed_request() {
        let validator = AddUsuarioRequestValidator::new(&AuthConfig::default());
        let result = validator.validate(&add_request("Fulano", "Fulano@Example.com", "s3nha-forte"));
        assert!(result.is_valid(), "{result}");
    }

    #[test]
    fn add_usuario_reports_each_bad_field() {
        let validator = AddUsuarioRequestValidator::new(&AuthConfig::default());
        let result = validator.validate(&add_request("", "not-an-email", "short"));

        assert_eq!(result.failures_for("nome").count(), 1);
        assert_eq!(
            result.failures_for("email").collect::<Vec<_>>(),
            vec!["'Email' is not a valid email address."]
        );
        assert_eq!(
            result.failures_for("senha").collect::<Vec<_>>(),
            vec!["'Senha' must be at least 8 characters."]
        );
    }

    #[test]
    fn add_usuario_empty_fields_report_only_required() {
        let validator = AddUsuarioRequestValidator::new(&AuthConfig::default());
        let result = validator.validate(&AddUsuarioRequest::default());
        let fields: Vec<_> = result.failures().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["nome", "email", "senha"]);
    }

    #[test]
    fn add_usuario_length_limits_ignore_surrounding_whitespace() {
        let validator = AddUsuarioRequestValidator::new(&AuthConfig::default());

        // 100 characters once trimmed
        let email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH - 12));
        let nome = "n".repeat(MAX_NOME_LENGTH);
        let padded = add_request(&format!("  {nome}  "), &format!("  {email}  "), "s3nha-forte");
        assert!(validator.validate(&padded).is_valid());

        let long_email = format!("a{email}");
        let result = validator.validate(&add_request(&nome, &long_email, "s3nha-forte"));
        assert_eq!(
            result.failures_for("email").collect::<Vec<_>>(),
            vec!["'Email' must be 100 characters or fewer."]
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let validator = LoginRequestValidator::new();
        assert_eq!(validator.validate(&LoginRequest::default()).failures().len(), 2);
        let ok = LoginRequest {
            email: "a@b.c".to_string(),
            senha: "x".to_string(),
        };
        assert!(validator.validate(&ok).is_valid());
    }
}
