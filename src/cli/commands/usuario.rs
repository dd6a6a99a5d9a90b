//! User and access-token command handlers

use uuid::Uuid;

use crate::config::Config;
use crate::db::Store;
use crate::domain::Usuario;
use crate::services::{AuthError, AuthService, SeaOrmAuthService};
use crate::validation::{AddUsuarioRequest, GetByIdRequest, LoginRequest};

fn print_usuario(usuario: &Usuario) {
    println!("{} <{}>", usuario.nome(), usuario.email());
    println!("  ID: {}", usuario.id());
    println!("  Tokens: {}", usuario.tokens().len());
}

/// Prints user-facing failures; anything else is propagated.
fn report(err: AuthError) -> anyhow::Result<()> {
    match err {
        AuthError::Validation(result) => {
            println!("Invalid request:");
            for failure in result.failures() {
                println!("  {}: {}", failure.field, failure.message);
            }
            Ok(())
        }
        e @ (AuthError::EmailAlreadyRegistered
        | AuthError::InvalidCredentials
        | AuthError::TokenExpired
        | AuthError::Unauthorized) => {
            println!("{e}");
            Ok(())
        }
        other => Err(other.into()),
    }
}

pub async fn cmd_usuario_add(
    config: &Config,
    store: &Store,
    nome: String,
    email: String,
    senha: String,
) -> anyhow::Result<()> {
    let service = SeaOrmAuthService::new(store.clone(), config);

    match service
        .registrar(AddUsuarioRequest { nome, email, senha })
        .await
    {
        Ok(usuario) => {
            println!("✓ Registered:");
            print_usuario(&usuario);
            Ok(())
        }
        Err(e) => report(e),
    }
}

pub async fn cmd_usuario_show(config: &Config, store: &Store, id: &str) -> anyhow::Result<()> {
    let Ok(id) = id.trim().parse::<Uuid>() else {
        println!("Invalid user ID: {id}");
        return Ok(());
    };

    let service = SeaOrmAuthService::new(store.clone(), config);
    match service.obter_usuario(GetByIdRequest::new(id)).await {
        Ok(Some(usuario)) => {
            print_usuario(&usuario);
            Ok(())
        }
        Ok(None) => {
            println!("User {id} not found.");
            Ok(())
        }
        Err(e) => report(e),
    }
}

pub async fn cmd_login(
    config: &Config,
    store: &Store,
    email: String,
    senha: String,
) -> anyhow::Result<()> {
    let service = SeaOrmAuthService::new(store.clone(), config);

    match service.autenticar(LoginRequest { email, senha }).await {
        Ok(token) => {
            println!("{}", token.token());
            println!("  Expires: {}", token.expira_em().to_rfc3339());
            Ok(())
        }
        Err(e) => report(e),
    }
}

pub async fn cmd_whoami(config: &Config, store: &Store, token: &str) -> anyhow::Result<()> {
    let service = SeaOrmAuthService::new(store.clone(), config);

    match service.obter_usuario_por_token(token).await {
        Ok(usuario) => {
            print_usuario(&usuario);
            Ok(())
        }
        Err(e) => report(e),
    }
}
