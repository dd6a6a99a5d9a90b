//! CLI module - Command-line interface for SGP
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::db::Store;

/// SGP - users, access tokens and Brazilian geographic reference data
#[derive(Parser)]
#[command(name = "sgp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Seed regions, states and municipalities (idempotent)
    Seed,

    /// List the five geographic regions
    Regioes,

    /// List states, optionally restricted to one region
    Estados {
        /// Region name, e.g. "Sudeste"
        #[arg(long)]
        regiao: Option<String>,
    },

    /// List municipalities of a state
    Cidades {
        /// State abbreviation, e.g. SP
        uf: String,
    },

    /// Look up a municipality by its IBGE code
    Cidade {
        /// Seven-digit IBGE code
        ibge: String,
    },

    /// Manage users
    #[command(alias = "user")]
    Usuario {
        #[command(subcommand)]
        command: UsuarioCommands,
    },

    /// Exchange credentials for an access token
    Login {
        email: String,
        senha: String,
    },

    /// Show the user that owns an access token
    Whoami {
        token: String,
    },
}

#[derive(Subcommand)]
pub enum UsuarioCommands {
    /// Register a new user
    Add {
        nome: String,
        email: String,
        senha: String,
    },
    /// Show a user by id
    Show {
        /// User id (UUID)
        id: String,
    },
}

pub use commands::*;

pub async fn dispatch(config: &Config, store: &Store, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init => cmd_init(),
        Commands::Seed => cmd_seed(config, store).await,
        Commands::Regioes => cmd_regioes(store).await,
        Commands::Estados { regiao } => cmd_estados(store, regiao.as_deref()).await,
        Commands::Cidades { uf } => cmd_cidades(store, &uf).await,
        Commands::Cidade { ibge } => cmd_cidade(store, &ibge).await,
        Commands::Usuario { command } => match command {
            UsuarioCommands::Add { nome, email, senha } => {
                cmd_usuario_add(config, store, nome, email, senha).await
            }
            UsuarioCommands::Show { id } => cmd_usuario_show(config, store, &id).await,
        },
        Commands::Login { email, senha } => cmd_login(config, store, email, senha).await,
        Commands::Whoami { token } => cmd_whoami(config, store, &token).await,
    }
}
