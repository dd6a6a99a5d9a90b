//! Transactional boundary for staged repository writes.
//!
//! Repositories never write directly: they stage [`PendingChange`]s on a
//! [`UnitOfWork`], and [`UnitOfWork::save_changes`] applies all of them inside
//! one database transaction. Either every staged change lands or none does.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, SqlErr,
    TransactionTrait,
};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::repositories::usuario::{token_active_model, usuario_active_model};
use crate::domain::{TokenAcesso, Usuario};
use crate::entities::{prelude::*, tokens_acesso};

/// Failure of a commit. The transaction has been rolled back when this is returned.
#[derive(Debug, Error)]
pub enum UnitOfWorkError {
    /// Uniqueness or referential constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(DbErr),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl UnitOfWorkError {
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<DbErr> for UnitOfWorkError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_),
            ) => Self::Conflict(err),
            _ => Self::Database(err),
        }
    }
}

/// A write waiting for the next commit.
#[derive(Debug, Clone)]
pub enum PendingChange {
    /// New user together with every token it owns.
    AddUsuario(Box<Usuario>),

    /// Token for a user that already exists in storage.
    AddToken(TokenAcesso),

    RemoveTokens(Vec<Uuid>),
}

pub struct UnitOfWork {
    conn: DatabaseConnection,
    pending: Vec<PendingChange>,
}

impl UnitOfWork {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            pending: Vec::new(),
        }
    }

    pub(crate) fn stage(&mut self, change: PendingChange) {
        self.pending.push(change);
    }

    /// Number of staged, uncommitted changes.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drops every staged change without touching storage.
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    /// Applies every staged change atomically and returns the number of rows written.
    ///
    /// The staged list is emptied whether the commit succeeds or not.
    pub async fn save_changes(&mut self) -> Result<u64, UnitOfWorkError> {
        let changes = std::mem::take(&mut self.pending);
        if changes.is_empty() {
            return Ok(0);
        }

        let txn = self.conn.begin().await?;
        let mut rows = 0u64;

        for change in &changes {
            match apply(&txn, change).await {
                Ok(n) => rows += n,
                Err(e) => {
                    if let Err(rollback_err) = txn.rollback().await {
                        warn!("Rollback after failed change also failed: {rollback_err}");
                    }
                    return Err(e.into());
                }
            }
        }

        txn.commit().await?;
        debug!(changes = changes.len(), rows, "Unit of work committed");
        Ok(rows)
    }
}

async fn apply(txn: &DatabaseTransaction, change: &PendingChange) -> Result<u64, DbErr> {
    match change {
        PendingChange::AddUsuario(usuario) => {
            let mut rows = Usuarios::insert(usuario_active_model(usuario))
                .exec_without_returning(txn)
                .await?;

            if !usuario.tokens().is_empty() {
                let tokens = usuario.tokens().iter().map(token_active_model);
                rows += TokensAcesso::insert_many(tokens)
                    .exec_without_returning(txn)
                    .await?;
            }
            Ok(rows)
        }
        PendingChange::AddToken(token) => {
            TokensAcesso::insert(token_active_model(token))
                .exec_without_returning(txn)
                .await
        }
        PendingChange::RemoveTokens(ids) => {
            if ids.is_empty() {
                return Ok(0);
            }
            let result = TokensAcesso::delete_many()
                .filter(tokens_acesso::Column::Id.is_in(ids.iter().map(Uuid::to_string)))
                .exec(txn)
                .await?;
            Ok(result.rows_affected)
        }
    }
}
