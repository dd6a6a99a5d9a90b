use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};
use uuid::Uuid;

use crate::domain::Regiao;
use crate::entities::{prelude::*, regioes};

pub struct RegiaoRepository {
    conn: DatabaseConnection,
}

impl RegiaoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn obter_todos(&self) -> Result<Vec<Regiao>> {
        let rows = Regioes::find()
            .order_by_asc(regioes::Column::Nome)
            .all(&self.conn)
            .await
            .context("Failed to query regions")?;

        rows.into_iter()
            .map(|m| {
                Ok(Regiao {
                    id: Uuid::parse_str(&m.id)
                        .with_context(|| format!("Invalid region id: {}", m.id))?,
                    nome: m.nome,
                })
            })
            .collect()
    }

    pub async fn count(&self) -> Result<u64> {
        Regioes::find()
            .count(&self.conn)
            .await
            .context("Failed to count regions")
    }
}
