use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::domain::Estado;
use crate::entities::{estados, prelude::*};

pub struct EstadoRepository {
    conn: DatabaseConnection,
}

impl EstadoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: estados::Model) -> Result<Estado> {
        Ok(Estado {
            id: Uuid::parse_str(&m.id).with_context(|| format!("Invalid state id: {}", m.id))?,
            regiao_id: Uuid::parse_str(&m.regiao_id)
                .with_context(|| format!("Invalid region id: {}", m.regiao_id))?,
            uf: m.uf,
            nome: m.nome,
        })
    }

    pub async fn obter_todos(&self) -> Result<Vec<Estado>> {
        let rows = Estados::find()
            .order_by_asc(estados::Column::Uf)
            .all(&self.conn)
            .await
            .context("Failed to query states")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    pub async fn obter_por_regiao(&self, regiao_id: Uuid) -> Result<Vec<Estado>> {
        let rows = Estados::find()
            .filter(estados::Column::RegiaoId.eq(regiao_id.to_string()))
            .order_by_asc(estados::Column::Uf)
            .all(&self.conn)
            .await
            .context("Failed to query states by region")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    pub async fn obter_por_uf(&self, uf: &str) -> Result<Option<Estado>> {
        let uf = uf.trim().to_uppercase();
        if uf.is_empty() {
            return Ok(None);
        }

        let row = Estados::find()
            .filter(estados::Column::Uf.eq(uf))
            .one(&self.conn)
            .await
            .context("Failed to query state by abbreviation")?;

        row.map(Self::map_model).transpose()
    }

    pub async fn count(&self) -> Result<u64> {
        Estados::find()
            .count(&self.conn)
            .await
            .context("Failed to count states")
    }
}
