use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::domain::Cidade;
use crate::domain::geo::is_ibge_code;
use crate::entities::{cidades, prelude::*};

/// Read-only access to municipalities.
pub struct CidadeRepository {
    conn: DatabaseConnection,
}

impl CidadeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: cidades::Model) -> Cidade {
        Cidade {
            ibge: m.ibge,
            uf: m.uf,
            nome: m.nome,
        }
    }

    /// Cities of one state, ordered by name. Unknown states yield an empty list.
    pub async fn get_all(&self, uf: &str) -> Result<Vec<Cidade>> {
        let uf = uf.trim().to_uppercase();
        if uf.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Cidades::find()
            .filter(cidades::Column::Uf.eq(uf.as_str()))
            .order_by_asc(cidades::Column::Nome)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to query cities of {uf}"))?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Distinct state abbreviations that have cities, ascending.
    pub async fn get_all_estados(&self) -> Result<Vec<String>> {
        Cidades::find()
            .select_only()
            .column(cidades::Column::Uf)
            .distinct()
            .order_by_asc(cidades::Column::Uf)
            .into_tuple::<String>()
            .all(&self.conn)
            .await
            .context("Failed to query state abbreviations")
    }

    /// Malformed codes resolve to `None` without touching storage.
    pub async fn get_by_ibge(&self, ibge: &str) -> Result<Option<Cidade>> {
        if !is_ibge_code(ibge) {
            return Ok(None);
        }

        let row = Cidades::find_by_id(ibge.to_string())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query city {ibge}"))?;

        Ok(row.map(Self::map_model))
    }

    pub async fn count(&self) -> Result<u64> {
        Cidades::find()
            .count(&self.conn)
            .await
            .context("Failed to count cities")
    }
}
