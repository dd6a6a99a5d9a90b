//! Idempotent population of geographic reference data.
//!
//! Regions and states are compiled in. Municipalities come from the dataset
//! embedded from `data/cidades.json`, or from a full IBGE export when
//! `seed.cidades_path` is configured. Every insert is keyed on the natural key
//! with `ON CONFLICT DO NOTHING`, so re-running the seed (or running two seeds
//! at once) never duplicates rows.

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SeedConfig;
use crate::constants::reference::{TOTAL_ESTADOS, TOTAL_REGIOES};
use crate::domain::Cidade;
use crate::domain::geo::is_ibge_code;
use crate::entities::{cidades, estados, prelude::*, regioes};

#[derive(RustEmbed)]
#[folder = "data/"]
struct ReferenceData;

const CIDADES_FILE: &str = "cidades.json";

pub const REGIOES: [&str; TOTAL_REGIOES] = ["Norte", "Nordeste", "Sudeste", "Sul", "Centro-Oeste"];

/// A federative unit: IBGE state code, abbreviation, name, region.
#[derive(Debug, Clone, Copy)]
pub struct EstadoSeed {
    pub codigo: u8,
    pub uf: &'static str,
    pub nome: &'static str,
    pub regiao: &'static str,
}

const fn estado(
    codigo: u8,
    uf: &'static str,
    nome: &'static str,
    regiao: &'static str,
) -> EstadoSeed {
    EstadoSeed {
        codigo,
        uf,
        nome,
        regiao,
    }
}

pub const ESTADOS: [EstadoSeed; TOTAL_ESTADOS] = [
    estado(11, "RO", "Rondônia", "Norte"),
    estado(12, "AC", "Acre", "Norte"),
    estado(13, "AM", "Amazonas", "Norte"),
    estado(14, "RR", "Roraima", "Norte"),
    estado(15, "PA", "Pará", "Norte"),
    estado(16, "AP", "Amapá", "Norte"),
    estado(17, "TO", "Tocantins", "Norte"),
    estado(21, "MA", "Maranhão", "Nordeste"),
    estado(22, "PI", "Piauí", "Nordeste"),
    estado(23, "CE", "Ceará", "Nordeste"),
    estado(24, "RN", "Rio Grande do Norte", "Nordeste"),
    estado(25, "PB", "Paraíba", "Nordeste"),
    estado(26, "PE", "Pernambuco", "Nordeste"),
    estado(27, "AL", "Alagoas", "Nordeste"),
    estado(28, "SE", "Sergipe", "Nordeste"),
    estado(29, "BA", "Bahia", "Nordeste"),
    estado(31, "MG", "Minas Gerais", "Sudeste"),
    estado(32, "ES", "Espírito Santo", "Sudeste"),
    estado(33, "RJ", "Rio de Janeiro", "Sudeste"),
    estado(35, "SP", "São Paulo", "Sudeste"),
    estado(41, "PR", "Paraná", "Sul"),
    estado(42, "SC", "Santa Catarina", "Sul"),
    estado(43, "RS", "Rio Grande do Sul", "Sul"),
    estado(50, "MS", "Mato Grosso do Sul", "Centro-Oeste"),
    estado(51, "MT", "Mato Grosso", "Centro-Oeste"),
    estado(52, "GO", "Goiás", "Centro-Oeste"),
    estado(53, "DF", "Distrito Federal", "Centro-Oeste"),
];

#[derive(Debug, Deserialize)]
struct CidadeRecord {
    ibge: String,
    uf: String,
    nome: String,
}

/// Parses and checks a municipality dataset.
///
/// Each code must be a 7-digit IBGE code whose first two digits are the
/// code of the row's state; names must not be blank; codes must be unique.
pub fn parse_cidades(bytes: &[u8]) -> Result<Vec<Cidade>> {
    let records: Vec<CidadeRecord> =
        serde_json::from_slice(bytes).context("Failed to parse municipality dataset")?;

    let codigos: HashMap<&str, u8> = ESTADOS.iter().map(|e| (e.uf, e.codigo)).collect();
    let mut seen = HashSet::with_capacity(records.len());
    let mut cidades = Vec::with_capacity(records.len());

    for record in records {
        let ibge = record.ibge.trim().to_string();
        let uf = record.uf.trim().to_uppercase();
        let nome = record.nome.trim().to_string();

        if !is_ibge_code(&ibge) {
            anyhow::bail!("Invalid IBGE code '{ibge}' for {nome}");
        }
        let Some(codigo) = codigos.get(uf.as_str()) else {
            anyhow::bail!("Unknown state '{uf}' for city {ibge}");
        };
        if !ibge.starts_with(&codigo.to_string()) {
            anyhow::bail!("City {ibge} does not belong to {uf} (state code {codigo})");
        }
        if nome.is_empty() {
            anyhow::bail!("City {ibge} has no name");
        }
        if !seen.insert(ibge.clone()) {
            anyhow::bail!("Duplicate IBGE code {ibge} in dataset");
        }

        cidades.push(Cidade { ibge, uf, nome });
    }

    Ok(cidades)
}

/// Municipality dataset selected by `config`.
pub async fn load_cidades(config: &SeedConfig) -> Result<Vec<Cidade>> {
    if let Some(path) = &config.cidades_path {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read municipality dataset: {}", path.display()))?;
        return parse_cidades(&bytes);
    }

    let file = ReferenceData::get(CIDADES_FILE)
        .ok_or_else(|| anyhow::anyhow!("Embedded {CIDADES_FILE} is missing"))?;
    parse_cidades(&file.data)
}

/// Makes sure every region, state and city exists; returns how many rows were inserted.
pub async fn ensure_seed_data(conn: &DatabaseConnection, config: &SeedConfig) -> Result<u64> {
    let cidades = load_cidades(config).await?;

    let regioes_inseridas = seed_regioes(conn).await?;
    let regiao_ids = regiao_ids_by_nome(conn).await?;
    let estados_inseridos = seed_estados(conn, &regiao_ids).await?;
    let cidades_inseridas = seed_cidades(conn, &cidades, config.insert_chunk_size).await?;

    let total = regioes_inseridas + estados_inseridos + cidades_inseridas;
    metrics::counter!("seed_rows_inserted_total").increment(total);

    if total == 0 {
        info!("Reference data already seeded");
    } else {
        info!(
            regioes = regioes_inseridas,
            estados = estados_inseridos,
            cidades = cidades_inseridas,
            "Reference data seeded"
        );
    }

    Ok(total)
}

/// A concurrent seeder may win the race for a key; that is not a failure.
fn tolerate_conflict(result: Result<u64, DbErr>, what: &str) -> Result<u64> {
    match result {
        Ok(n) => Ok(n),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!("{what} already inserted by a concurrent seed: {e}");
            Ok(0)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to seed {what}")),
    }
}

async fn seed_regioes<C: ConnectionTrait>(conn: &C) -> Result<u64> {
    let models = REGIOES.iter().map(|nome| regioes::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        nome: Set((*nome).to_string()),
    });

    let result = Regioes::insert_many(models)
        .on_conflict(
            OnConflict::column(regioes::Column::Nome)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await;

    tolerate_conflict(result, "regions")
}

async fn regiao_ids_by_nome<C: ConnectionTrait>(conn: &C) -> Result<HashMap<String, String>> {
    let rows = Regioes::find()
        .filter(regioes::Column::Nome.is_in(REGIOES))
        .all(conn)
        .await
        .context("Failed to load seeded regions")?;

    Ok(rows.into_iter().map(|r| (r.nome, r.id)).collect())
}

async fn seed_estados<C: ConnectionTrait>(
    conn: &C,
    regiao_ids: &HashMap<String, String>,
) -> Result<u64> {
    let models = ESTADOS
        .iter()
        .map(|e| {
            let regiao_id = regiao_ids
                .get(e.regiao)
                .ok_or_else(|| anyhow::anyhow!("Region {} missing after seed", e.regiao))?;
            Ok(estados::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                uf: Set(e.uf.to_string()),
                nome: Set(e.nome.to_string()),
                regiao_id: Set(regiao_id.clone()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let result = Estados::insert_many(models)
        .on_conflict(
            OnConflict::column(estados::Column::Uf)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await;

    tolerate_conflict(result, "states")
}

async fn seed_cidades<C: ConnectionTrait>(
    conn: &C,
    cidades: &[Cidade],
    chunk_size: usize,
) -> Result<u64> {
    let mut inserted = 0u64;

    for (idx, chunk) in cidades.chunks(chunk_size.max(1)).enumerate() {
        let models = chunk.iter().map(|c| cidades::ActiveModel {
            ibge: Set(c.ibge.clone()),
            uf: Set(c.uf.clone()),
            nome: Set(c.nome.clone()),
        });

        let result = Cidades::insert_many(models)
            .on_conflict(
                OnConflict::column(cidades::Column::Ibge)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await;

        let n = tolerate_conflict(result, "cities")?;
        debug!(chunk = idx + 1, rows = n, "City chunk seeded");
        inserted += n;
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tables_are_consistent() {
        assert_eq!(REGIOES.len(), TOTAL_REGIOES);
        assert_eq!(ESTADOS.len(), TOTAL_ESTADOS);

        let ufs: HashSet<_> = ESTADOS.iter().map(|e| e.uf).collect();
        assert_eq!(ufs.len(), TOTAL_ESTADOS);
        assert!(ESTADOS.iter().all(|e| e.uf.len() == 2));
        assert!(ESTADOS.iter().all(|e| REGIOES.contains(&e.regiao)));
    }

    #[test]
    fn embedded_dataset_is_valid() {
        let file = ReferenceData::get(CIDADES_FILE).unwrap();
        let cidades = parse_cidades(&file.data).unwrap();

        assert!(cidades.contains(&Cidade::new("3557105", "SP", "Votuporanga")));
        assert_eq!(cidades.iter().filter(|c| c.uf == "DF").count(), 1);

        let ufs: HashSet<_> = cidades.iter().map(|c| c.uf.as_str()).collect();
        assert_eq!(ufs.len(), TOTAL_ESTADOS);
    }

    #[test]
    fn parse_rejects_code_from_another_state() {
        let json = br#"[{"ibge": "3557105", "uf": "RJ", "nome": "Votuporanga"}]"#;
        assert!(parse_cidades(json).is_err());
    }

    #[test]
    fn parse_rejects_duplicates_and_bad_codes() {
        let dup = br#"[
            {"ibge": "5300108", "uf": "DF", "nome": "Brasilia"},
            {"ibge": "5300108", "uf": "DF", "nome": "Brasilia"}
        ]"#;
        assert!(parse_cidades(dup).is_err());

        let bad = br#"[{"ibge": "ab2c3", "uf": "SP", "nome": "X"}]"#;
        assert!(parse_cidades(bad).is_err());
    }

    #[test]
    fn parse_normalizes_whitespace_and_case() {
        let json = r#"[{"ibge": " 5300108 ", "uf": "df", "nome": " Brasília "}]"#;
        let cidades = parse_cidades(json.as_bytes()).unwrap();
        assert_eq!(cidades, vec![Cidade::new("5300108", "DF", "Brasília")]);
    }
}
