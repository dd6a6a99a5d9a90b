//! Seed command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_seed(config: &Config, store: &Store) -> anyhow::Result<()> {
    if let Some(path) = &config.seed.cidades_path {
        println!("Seeding municipalities from {}", path.display());
    } else {
        println!("Seeding municipalities from the bundled dataset");
    }

    let inserted = store.ensure_seed_data(&config.seed).await?;

    let regioes = store.regioes().count().await?;
    let estados = store.estados().count().await?;
    let cidades = store.cidades().count().await?;

    if inserted == 0 {
        println!("✓ Reference data already present, nothing inserted.");
    } else {
        println!("✓ Inserted {inserted} rows.");
    }
    println!("  Regions: {regioes} | States: {estados} | Municipalities: {cidades}");

    Ok(())
}
