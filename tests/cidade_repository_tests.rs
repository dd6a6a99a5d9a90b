//! Integration tests for municipality lookups against seeded data.

mod common;

use common::TestDb;
use sgp::config::SeedConfig;
use sgp::domain::Cidade;

#[tokio::test]
async fn test_get_by_ibge() {
    let db = TestDb::seeded("cidade", &SeedConfig::default()).await;
    let store = &db.store;
    let repo = store.cidades();

    let cidade = repo.get_by_ibge("3557105").await.unwrap();
    assert_eq!(cidade, Some(Cidade::new("3557105", "SP", "Votuporanga")));

    let brasilia = repo.get_by_ibge("5300108").await.unwrap().unwrap();
    assert_eq!(brasilia.uf, "DF");
}

#[tokio::test]
async fn test_get_by_ibge_malformed_or_unknown() {
    let db = TestDb::seeded("cidade", &SeedConfig::default()).await;
    let store = &db.store;
    let repo = store.cidades();

    for code in ["", "0", "00000", "0000000", "ab2c3", "35571050", " 3557105x"] {
        assert_eq!(repo.get_by_ibge(code).await.unwrap(), None, "code {code:?}");
    }

    // Well formed but not a municipality
    assert_eq!(repo.get_by_ibge("9999999").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_all_by_uf() {
    let config = SeedConfig::default();
    let db = TestDb::seeded("cidade", &config).await;
    let store = &db.store;
    let repo = store.cidades();

    let expected_sp = sgp::db::seed::load_cidades(&config)
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.uf == "SP")
        .count();

    let sp = repo.get_all("SP").await.unwrap();
    assert_eq!(sp.len(), expected_sp);
    assert!(sp.iter().all(|c| c.uf == "SP"));
    assert!(sp.windows(2).all(|w| w[0].nome <= w[1].nome));
    assert!(sp.iter().any(|c| c.nome == "Votuporanga"));

    // Case and whitespace are normalized
    assert_eq!(repo.get_all(" sp ").await.unwrap(), sp);

    let df = repo.get_all("DF").await.unwrap();
    assert_eq!(df, vec![Cidade::new("5300108", "DF", "Brasília")]);
}

#[tokio::test]
async fn test_get_all_unknown_or_empty_uf() {
    let db = TestDb::seeded("cidade", &SeedConfig::default()).await;
    let store = &db.store;
    let repo = store.cidades();

    assert!(repo.get_all("").await.unwrap().is_empty());
    assert!(repo.get_all("   ").await.unwrap().is_empty());
    assert!(repo.get_all("XX").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_all_estados() {
    let db = TestDb::seeded("cidade", &SeedConfig::default()).await;
    let store = &db.store;

    let ufs = store.cidades().get_all_estados().await.unwrap();
    assert_eq!(ufs.len(), 27);
    assert!(ufs.windows(2).all(|w| w[0] < w[1]), "sorted and unique");
    assert_eq!(ufs.first().map(String::as_str), Some("AC"));
    assert_eq!(ufs.last().map(String::as_str), Some("TO"));
}

/// Needs the full IBGE export: `SGP_CIDADES_PATH=/path/to/municipios.json cargo test -- --ignored`
#[tokio::test]
#[ignore = "requires the full IBGE municipality dataset"]
async fn test_full_dataset_counts() {
    let path = std::env::var("SGP_CIDADES_PATH").expect("SGP_CIDADES_PATH not set");
    let config = SeedConfig {
        cidades_path: Some(path.into()),
        ..SeedConfig::default()
    };
    let db = TestDb::seeded("cidade", &config).await;
    let store = &db.store;
    let repo = store.cidades();

    assert_eq!(repo.get_all("SP").await.unwrap().len(), 645);
    assert_eq!(repo.get_all("RJ").await.unwrap().len(), 92);
    assert_eq!(repo.get_all("DF").await.unwrap().len(), 1);
    assert_eq!(repo.count().await.unwrap(), 5570);
}
