//! Integration tests for region and state lookups.

mod common;

use common::TestDb;
use sgp::config::SeedConfig;

#[tokio::test]
async fn test_obter_todas_regioes() {
    let db = TestDb::seeded("regiao", &SeedConfig::default()).await;
    let store = &db.store;

    let regioes = store.regioes().obter_todos().await.unwrap();
    assert_eq!(regioes.len(), 5);
    assert!(regioes.iter().all(|r| !r.id.is_nil()));
    assert!(regioes.iter().all(|r| !r.nome.trim().is_empty()));

    let mut nomes: Vec<_> = regioes.iter().map(|r| r.nome.as_str()).collect();
    nomes.sort_unstable();
    assert_eq!(
        nomes,
        vec!["Centro-Oeste", "Nordeste", "Norte", "Sudeste", "Sul"]
    );
}

#[tokio::test]
async fn test_regioes_empty_before_seed() {
    let db = TestDb::open("regiao-empty").await;
    let store = &db.store;

    assert!(store.regioes().obter_todos().await.unwrap().is_empty());
    assert!(store.estados().obter_todos().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_estados() {
    let db = TestDb::seeded("regiao", &SeedConfig::default()).await;
    let store = &db.store;
    let estados = store.estados();

    let todos = estados.obter_todos().await.unwrap();
    assert_eq!(todos.len(), 27);
    assert!(todos.windows(2).all(|w| w[0].uf < w[1].uf));

    let sp = estados.obter_por_uf("sp").await.unwrap().unwrap();
    assert_eq!(sp.nome, "São Paulo");
    assert!(estados.obter_por_uf("XX").await.unwrap().is_none());
}

#[tokio::test]
async fn test_estados_por_regiao() {
    let db = TestDb::seeded("regiao", &SeedConfig::default()).await;
    let store = &db.store;

    let regioes = store.regioes().obter_todos().await.unwrap();
    let sudeste = regioes.iter().find(|r| r.nome == "Sudeste").unwrap();

    let estados = store.estados().obter_por_regiao(sudeste.id).await.unwrap();
    let ufs: Vec<_> = estados.iter().map(|e| e.uf.as_str()).collect();
    assert_eq!(ufs, vec!["ES", "MG", "RJ", "SP"]);
    assert!(estados.iter().all(|e| e.regiao_id == sudeste.id));

    let mut total = 0;
    for regiao in &regioes {
        total += store.estados().obter_por_regiao(regiao.id).await.unwrap().len();
    }
    assert_eq!(total, 27);
}
