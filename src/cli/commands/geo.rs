//! Geographic lookup command handlers

use crate::db::Store;

pub async fn cmd_regioes(store: &Store) -> anyhow::Result<()> {
    let regioes = store.regioes().obter_todos().await?;

    if regioes.is_empty() {
        println!("No regions found. Run 'sgp seed' first.");
        return Ok(());
    }

    println!("Regions ({} total)", regioes.len());
    println!("{:-<50}", "");
    for regiao in regioes {
        println!("{:<15} {}", regiao.nome, regiao.id);
    }

    Ok(())
}

pub async fn cmd_estados(store: &Store, regiao: Option<&str>) -> anyhow::Result<()> {
    let estados = match regiao {
        Some(nome) => {
            let regioes = store.regioes().obter_todos().await?;
            let Some(found) = regioes
                .into_iter()
                .find(|r| r.nome.eq_ignore_ascii_case(nome.trim()))
            else {
                println!("Region '{nome}' not found.");
                println!("Use 'sgp regioes' to see region names.");
                return Ok(());
            };
            store.estados().obter_por_regiao(found.id).await?
        }
        None => store.estados().obter_todos().await?,
    };

    if estados.is_empty() {
        println!("No states found.");
        return Ok(());
    }

    println!("States ({} total)", estados.len());
    println!("{:-<50}", "");
    for estado in estados {
        println!("{}  {}", estado.uf, estado.nome);
    }

    Ok(())
}

pub async fn cmd_cidades(store: &Store, uf: &str) -> anyhow::Result<()> {
    let cidades = store.cidades().get_all(uf).await?;

    if cidades.is_empty() {
        println!("No municipalities found for '{uf}'.");
        let ufs = store.cidades().get_all_estados().await?;
        if !ufs.is_empty() {
            println!("Known states: {}", ufs.join(", "));
        }
        return Ok(());
    }

    println!(
        "Municipalities in {} ({} total)",
        uf.trim().to_uppercase(),
        cidades.len()
    );
    println!("{:-<50}", "");
    for cidade in cidades {
        println!("{}  {}", cidade.ibge, cidade.nome);
    }

    Ok(())
}

pub async fn cmd_cidade(store: &Store, ibge: &str) -> anyhow::Result<()> {
    match store.cidades().get_by_ibge(ibge).await? {
        Some(cidade) => {
            println!("{} - {}", cidade.nome, cidade.uf);
            println!("  IBGE: {}", cidade.ibge);
        }
        None => println!("No municipality with IBGE code '{ibge}'."),
    }

    Ok(())
}
