use std::path::Path;

use colored::Colorize;
use tabled::Table;

use crate::{
    error,
    management::{CatalogFilter, CatalogManager},
    output::{format_catalog_item_detail, format_catalog_item_short, title},
    types::TypologyCountRow,
};

async fn load_catalog(path: &Path) -> CatalogManager {
    match CatalogManager::load(path).await {
        Ok(manager) => manager,
        Err(e) => error!("Errore: {}", e),
    }
}

/// Lists the sections of the catalog with their item count.
pub async fn catalog_sections(path: &Path) {
    let catalog = load_catalog(path).await;

    println!("{}\n", title("Sezioni disponibili:"));
    for section in catalog.sections() {
        println!(
            "  {} {}",
            section.name.bold(),
            format!("({} elementi, tipo: {})", section.count, section.kind).bright_black()
        );
    }
    println!();
}

pub async fn catalog_genres(path: &Path) {
    let catalog = load_catalog(path).await;

    println!("{}\n", title("Generi disponibili:"));
    for genre in catalog.genres() {
        println!("  {}", genre);
    }
    println!();
}

pub async fn catalog_types(path: &Path) {
    let catalog = load_catalog(path).await;

    println!("{}\n", title("Tipologie disponibili:"));
    for typology in catalog.typologies() {
        println!("  {}", typology);
    }
    println!();
}

/// Prints totals and a per-typology breakdown.
pub async fn catalog_stats(path: &Path) {
    let catalog = load_catalog(path).await;

    println!("{}\n", title("Statistiche catalogo RaiPlay:"));
    println!("  {} {}", "Totale elementi:".bold(), catalog.items().len());
    println!("  {} {}", "Sezioni:".bold(), catalog.count_sections());
    println!("  {} {}", "Generi:".bold(), catalog.genres().len());
    println!("  {} {}", "Tipologie:".bold(), catalog.typologies().len());

    println!("\n  {}", "Elementi per tipologia:".bold());
    let rows: Vec<TypologyCountRow> = catalog
        .typology_counts()
        .into_iter()
        .map(|(typology, count)| TypologyCountRow { typology, count })
        .collect();

    println!("{}", Table::new(rows));
}

pub async fn catalog_random(path: &Path) {
    let catalog = load_catalog(path).await;

    match catalog.random_item() {
        Some(entry) => {
            println!("{}\n", title("Suggerimento casuale:"));
            println!("{}", format_catalog_item_detail(&entry));
        }
        None => println!("Nessun elemento nel catalogo."),
    }
}

/// Filters the catalog. A single match, or `details`, prints the full view.
pub async fn catalog_search(path: &Path, filter: &CatalogFilter, details: bool) {
    if filter.is_empty() {
        error!("Specificare almeno un filtro: --section, --title, --genre, --kind o --year");
    }

    let catalog = load_catalog(path).await;
    let results = catalog.search(filter);

    if results.is_empty() {
        println!("{}", "Nessun risultato trovato.".yellow());
        return;
    }

    println!(
        "{}\n",
        title(&format!("Trovati {} risultati:", results.len()))
    );

    let detailed = details || results.len() == 1;
    for entry in &results {
        if detailed {
            println!("{}", format_catalog_item_detail(entry));
        } else {
            println!("{}", format_catalog_item_short(entry));
        }
        println!();
    }
}
