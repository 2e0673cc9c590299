use std::{collections::BTreeSet, fmt, io, path::Path};

use rand::seq::IndexedRandom;

use crate::types::{Catalog, CatalogEntry, Named};

/// Section name used when a block has none.
pub const UNKNOWN_SECTION: &str = "Sconosciuto";

#[derive(Debug)]
pub enum CatalogError {
    NotFound(String),
    IoError(io::Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(path) => write!(f, "File non trovato: {}", path),
            CatalogError::IoError(e) => write!(f, "Errore di lettura: {}", e),
            CatalogError::SerdeError(e) => write!(f, "JSON non valido: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        CatalogError::IoError(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::SerdeError(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSummary {
    pub name: String,
    pub kind: String,
    pub count: usize,
}

/// Search criteria; every set field must match (case-insensitive substring).
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub section: Option<String>,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub typology: Option<String>,
    pub year: Option<String>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        [
            &self.section,
            &self.title,
            &self.genre,
            &self.typology,
            &self.year,
        ]
        .iter()
        .all(|f| f.as_deref().is_none_or(str::is_empty))
    }
}

/// Read-only view over a saved RaiPlay catalog dump.
pub struct CatalogManager {
    catalog: Catalog,
}

impl CatalogManager {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.display().to_string()));
        }

        let content = async_fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(content)?;
        Ok(Self { catalog })
    }

    pub fn count_sections(&self) -> usize {
        self.catalog.blocchi.len()
    }

    pub fn sections(&self) -> Vec<SectionSummary> {
        self.catalog
            .blocchi
            .iter()
            .map(|b| SectionSummary {
                name: b.name.clone().unwrap_or_else(|| UNKNOWN_SECTION.to_string()),
                kind: b.kind.clone().unwrap_or_else(|| "N/A".to_string()),
                count: b.lanci.len(),
            })
            .collect()
    }

    /// Every item of every section, tagged with its section name.
    pub fn items(&self) -> Vec<CatalogEntry> {
        self.catalog
            .blocchi
            .iter()
            .flat_map(|b| {
                let section = b.name.clone().unwrap_or_else(|| UNKNOWN_SECTION.to_string());
                b.lanci.iter().map(move |item| CatalogEntry {
                    section: section.clone(),
                    item: item.clone(),
                })
            })
            .collect()
    }

    /// Sorted, unique genre names, subgenres included.
    pub fn genres(&self) -> Vec<String> {
        let mut genres = BTreeSet::new();
        for entry in self.items() {
            if let Some(part) = &entry.item.is_part_of {
                genres.extend(names(&part.generi));
                genres.extend(names(&part.sottogenere));
            }
        }
        genres.into_iter().collect()
    }

    pub fn typologies(&self) -> Vec<String> {
        let mut types = BTreeSet::new();
        for entry in self.items() {
            if let Some(part) = &entry.item.is_part_of {
                types.extend(names(&part.tipologia));
            }
        }
        types.into_iter().collect()
    }

    pub fn search(&self, filter: &CatalogFilter) -> Vec<CatalogEntry> {
        let section = lowered(&filter.section);
        let title = lowered(&filter.title);
        let genre = lowered(&filter.genre);
        let typology = lowered(&filter.typology);
        let year = filter.year.as_deref().filter(|y| !y.is_empty());

        self.items()
            .into_iter()
            .filter(|e| {
                section
                    .as_deref()
                    .is_none_or(|s| e.section.to_lowercase().contains(s))
            })
            .filter(|e| {
                title.as_deref().is_none_or(|t| {
                    e.item
                        .name
                        .as_deref()
                        .unwrap_or_default()
                        .to_lowercase()
                        .contains(t)
                })
            })
            .filter(|e| {
                genre.as_deref().is_none_or(|g| {
                    e.item.is_part_of.as_ref().is_some_and(|p| {
                        any_name_contains(&p.generi, g) || any_name_contains(&p.sottogenere, g)
                    })
                })
            })
            .filter(|e| {
                typology.as_deref().is_none_or(|t| {
                    e.item
                        .is_part_of
                        .as_ref()
                        .is_some_and(|p| any_name_contains(&p.tipologia, t))
                })
            })
            .filter(|e| {
                year.is_none_or(|y| {
                    e.item
                        .is_part_of
                        .as_ref()
                        .and_then(|p| p.anno.as_deref())
                        .unwrap_or_default()
                        .contains(y)
                })
            })
            .collect()
    }

    pub fn random_item(&self) -> Option<CatalogEntry> {
        self.items().choose(&mut rand::rng()).cloned()
    }

    /// Items per typology, most frequent first. Ties keep first-seen order.
    pub fn typology_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();

        for entry in self.items() {
            let Some(part) = &entry.item.is_part_of else {
                continue;
            };
            for t in &part.tipologia {
                let name = t.nome.clone().unwrap_or_else(|| "Altro".to_string());
                match counts.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((name, 1)),
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

fn names(list: &[Named]) -> impl Iterator<Item = String> + '_ {
    list.iter()
        .filter_map(|n| n.nome.clone())
        .filter(|n| !n.is_empty())
}

fn any_name_contains(list: &[Named], needle: &str) -> bool {
    list.iter().any(|n| {
        n.nome
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(needle)
    })
}

fn lowered(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}
