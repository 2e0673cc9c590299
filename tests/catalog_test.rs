use std::io::Write;

use troverai::management::{
    CatalogError, CatalogFilter, CatalogManager, SectionSummary, UNKNOWN_SECTION,
};

const CATALOG_JSON: &str = r#"{
  "blocchi": [
    {
      "name": "Fiction",
      "type": "RaiPlay Slider Block",
      "lanci": [
        {
          "name": "Il Commissario Montalbano",
          "subtitle": "Serie poliziesca",
          "isPartOf": {
            "generi": [{"nome": "Fiction"}],
            "sottogenere": [{"nome": "Poliziesco"}],
            "tipologia": [{"nome": "Fiction"}],
            "anno": "1999",
            "channel": "Rai 1",
            "weblink": "/programmi/ilcommissariomontalbano"
          }
        },
        {
          "name": "Don Matteo",
          "isPartOf": {
            "generi": [{"nome": "Fiction"}],
            "sottogenere": [{"nome": "Commedia"}],
            "tipologia": [{"nome": "Fiction"}],
            "anno": "2000"
          }
        }
      ]
    },
    {
      "name": "Film",
      "type": "RaiPlay Slider Block",
      "lanci": [
        {
          "name": "La vita è bella",
          "isPartOf": {
            "generi": [{"nome": "Film"}],
            "sottogenere": [{"nome": "Commedia"}],
            "tipologia": [{"nome": "Film"}],
            "anno": "1997"
          }
        }
      ]
    },
    {
      "type": "RaiPlay Banner",
      "lanci": [{"name": "Promo"}]
    }
  ]
}"#;

fn catalog() -> CatalogManager {
    CatalogManager::from_json(CATALOG_JSON).unwrap()
}

fn names(manager: &CatalogManager, filter: &CatalogFilter) -> Vec<String> {
    manager
        .search(filter)
        .into_iter()
        .map(|e| e.item.name.unwrap_or_default())
        .collect()
}

#[test]
fn test_sections() {
    let manager = catalog();
    let sections = manager.sections();

    assert_eq!(manager.count_sections(), 3);
    assert_eq!(
        sections[0],
        SectionSummary {
            name: "Fiction".to_string(),
            kind: "RaiPlay Slider Block".to_string(),
            count: 2,
        }
    );
    assert_eq!(sections[2].name, UNKNOWN_SECTION);
    assert_eq!(sections[2].kind, "RaiPlay Banner");
    assert_eq!(sections[2].count, 1);
}

#[test]
fn test_items_are_tagged_with_section() {
    let items = catalog().items();

    assert_eq!(items.len(), 4);
    assert_eq!(items[0].section, "Fiction");
    assert_eq!(items[2].section, "Film");
    assert_eq!(items[3].section, UNKNOWN_SECTION);
}

#[test]
fn test_genres_include_subgenres() {
    assert_eq!(
        catalog().genres(),
        vec!["Commedia", "Fiction", "Film", "Poliziesco"]
    );
}

#[test]
fn test_typologies() {
    assert_eq!(catalog().typologies(), vec!["Fiction", "Film"]);
}

#[test]
fn test_search_by_title() {
    let filter = CatalogFilter {
        title: Some("MONTALBANO".to_string()),
        ..Default::default()
    };

    assert_eq!(names(&catalog(), &filter), vec!["Il Commissario Montalbano"]);
}

#[test]
fn test_search_by_genre_matches_subgenre() {
    let filter = CatalogFilter {
        genre: Some("commedia".to_string()),
        ..Default::default()
    };

    assert_eq!(
        names(&catalog(), &filter),
        vec!["Don Matteo", "La vita è bella"]
    );
}

#[test]
fn test_search_by_typology_and_year() {
    let manager = catalog();

    let fiction = CatalogFilter {
        typology: Some("fiction".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&manager, &fiction).len(), 2);

    let nineties = CatalogFilter {
        year: Some("199".to_string()),
        ..Default::default()
    };
    assert_eq!(
        names(&manager, &nineties),
        vec!["Il Commissario Montalbano", "La vita è bella"]
    );
}

#[test]
fn test_search_combines_filters() {
    let manager = catalog();

    let filter = CatalogFilter {
        section: Some("film".to_string()),
        genre: Some("commedia".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&manager, &filter), vec!["La vita è bella"]);

    let unknown = CatalogFilter {
        section: Some("sconosciuto".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&manager, &unknown), vec!["Promo"]);

    let nothing = CatalogFilter {
        title: Some("peppa".to_string()),
        ..Default::default()
    };
    assert!(manager.search(&nothing).is_empty());
}

#[test]
fn test_empty_filter() {
    let filter = CatalogFilter::default();
    assert!(filter.is_empty());
    assert_eq!(catalog().search(&filter).len(), 4);

    let blank = CatalogFilter {
        title: Some(String::new()),
        ..Default::default()
    };
    assert!(blank.is_empty());
}

#[test]
fn test_typology_counts() {
    assert_eq!(
        catalog().typology_counts(),
        vec![("Fiction".to_string(), 2), ("Film".to_string(), 1)]
    );
}

#[test]
fn test_random_item() {
    let entry = catalog().random_item().unwrap();
    assert!(entry.item.name.is_some());

    let empty = CatalogManager::from_json(r#"{"blocchi": []}"#).unwrap();
    assert!(empty.random_item().is_none());
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG_JSON.as_bytes()).unwrap();

    let manager = CatalogManager::load(file.path()).await.unwrap();
    assert_eq!(manager.items().len(), 4);
}

#[tokio::test]
async fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = CatalogManager::load(&dir.path().join("rai.json")).await;

    assert!(matches!(result, Err(CatalogError::NotFound(_))));
}

#[tokio::test]
async fn test_load_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    let result = CatalogManager::load(file.path()).await;
    assert!(matches!(result, Err(CatalogError::SerdeError(_))));
}
