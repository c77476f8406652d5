use bookline_core::{Author, RecordStore, Work};
use bookline_store::{DuckDbStore, StoreConfig, StoreCounts};
use chrono::NaiveDate;
use tempfile::TempDir;

fn author(id: &str, name: &str) -> Author {
    Author {
        id: id.to_string(),
        name: name.to_string(),
        personal_name: format!("{name} (personal)"),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn full_work(id: &str) -> Work {
    Work {
        id: id.to_string(),
        name: "Fantastic Mr Fox".to_string(),
        description: Some("A fox outwits three farmers.".to_string()),
        published_date: NaiveDate::from_ymd_opt(2009, 10, 15),
        author_ids: Some(strings(&["OL34184A", "OL2A"])),
        author_names: Some(strings(&["Roald Dahl", "Unknown author"])),
        cover_ids: Some(strings(&["6498519"])),
    }
}

fn file_config(dir: &TempDir) -> StoreConfig {
    StoreConfig {
        path: dir.path().join("nested").join("bookline.duckdb"),
        memory_limit: Some("256MB".to_string()),
        threads: Some(1),
    }
}

#[test]
fn author_round_trip_and_overwrite() {
    let store = DuckDbStore::open_in_memory().unwrap();
    store.save(&author("OL1A", "Jane Doe")).unwrap();
    assert_eq!(
        RecordStore::<Author>::find_by_id(&store, "OL1A").unwrap(),
        Some(author("OL1A", "Jane Doe"))
    );

    store.save(&author("OL1A", "Jane Q. Doe")).unwrap();
    let found: Option<Author> = store.find_by_id("OL1A").unwrap();
    assert_eq!(found.unwrap().name, "Jane Q. Doe");
    assert_eq!(store.counts().unwrap().authors, 1);
}

#[test]
fn lookup_miss_is_none() {
    let store = DuckDbStore::open_in_memory().unwrap();
    let author: Option<Author> = store.find_by_id("OL404A").unwrap();
    let work: Option<Work> = store.find_by_id("OL404W").unwrap();
    assert!(author.is_none());
    assert!(work.is_none());
}

#[test]
fn work_round_trip_keeps_every_field() {
    let store = DuckDbStore::open_in_memory().unwrap();
    let work = full_work("OL45804W");
    store.save(&work).unwrap();
    let found: Option<Work> = store.find_by_id("OL45804W").unwrap();
    assert_eq!(found, Some(work));
}

#[test]
fn work_null_lists_differ_from_empty_lists() {
    let store = DuckDbStore::open_in_memory().unwrap();
    let bare = Work {
        id: "OL1W".to_string(),
        ..Default::default()
    };
    let empty = Work {
        id: "OL2W".to_string(),
        author_ids: Some(vec![]),
        author_names: Some(vec![]),
        cover_ids: Some(vec![]),
        ..Default::default()
    };
    store.save_batch(&[bare.clone(), empty.clone()]).unwrap();

    let found_bare: Work = store.find_by_id("OL1W").unwrap().unwrap();
    let found_empty: Work = store.find_by_id("OL2W").unwrap().unwrap();
    assert_eq!(found_bare, bare);
    assert_eq!(found_empty, empty);
    assert!(found_bare.author_ids.is_none());
    assert_eq!(found_empty.author_ids, Some(vec![]));
}

#[test]
fn author_batch_is_committed() {
    let store = DuckDbStore::open_in_memory().unwrap();
    let batch: Vec<Author> = (1..=5)
        .map(|i| author(&format!("OL{i}A"), &format!("Author {i}")))
        .collect();
    store.save_batch(&batch).unwrap();

    assert_eq!(store.counts().unwrap().authors, 5);
    let third: Option<Author> = store.find_by_id("OL3A").unwrap();
    assert_eq!(third.unwrap().name, "Author 3");
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    {
        let store = DuckDbStore::open(&config).unwrap();
        store.save(&author("OL1A", "Jane Doe")).unwrap();
        store.save_batch(&[full_work("OL1W"), full_work("OL2W")]).unwrap();
    }
    assert!(config.path.exists());

    let store = DuckDbStore::open(&config).unwrap();
    assert_eq!(
        store.counts().unwrap(),
        StoreCounts {
            authors: 1,
            works: 2
        }
    );
    let work: Option<Work> = store.find_by_id("OL2W").unwrap();
    assert_eq!(work, Some(full_work("OL2W")));
}
