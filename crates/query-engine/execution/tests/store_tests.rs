use serde_json::json;
use similar_asserts::assert_eq;

use query_engine_document::document::ast::{Filter, Projection, Query, Sort, SortDirection, Value};
use query_engine_document::document::helpers;
use query_engine_execution::error::Error;
use query_engine_execution::memory::InMemoryStore;
use query_engine_execution::metrics::Metrics;
use query_engine_execution::query::execute;
use query_engine_execution::store::RecordStore;
use query_engine_metadata::metadata::{Document, LogicalField, RecordId};
use tests_common::fixtures;

fn sample_store() -> InMemoryStore {
    InMemoryStore::with_documents(fixtures::sample_documents()).unwrap()
}

fn ids(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|document| document["_id"].as_str().unwrap().to_string())
        .collect()
}

fn city_is(city: &str) -> Filter {
    Filter {
        groups: vec![helpers::any_of(
            LogicalField::City.stored_names(),
            |path| helpers::equals(path, Value::String(city.to_string())),
        )],
    }
}

fn sort_by(field: LogicalField, direction: SortDirection) -> Sort {
    Sort {
        elements: vec![helpers::sort_by(field.stored_names(), direction)],
    }
}

#[tokio::test]
async fn filters_across_conventions() {
    let store = sample_store();
    let found = store
        .find(
            &city_is("Pune"),
            &Projection::default(),
            &sort_by(LogicalField::No, SortDirection::Asc),
            helpers::everything(),
        )
        .await
        .unwrap();
    assert_eq!(
        ids(&found),
        vec![
            "650000000000000000000003",
            "650000000000000000000001",
            "650000000000000000000004"
        ]
    );
    assert_eq!(store.count(&city_is("Pune")).await.unwrap(), 3);
}

#[tokio::test]
async fn sorts_globally_across_conventions() {
    let store = sample_store();
    let found = store
        .find(
            &helpers::empty_filter(),
            &Projection::default(),
            &sort_by(LogicalField::Temperature, SortDirection::Desc),
            helpers::everything(),
        )
        .await
        .unwrap();
    assert_eq!(
        ids(&found),
        vec![
            "650000000000000000000004",
            "650000000000000000000005",
            "650000000000000000000003",
            "650000000000000000000001",
            "650000000000000000000006",
            "650000000000000000000002"
        ]
    );
}

#[tokio::test]
async fn default_sort_reads_both_timestamp_forms() {
    let store = sample_store();
    let found = store
        .find(
            &helpers::empty_filter(),
            &Projection::default(),
            &helpers::default_sort(),
            helpers::everything(),
        )
        .await
        .unwrap();
    let mut expected: Vec<String> = fixtures::SAMPLE_IDS.iter().map(ToString::to_string).collect();
    expected.reverse();
    assert_eq!(ids(&found), expected);
}

#[tokio::test]
async fn wind_speed_sentinel_never_satisfies_a_range() {
    let store = sample_store();
    let filter = Filter {
        groups: vec![helpers::any_of(
            LogicalField::WindSpeed.stored_names(),
            |path| helpers::inclusive_range(path, Some(Value::Number(0.0)), None),
        )],
    };
    assert_eq!(store.count(&filter).await.unwrap(), 5);
}

#[tokio::test]
async fn execute_windows_and_counts() {
    let store = sample_store();
    let mut registry = prometheus::Registry::new();
    let metrics = Metrics::initialize(&mut registry).unwrap();

    let query = Query {
        filter: helpers::empty_filter(),
        projection: Projection {
            fields: vec!["city".into(), "City".into()],
        },
        sort: helpers::default_sort(),
        window: query_engine_document::document::ast::Window {
            skip: 4,
            limit: Some(4),
        },
    };
    let result = execute(&store, &metrics, &query).await.unwrap();

    assert_eq!(result.total, 6);
    assert_eq!(
        result.records,
        vec![
            fixtures::document(json!({"_id": "650000000000000000000002", "City": "Delhi"})),
            fixtures::document(json!({"_id": "650000000000000000000001", "city": "Pune"})),
        ]
    );
}

#[tokio::test]
async fn find_page_counts_past_the_window() {
    let store = sample_store();
    let window = query_engine_document::document::ast::Window {
        skip: 1,
        limit: Some(1),
    };
    let (records, total) = store
        .find_page(
            &city_is("Pune"),
            &Projection { fields: vec![] },
            &helpers::default_sort(),
            window,
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(total, 3);
    assert_eq!(total, store.count(&city_is("Pune")).await.unwrap());

    let (records, total) = store
        .find_page(
            &city_is("Pune"),
            &Projection { fields: vec![] },
            &helpers::default_sort(),
            query_engine_document::document::ast::Window {
                skip: 10,
                limit: Some(5),
            },
        )
        .await
        .unwrap();
    assert!(records.is_empty());
    assert_eq!(total, 3);
}

#[tokio::test]
async fn insert_assigns_identity_and_timestamps() {
    let store = InMemoryStore::new();
    let stored = store
        .insert(fixtures::new_record("Nagpur", "Apr-19", 7.0))
        .await
        .unwrap();

    let id = RecordId::parse(stored["_id"].as_str().unwrap()).unwrap();
    assert!(stored["createdAt"].is_string());
    assert_eq!(stored["createdAt"], stored["updatedAt"]);
    assert_eq!(store.find_by_id(&id).await.unwrap(), Some(stored));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn insert_many_is_all_or_nothing() {
    let store = sample_store();
    let mut duplicate = fixtures::new_record("Goa", "May-19", 1.0);
    duplicate.insert("_id".into(), json!(fixtures::SAMPLE_IDS[0]));

    let result = store
        .insert_many(vec![fixtures::new_record("Goa", "May-19", 2.0), duplicate])
        .await;
    assert!(matches!(result, Err(Error::DuplicateId(_))));
    assert_eq!(store.len().await, 6);

    let inserted = store
        .insert_many(vec![
            fixtures::new_record("Goa", "May-19", 2.0),
            fixtures::new_record("Goa", "Jun-19", 3.0),
        ])
        .await
        .unwrap();
    assert_eq!(inserted.len(), 2);
    assert_eq!(store.len().await, 8);
}

#[tokio::test]
async fn update_applies_merge_patch() {
    let store = sample_store();
    let id = RecordId::parse(fixtures::SAMPLE_IDS[1]).unwrap();

    let patch = fixtures::document(json!({
        "temp": 15.5,
        "Temp (°C)": null,
        "createdAt": "1999-01-01T00:00:00Z"
    }));
    let updated = store.update(&id, patch).await.unwrap().unwrap();

    assert_eq!(updated["temp"], json!(15.5));
    assert!(!updated.contains_key("Temp (°C)"));
    assert_eq!(
        updated["createdAt"],
        json!({"$date": "2024-01-11T08:00:00.000Z"})
    );
    assert_ne!(updated["updatedAt"], json!({"$date": "2024-01-11T08:00:00.000Z"}));

    let missing = RecordId::parse("ffffffffffffffffffffffff").unwrap();
    assert_eq!(store.update(&missing, Document::new()).await.unwrap(), None);
}

#[tokio::test]
async fn deletes_records() {
    let store = sample_store();
    let first = RecordId::parse(fixtures::SAMPLE_IDS[0]).unwrap();

    let deleted = store.delete(&first).await.unwrap().unwrap();
    assert_eq!(deleted["city"], json!("Pune"));
    assert_eq!(store.delete(&first).await.unwrap(), None);

    let ids = [
        first,
        RecordId::parse(fixtures::SAMPLE_IDS[1]).unwrap(),
        RecordId::parse(fixtures::SAMPLE_IDS[2]).unwrap(),
    ];
    assert_eq!(store.delete_many(&ids).await.unwrap(), 2);
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn loads_records_from_file() {
    let file = fixtures::write_data_file(&fixtures::sample_documents());
    let store = InMemoryStore::load_from_file(file.path()).await.unwrap();
    assert_eq!(store.len().await, 6);

    let legacy = store
        .find_by_id(&RecordId::parse(fixtures::SAMPLE_IDS[1]).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(legacy["_id"], json!("650000000000000000000002"));
}

#[tokio::test]
async fn rejects_bad_data_files() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), r#"{"city": "Pune"}"#).unwrap();
    assert!(matches!(
        InMemoryStore::load_from_file(file.path()).await,
        Err(Error::Json { .. })
    ));

    std::fs::write(file.path(), r#"[1, 2]"#).unwrap();
    assert!(matches!(
        InMemoryStore::load_from_file(file.path()).await,
        Err(Error::InvalidDataFile { .. })
    ));

    let mut documents = fixtures::sample_documents();
    documents.push(documents[0].clone());
    assert!(matches!(
        InMemoryStore::with_documents(documents),
        Err(Error::DuplicateId(_))
    ));
}
