use candidate_relay_server::store::{PostgresRecordStore, Record, RecordStore};
use serde_json::json;
use sqlx::PgPool;

fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(record) => record,
        _ => panic!("record must be an object"),
    }
}

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database in DATABASE_URL"]
async fn postgres_store_keeps_record_semantics() {
    let store = PostgresRecordStore::new(connect().await);
    let collection = format!("test-{}", uuid::Uuid::new_v4());

    let first = store.put(&collection, record(json!({ "name": "Jane Doe" }))).await.unwrap();
    let second =
        store.put(&collection, record(json!({ "id": "fixed", "name": "John Roe" }))).await.unwrap();
    assert_eq!(second, "fixed");

    let fetched = store.get(&collection, &first).await.unwrap().unwrap();
    assert_eq!(fetched["name"], "Jane Doe");
    assert_eq!(fetched["id"], json!(first));

    assert!(store
        .update(&collection, &first, record(json!({ "id": "other", "location": "Berlin" })))
        .await
        .unwrap());
    let fetched = store.get(&collection, &first).await.unwrap().unwrap();
    assert_eq!(fetched["id"], json!(first));
    assert_eq!(fetched["name"], "Jane Doe");
    assert_eq!(fetched["location"], "Berlin");
    assert!(!store.update(&collection, "missing", Record::new()).await.unwrap());

    let ids: Vec<_> = store
        .list_all(&collection)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(first), json!("fixed")]);

    assert!(store.delete(&collection, "fixed").await.unwrap());
    assert!(!store.delete(&collection, "fixed").await.unwrap());
    assert!(store.get(&collection, "fixed").await.unwrap().is_none());
    assert_eq!(store.backend(), "postgres");
}
