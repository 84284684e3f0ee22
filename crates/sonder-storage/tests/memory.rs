use serde::{Deserialize, Serialize};

use sonder_storage::error::StorageError;
use sonder_storage::memory::MemoryObjectStore;
use sonder_storage::objects::ObjectStore;
use sonder_storage::state::{create_state, load_state, save_state_if_match};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Counter {
    value: u32,
}

#[tokio::test]
async fn missing_key_is_not_found() {
    let store = MemoryObjectStore::new();
    let err = load_state::<Counter>(&store, "nope.json").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { key } if key == "nope.json"));
}

#[tokio::test]
async fn create_refuses_to_overwrite() {
    let store = MemoryObjectStore::new();
    create_state(&store, "c.json", &Counter { value: 1 }).await.unwrap();

    let err = create_state(&store, "c.json", &Counter { value: 2 })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));

    let (counter, _) = load_state::<Counter>(&store, "c.json").await.unwrap();
    assert_eq!(counter, Counter { value: 1 });
}

#[tokio::test]
async fn stale_etag_loses() {
    let store = MemoryObjectStore::new();
    create_state(&store, "c.json", &Counter { value: 0 }).await.unwrap();

    let (_, etag) = load_state::<Counter>(&store, "c.json").await.unwrap();
    let fresh = save_state_if_match(&store, "c.json", &Counter { value: 1 }, &etag)
        .await
        .unwrap();
    assert_ne!(fresh, etag);

    let err = save_state_if_match(&store, "c.json", &Counter { value: 2 }, &etag)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));

    let (counter, current) = load_state::<Counter>(&store, "c.json").await.unwrap();
    assert_eq!(counter.value, 1);
    assert_eq!(current, fresh);
}

#[tokio::test]
async fn concurrent_conditional_writes_have_one_winner() {
    let store = MemoryObjectStore::new();
    create_state(&store, "c.json", &Counter { value: 0 }).await.unwrap();
    let (_, etag) = load_state::<Counter>(&store, "c.json").await.unwrap();

    let (a, b) = tokio::join!(
        save_state_if_match(&store, "c.json", &Counter { value: 10 }, &etag),
        save_state_if_match(&store, "c.json", &Counter { value: 20 }, &etag),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
}

#[tokio::test]
async fn listing_is_prefix_scoped_and_sorted() {
    let store = MemoryObjectStore::new();
    for key in ["b/2.json", "a/1.json", "b/1.json"] {
        store.put_object_if_absent(key, b"{}".to_vec(), None).await.unwrap();
    }

    let keys = store.list_objects("b/").await.unwrap();
    assert_eq!(keys, vec!["b/1.json", "b/2.json"]);
    assert_eq!(store.count("").await, 3);
}

#[tokio::test]
async fn conditional_update_never_creates() {
    let store = MemoryObjectStore::new();
    let err = save_state_if_match(&store, "c.json", &Counter { value: 1 }, "\"1\"")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
    assert_eq!(store.count("").await, 0);
}
