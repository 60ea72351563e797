use std::{thread, time::Duration};

use crate::{PingboardError, SortOrder, Store, local::LocalStore, tests::runtime::block_on};

#[test]
fn get_missing_key_is_none() {
    let store = LocalStore::new();

    assert_eq!(block_on(store.get("missing")).unwrap(), None);
}

#[test]
fn set_overwrites_and_get_reads_back() {
    let store = LocalStore::new();

    block_on(async {
        store.set("k", "v1", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));

        store.set("k", "v2", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
    });
}

#[test]
fn ttl_expiry_makes_key_absent() {
    let store = LocalStore::new();

    block_on(async {
        store
            .set("k", "v", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        thread::sleep(Duration::from_millis(80));

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    });
}

#[test]
fn expire_on_missing_key_is_a_noop() {
    let store = LocalStore::new();

    assert!(!block_on(store.expire("missing", Duration::from_secs(1))).unwrap());
}

#[test]
fn expire_sets_deadline_on_unexpiring_key() {
    let store = LocalStore::new();

    block_on(async {
        store.set("k", "v", None).await.unwrap();
        assert!(store.expire("k", Duration::from_millis(50)).await.unwrap());

        thread::sleep(Duration::from_millis(80));

        assert_eq!(store.get("k").await.unwrap(), None);
    });
}

#[test]
fn incr_initializes_absent_key_to_zero_first() {
    let store = LocalStore::new();

    block_on(async {
        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.incr("counter").await.unwrap(), 2);
        assert_eq!(store.get("counter").await.unwrap().as_deref(), Some("2"));
    });
}

#[test]
fn incr_preserves_an_existing_ttl() {
    let store = LocalStore::new();

    block_on(async {
        store
            .set("counter", "1", Some(Duration::from_millis(60)))
            .await
            .unwrap();
        assert_eq!(store.incr("counter").await.unwrap(), 2);

        thread::sleep(Duration::from_millis(90));

        assert_eq!(store.get("counter").await.unwrap(), None);
    });
}

#[test]
fn incr_on_non_integer_is_a_decode_error() {
    let store = LocalStore::new();

    block_on(async {
        store.set("k", "not-a-number", None).await.unwrap();

        assert!(matches!(
            store.incr("k").await,
            Err(PingboardError::Decode { .. })
        ));
    });
}

#[test]
fn scalar_read_of_a_set_is_a_decode_error() {
    let store = LocalStore::new();

    block_on(async {
        store.set_add("names", &["alice"]).await.unwrap();

        assert!(matches!(
            store.get("names").await,
            Err(PingboardError::Decode { .. })
        ));
    });
}

#[test]
fn set_membership_reads_absent_key_as_empty() {
    let store = LocalStore::new();

    block_on(async {
        assert!(!store.set_contains("names", "alice").await.unwrap());

        store.set_add("names", &["alice", "bob"]).await.unwrap();

        assert!(store.set_contains("names", "alice").await.unwrap());
        assert!(store.set_contains("names", "bob").await.unwrap());
        assert!(!store.set_contains("names", "carol").await.unwrap());
    });
}

#[test]
fn sorted_set_range_orders_by_score_then_member() {
    let store = LocalStore::new();

    block_on(async {
        store
            .sorted_set_add("board", &[("b", 1.0), ("c", 2.0), ("a", 1.0)])
            .await
            .unwrap();

        let ascending = store
            .sorted_set_range("board", SortOrder::Ascending)
            .await
            .unwrap();
        assert_eq!(
            ascending,
            vec![
                ("a".to_string(), 1.0),
                ("b".to_string(), 1.0),
                ("c".to_string(), 2.0)
            ]
        );

        let descending = store
            .sorted_set_range("board", SortOrder::Descending)
            .await
            .unwrap();
        assert_eq!(
            descending,
            vec![
                ("c".to_string(), 2.0),
                ("b".to_string(), 1.0),
                ("a".to_string(), 1.0)
            ]
        );
    });
}

#[test]
fn sorted_set_add_replaces_scores() {
    let store = LocalStore::new();

    block_on(async {
        store.sorted_set_add("board", &[("a", 1.0)]).await.unwrap();
        store.sorted_set_add("board", &[("a", 5.0)]).await.unwrap();

        let rows = store
            .sorted_set_range("board", SortOrder::Descending)
            .await
            .unwrap();
        assert_eq!(rows, vec![("a".to_string(), 5.0)]);
    });
}

#[test]
fn estimator_count_of_absent_key_is_zero() {
    let store = LocalStore::new();

    assert_eq!(block_on(store.estimator_count("pingers")).unwrap(), 0);
}
