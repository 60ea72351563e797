use std::sync::Arc;

use crate::{
    KeyGenerator, Leaderboard, ScoreEntry, SortOrder, StoreKey, local::LocalStore,
    tests::runtime::block_on,
};

fn leaderboard() -> Leaderboard<LocalStore> {
    let store = LocalStore::new();
    let keys = Arc::new(KeyGenerator::new(StoreKey::default_prefix()));

    Leaderboard::new(store, keys)
}

fn entry(user_name: &str, ping_count: u64) -> ScoreEntry {
    ScoreEntry {
        user_name: user_name.to_string(),
        ping_count,
    }
}

#[test]
fn top_descending_is_sorted_non_increasing_and_capped() {
    let board = leaderboard();

    block_on(async {
        board.update("alice", 3).await.unwrap();
        board.update("bob", 1).await.unwrap();
        board.update("carol", 2).await.unwrap();

        let top = board.top(2, SortOrder::Descending).await.unwrap();
        assert_eq!(top, vec![entry("alice", 3), entry("carol", 2)]);

        for pair in top.windows(2) {
            assert!(pair[0].ping_count >= pair[1].ping_count);
        }
    });
}

#[test]
fn top_ascending_reverses_the_order() {
    let board = leaderboard();

    block_on(async {
        board.update("alice", 3).await.unwrap();
        board.update("bob", 1).await.unwrap();

        let top = board.top(10, SortOrder::Ascending).await.unwrap();
        assert_eq!(top, vec![entry("bob", 1), entry("alice", 3)]);
    });
}

#[test]
fn update_replaces_rather_than_accumulates() {
    let board = leaderboard();

    block_on(async {
        board.update("alice", 1).await.unwrap();
        board.update("alice", 7).await.unwrap();

        let top = board.top(10, SortOrder::Descending).await.unwrap();
        assert_eq!(top, vec![entry("alice", 7)]);
    });
}

#[test]
fn zero_limit_yields_nothing_and_large_limit_yields_everything() {
    let board = leaderboard();

    block_on(async {
        board.update("alice", 1).await.unwrap();
        board.update("bob", 2).await.unwrap();

        assert!(board.top(0, SortOrder::Descending).await.unwrap().is_empty());

        let all = board.top(100, SortOrder::Descending).await.unwrap();
        assert_eq!(all.len(), 2);
    });
}

#[test]
fn empty_board_reads_empty() {
    let board = leaderboard();

    assert!(
        block_on(board.top(10, SortOrder::Descending))
            .unwrap()
            .is_empty()
    );
}
