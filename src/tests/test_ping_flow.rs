use std::{thread, time::Duration};

use crate::{
    CooldownSeconds, DEFAULT_TOP_LIMIT, PingService, PingServiceOptions, PingboardError,
    RateLimitKind, SessionId, SortOrder, UserName, WindowLimit, WindowSizeSeconds,
    local::LocalStore, tests::runtime::block_on,
};

fn service(cooldown_s: u64, window_s: u64, limit: u64) -> PingService<LocalStore> {
    PingService::new(
        LocalStore::new(),
        PingServiceOptions {
            prefix: None,
            cooldown_seconds: CooldownSeconds::try_from(cooldown_s).unwrap(),
            window_size_seconds: WindowSizeSeconds::try_from(window_s).unwrap(),
            window_limit: WindowLimit::try_from(limit).unwrap(),
        },
    )
}

fn session_id(s: &str) -> SessionId {
    SessionId::try_from(s.to_string()).unwrap()
}

fn user(s: &str) -> UserName {
    UserName::try_from(s.to_string()).unwrap()
}

#[test]
fn ping_for_unknown_session_is_not_found() {
    let service = service(1, 60, 2);

    assert!(matches!(
        block_on(service.ping(&session_id("nope"))),
        Err(PingboardError::SessionNotFound(_))
    ));
}

// The canonical scenario: cooldown rejection, window exhaustion after the
// cooldown has elapsed, and leaderboard/estimator tracking along the way.
// Durations are scaled down (1s cooldown, 60s window) to keep it fast.
#[test]
fn two_tier_rate_limited_ping_scenario() {
    let service = service(1, 60, 2);
    let alice = user("alice");
    let s = session_id("alice1");

    block_on(async {
        service.create_session(&s, &alice).await.unwrap();

        // First ping lands: count 1, leaderboard and estimator updated.
        assert_eq!(service.ping(&s).await.unwrap(), 1);

        let top = service.top(10, SortOrder::Descending).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].user_name, "alice");
        assert_eq!(top[0].ping_count, 1);

        assert_eq!(service.distinct_pingers().await.unwrap(), 1);

        // Immediate second ping trips the cooldown gate.
        let err = service.ping(&s).await.unwrap_err();
        assert!(matches!(
            err,
            PingboardError::RateLimited(RateLimitKind::CooldownActive { .. })
        ));

        // The rejected ping mutated nothing.
        assert_eq!(service.session(&s).await.unwrap().ping_count, 1);
        let top = service.top(10, SortOrder::Descending).await.unwrap();
        assert_eq!(top[0].ping_count, 1);
    });

    thread::sleep(Duration::from_millis(1100));

    block_on(async {
        // Cooldown elapsed: second slot of the 60s window is consumed.
        assert_eq!(service.ping(&s).await.unwrap(), 2);

        let top = service.top(10, SortOrder::Descending).await.unwrap();
        assert_eq!(top[0].ping_count, 2);
    });

    thread::sleep(Duration::from_millis(1100));

    block_on(async {
        // Cooldown elapsed again, but the window is exhausted.
        let err = service.ping(&s).await.unwrap_err();
        assert!(matches!(
            &err,
            PingboardError::RateLimited(RateLimitKind::WindowExhausted {
                limit: 2,
                window_size_seconds: 60
            })
        ));
        assert!(err.is_rate_limited());

        assert_eq!(service.session(&s).await.unwrap().ping_count, 2);
        assert_eq!(service.distinct_pingers().await.unwrap(), 1);
    });
}

#[test]
fn leaderboard_ranks_across_sessions() {
    let service = service(1, 60, 2);

    block_on(async {
        service
            .create_session(&session_id("s_alice"), &user("alice"))
            .await
            .unwrap();
        service
            .create_session(&session_id("s_bob"), &user("bob"))
            .await
            .unwrap();

        service.ping(&session_id("s_alice")).await.unwrap();
        service.ping(&session_id("s_bob")).await.unwrap();
    });

    thread::sleep(Duration::from_millis(1100));

    block_on(async {
        service.ping(&session_id("s_alice")).await.unwrap();

        let top = service.top(10, SortOrder::Descending).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_name, "alice");
        assert_eq!(top[0].ping_count, 2);
        assert_eq!(top[1].user_name, "bob");
        assert_eq!(top[1].ping_count, 1);

        assert_eq!(service.distinct_pingers().await.unwrap(), 2);
    });
}

#[test]
fn top_default_serves_the_ten_highest_scores() {
    let service = service(1, 60, 2);

    block_on(async {
        // 12 users ping once each; "alice" pings again after her cooldown to
        // take the top row.
        for i in 0..12 {
            let name = format!("user{i:02}");
            let s = session_id(&name);
            service.create_session(&s, &user(&name)).await.unwrap();
            service.ping(&s).await.unwrap();
        }
        service
            .create_session(&session_id("s_alice"), &user("alice"))
            .await
            .unwrap();
        service.ping(&session_id("s_alice")).await.unwrap();
    });

    thread::sleep(Duration::from_millis(1100));

    block_on(async {
        service.ping(&session_id("s_alice")).await.unwrap();

        let top = service.top_default().await.unwrap();
        assert_eq!(top.len(), DEFAULT_TOP_LIMIT);
        assert_eq!(top[0].user_name, "alice");
        assert_eq!(top[0].ping_count, 2);
        assert!(top[1..].iter().all(|row| row.ping_count == 1));
    });
}

#[test]
fn username_conflict_surfaces_through_the_service() {
    let service = service(1, 60, 2);

    block_on(async {
        service
            .create_session(&session_id("s1"), &user("alice"))
            .await
            .unwrap();

        assert!(matches!(
            service
                .create_session(&session_id("s2"), &user("alice"))
                .await,
            Err(PingboardError::UsernameTaken(_))
        ));
    });
}
