use super::*;
use shared::domain::Response;

fn in_progress(survey: &str, answered: usize) -> SessionState {
    SessionState {
        current_survey: Some(survey.to_string()),
        responses: Some(
            (0..answered)
                .map(|i| Response {
                    choice: format!("choice-{i}"),
                    text: String::new(),
                })
                .collect(),
        ),
        flashes: Vec::new(),
    }
}

#[tokio::test]
async fn load_returns_none_for_unknown_session() {
    let store = SessionStore::new(Duration::minutes(5));
    assert!(store.load(SessionId::new()).await.is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn save_overwrites_previous_state() {
    let store = SessionStore::new(Duration::minutes(5));
    let id = SessionId::new();
    store.save(id, in_progress("a", 2)).await;
    store.save(id, in_progress("b", 0)).await;

    let loaded = store.load(id).await.expect("session");
    assert_eq!(loaded.current_survey.as_deref(), Some("b"));
    assert_eq!(loaded.progress(), Some(0));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn sessions_are_isolated_by_id() {
    let store = SessionStore::new(Duration::minutes(5));
    let alice = SessionId::new();
    let bob = SessionId::new();
    store.save(alice, in_progress("a", 1)).await;
    store.save(bob, in_progress("b", 3)).await;

    assert_eq!(store.load(alice).await.expect("alice").progress(), Some(1));
    assert_eq!(store.load(bob).await.expect("bob").progress(), Some(3));
}

#[tokio::test]
async fn load_refreshes_idle_timer() {
    let store = SessionStore::new(Duration::seconds(10));
    let id = SessionId::new();
    let start = Utc::now();
    store.save_at(id, in_progress("a", 0), start).await;

    assert!(store
        .load_at(id, start + Duration::seconds(8))
        .await
        .is_some());
    assert!(store
        .load_at(id, start + Duration::seconds(16))
        .await
        .is_some());
}

#[tokio::test]
async fn expired_session_is_dropped_on_load() {
    let store = SessionStore::new(Duration::seconds(10));
    let id = SessionId::new();
    let start = Utc::now();
    store.save_at(id, in_progress("a", 0), start).await;

    assert!(store
        .load_at(id, start + Duration::seconds(10))
        .await
        .is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn purge_removes_only_idle_sessions() {
    let store = SessionStore::new(Duration::seconds(30));
    let stale = SessionId::new();
    let fresh = SessionId::new();
    let start = Utc::now();
    store.save_at(stale, in_progress("a", 1), start).await;
    store
        .save_at(fresh, in_progress("b", 1), start + Duration::seconds(20))
        .await;

    let purged = store.purge_expired_at(start + Duration::seconds(40)).await;
    assert_eq!(purged, 1);
    assert!(store.load_at(fresh, start + Duration::seconds(40)).await.is_some());
    assert!(store.load_at(stale, start + Duration::seconds(40)).await.is_none());
}

#[tokio::test]
async fn remove_reports_whether_session_existed() {
    let store = SessionStore::new(Duration::minutes(1));
    let id = SessionId::new();
    store.save(id, SessionState::default()).await;
    assert!(store.remove(id).await);
    assert!(!store.remove(id).await);
}
