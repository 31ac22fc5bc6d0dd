use chrono::Duration;
use session_store::SessionStore;
use shared::domain::{Response, SessionId, SessionState};

#[tokio::test]
async fn concurrent_sessions_progress_independently() {
    let store = SessionStore::new(Duration::minutes(10));
    let ids: Vec<SessionId> = (0..8).map(|_| SessionId::new()).collect();

    let mut tasks = Vec::new();
    for (n, id) in ids.iter().copied().enumerate() {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            let mut state = SessionState {
                current_survey: Some(format!("survey-{n}")),
                responses: Some(Vec::new()),
                flashes: Vec::new(),
            };
            for i in 0..=n {
                if let Some(responses) = state.responses.as_mut() {
                    responses.push(Response {
                        choice: format!("{n}-{i}"),
                        text: String::new(),
                    });
                }
                store.save(id, state.clone()).await;
                state = store.load(id).await.expect("reload");
            }
        }));
    }
    for task in tasks {
        task.await.expect("task");
    }

    assert_eq!(store.len().await, ids.len());
    for (n, id) in ids.into_iter().enumerate() {
        let state = store.load(id).await.expect("session");
        assert_eq!(state.current_survey, Some(format!("survey-{n}")));
        assert_eq!(state.progress(), Some(n + 1));
    }
}
