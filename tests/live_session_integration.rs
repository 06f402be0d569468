//! Integration tests for the live session flow.
//!
//! These tests drive the public API the way the HTTP and WebSocket
//! adapters do:
//! 1. Mutate through the session store
//! 2. Publish through the broadcast coordinator
//! 3. Observe what joined viewers receive

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use prezo_live::application::{JoinError, LiveContext};
use prezo_live::config::AppConfig;
use prezo_live::domain::event::{EventKind, LiveEvent};
use prezo_live::domain::foundation::{ClientId, OpenStatus, SessionId};
use prezo_live::domain::poll::NewPoll;
use prezo_live::domain::question::NewQuestion;
use prezo_live::domain::session::QnaMode;
use prezo_live::domain::word_cloud::NewWordCloud;
use prezo_live::ports::{DeliveryError, LiveConnection};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Viewer that records every delivered event and its close code.
#[derive(Clone, Default)]
struct RecordingViewer {
    events: Arc<Mutex<Vec<LiveEvent>>>,
    closed_with: Arc<Mutex<Option<u16>>>,
}

impl RecordingViewer {
    fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    /// Wait until `count` events have arrived; broadcasts are written by a
    /// background task.
    async fn wait_for(&self, count: usize) -> Vec<EventKind> {
        let arrived = tokio::time::timeout(Duration::from_secs(2), async {
            while self.events.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(arrived.is_ok(), "expected {count} events, got {:?}", self.kinds());
        self.kinds()
    }
}

#[async_trait]
impl LiveConnection for RecordingViewer {
    async fn deliver(&mut self, event: &LiveEvent) -> Result<(), DeliveryError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn close(&mut self, code: u16, _reason: &str) {
        *self.closed_with.lock().unwrap() = Some(code);
    }
}

fn started_context() -> LiveContext {
    let context = LiveContext::new(&AppConfig::default());
    context.start();
    context
}

fn client(id: &str) -> ClientId {
    ClientId::new(id).unwrap()
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn audience_qna_round_trip() {
    let context = started_context();
    let store = context.store().clone();
    let session = store.create_session(Some("Town hall".into())).await.unwrap();
    let viewer = RecordingViewer::default();
    context
        .join(&session.id, Box::new(viewer.clone()))
        .await
        .unwrap();

    let opened = store.set_qna_open(&session.id, true).await.unwrap();
    context
        .broadcaster()
        .publish(&session.id, LiveEvent::qna_toggled(&opened))
        .await;

    let q1 = store
        .create_question(&session.id, NewQuestion::new("What is X?", None).unwrap())
        .await
        .unwrap();
    let q2 = store
        .create_question(&session.id, NewQuestion::new("And Y?", None).unwrap())
        .await
        .unwrap();
    for question in [&q1, &q2] {
        context
            .broadcaster()
            .publish(&session.id, LiveEvent::question_submitted(question))
            .await;
    }

    let a = client("client-a");
    let b = client("client-b");
    store.vote_question(&session.id, &q1.id, Some(&a)).await.unwrap();
    let again = store.vote_question(&session.id, &q1.id, Some(&a)).await.unwrap();
    assert_eq!(again.votes, 1);
    let voted = store.vote_question(&session.id, &q1.id, Some(&b)).await.unwrap();
    context
        .broadcaster()
        .publish(&session.id, LiveEvent::question_voted(&voted))
        .await;

    assert_eq!(voted.votes, 2);
    assert_eq!(
        viewer.wait_for(5).await,
        vec![
            EventKind::SessionSnapshot,
            EventKind::QnaOpened,
            EventKind::QuestionSubmitted,
            EventKind::QuestionSubmitted,
            EventKind::QuestionVoteUpdated,
        ]
    );

    let snapshot = store.snapshot(&session.id).await.unwrap();
    let texts: Vec<_> = snapshot.questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["What is X?", "And Y?"]);
    assert_eq!(snapshot.questions[0].votes, 2);
    assert_eq!(snapshot.questions[1].votes, 0);
    assert!(snapshot.session.qna_open);
}

#[tokio::test]
async fn late_joiner_sees_state_in_snapshot() {
    let context = started_context();
    let store = context.store().clone();
    let session = store.create_session(None).await.unwrap();
    let poll = store
        .create_poll(
            &session.id,
            NewPoll::new("Lunch?", &labels(&["Pizza", "Salad"]), false).unwrap(),
        )
        .await
        .unwrap();
    store
        .set_poll_status(&session.id, &poll.id, OpenStatus::Open)
        .await
        .unwrap();

    let viewer = RecordingViewer::default();
    context
        .join(&session.id, Box::new(viewer.clone()))
        .await
        .unwrap();

    let events = viewer.events.lock().unwrap().clone();
    assert_eq!(events.len(), 1);
    let polls = &events[0].payload["snapshot"]["polls"];
    assert_eq!(polls[0]["question"], "Lunch?");
    assert_eq!(polls[0]["status"], "open");
}

#[tokio::test]
async fn opening_a_word_cloud_closes_the_previous_one_first() {
    let context = started_context();
    let store = context.store().clone();
    let session = store.create_session(None).await.unwrap();
    let words = labels(&["calm", "busy"]);
    let w1 = store
        .create_word_cloud(&session.id, NewWordCloud::new(None, &words).unwrap())
        .await
        .unwrap();
    let w2 = store
        .create_word_cloud(&session.id, NewWordCloud::new(Some("Mood?"), &words).unwrap())
        .await
        .unwrap();
    store
        .set_word_cloud_status(&session.id, &w1.id, OpenStatus::Open)
        .await
        .unwrap();

    let viewer = RecordingViewer::default();
    context
        .join(&session.id, Box::new(viewer.clone()))
        .await
        .unwrap();

    let transition = store
        .set_word_cloud_status(&session.id, &w2.id, OpenStatus::Open)
        .await
        .unwrap();
    context
        .broadcaster()
        .publish_all(&session.id, transition.events())
        .await;

    assert_eq!(
        viewer.wait_for(3).await,
        vec![
            EventKind::SessionSnapshot,
            EventKind::WordCloudClosed,
            EventKind::WordCloudOpened,
        ]
    );
    let events = viewer.events.lock().unwrap().clone();
    assert_eq!(events[1].payload["word_cloud"]["id"], w1.id.to_string());
    assert_eq!(events[2].payload["word_cloud"]["id"], w2.id.to_string());

    let snapshot = store.snapshot(&session.id).await.unwrap();
    assert_eq!(snapshot.open_word_clouds().count(), 1);
}

#[tokio::test]
async fn joining_an_unknown_session_is_closed_with_4404() {
    let context = started_context();
    let viewer = RecordingViewer::default();

    let result = context
        .join(&SessionId::new(), Box::new(viewer.clone()))
        .await;

    assert!(matches!(result, Err(JoinError::SessionNotFound)));
    assert_eq!(*viewer.closed_with.lock().unwrap(), Some(4404));
    assert!(viewer.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn single_select_poll_keeps_the_first_choice() {
    let context = started_context();
    let store = context.store().clone();
    let session = store.create_session(None).await.unwrap();
    let poll = store
        .create_poll(
            &session.id,
            NewPoll::new("Pick one", &labels(&["A", "B"]), false).unwrap(),
        )
        .await
        .unwrap();
    store
        .set_poll_status(&session.id, &poll.id, OpenStatus::Open)
        .await
        .unwrap();
    let voter = client("voter");
    let (a, b) = (poll.options[0].id, poll.options[1].id);

    store
        .vote_poll(&session.id, &poll.id, &a, Some(&voter))
        .await
        .unwrap();
    let after = store
        .vote_poll(&session.id, &poll.id, &b, Some(&voter))
        .await
        .unwrap();

    assert_eq!(after.options[0].votes, 1);
    assert_eq!(after.options[1].votes, 0);
}

#[tokio::test]
async fn multi_select_poll_counts_each_option_once() {
    let context = started_context();
    let store = context.store().clone();
    let session = store.create_session(None).await.unwrap();
    let poll = store
        .create_poll(
            &session.id,
            NewPoll::new("Pick many", &labels(&["A", "B", "C"]), true).unwrap(),
        )
        .await
        .unwrap();
    store
        .set_poll_status(&session.id, &poll.id, OpenStatus::Open)
        .await
        .unwrap();
    let voter = client("voter");
    let (a, b) = (poll.options[0].id, poll.options[1].id);

    for option in [a, b, a] {
        store
            .vote_poll(&session.id, &poll.id, &option, Some(&voter))
            .await
            .unwrap();
    }
    let after = store.snapshot(&session.id).await.unwrap().polls[0].clone();

    assert_eq!(after.options[0].votes, 1);
    assert_eq!(after.options[1].votes, 1);
    assert_eq!(after.options[2].votes, 0);
    assert_eq!(after.total_votes(), 2);
}

#[tokio::test]
async fn ending_a_session_notifies_viewers_and_freezes_state() {
    let context = started_context();
    let store = context.store().clone();
    let session = store.create_session(None).await.unwrap();
    store.set_qna_open(&session.id, true).await.unwrap();
    let viewer = RecordingViewer::default();
    context
        .join(&session.id, Box::new(viewer.clone()))
        .await
        .unwrap();

    let ended = store.end_session(&session.id).await.unwrap();
    context
        .broadcaster()
        .publish(&session.id, LiveEvent::session_ended(&ended))
        .await;

    assert_eq!(
        viewer.wait_for(2).await,
        vec![EventKind::SessionSnapshot, EventKind::SessionEnded]
    );
    assert!(!ended.qna_open);
    let refused = store
        .create_question(&session.id, NewQuestion::new("Too late", None).unwrap())
        .await;
    assert!(refused.is_err());
}

#[tokio::test]
async fn qna_config_change_reaches_viewers_through_commit() {
    let context = started_context();
    let store = context.store().clone();
    let session = store.create_session(None).await.unwrap();
    let viewer = RecordingViewer::default();
    context
        .join(&session.id, Box::new(viewer.clone()))
        .await
        .unwrap();

    let updated = context
        .broadcaster()
        .commit(
            &session.id,
            store.set_qna_config(&session.id, QnaMode::Prompt, Some("Ask the panel".into())),
            |session| vec![LiveEvent::qna_config_updated(session)],
        )
        .await
        .unwrap();

    assert_eq!(updated.qna_mode, QnaMode::Prompt);
    assert_eq!(
        viewer.wait_for(2).await,
        vec![EventKind::SessionSnapshot, EventKind::QnaConfigUpdated]
    );
    let events = viewer.events.lock().unwrap().clone();
    assert_eq!(events[1].payload["session"]["qna_prompt"], "Ask the panel");
}

#[tokio::test]
async fn snapshot_on_join_carries_the_public_join_url() {
    let mut config = AppConfig::default();
    config.server.public_base_url = Some("https://prezo.example/".into());
    let context = LiveContext::new(&config);
    context.start();
    let session = context.store().create_session(None).await.unwrap();
    let viewer = RecordingViewer::default();

    context
        .join(&session.id, Box::new(viewer.clone()))
        .await
        .unwrap();

    let events = viewer.events.lock().unwrap().clone();
    assert_eq!(
        events[0].payload["snapshot"]["session"]["join_url"],
        format!("https://prezo.example/join/{}", session.code)
    );
}
