//! Property tests for the in-memory session store's counting rules.

use std::collections::HashSet;

use proptest::prelude::*;

use prezo_live::adapters::memory::InMemorySessionStore;
use prezo_live::config::{PollRevotePolicy, StoreConfig};
use prezo_live::domain::foundation::{ClientId, JoinCode, OpenStatus};
use prezo_live::domain::poll::NewPoll;
use prezo_live::domain::question::NewQuestion;
use prezo_live::domain::word_cloud::NewWordCloud;
use prezo_live::ports::SessionStore;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn client(n: u8) -> ClientId {
    ClientId::new(format!("client-{n}")).unwrap()
}

/// Votes cast on one question by a sequence of clients (`None` is anonymous).
fn question_votes(voters: &[Option<u8>]) -> u32 {
    runtime().block_on(async {
        let store = InMemorySessionStore::default();
        let session = store.create_session(None).await.unwrap();
        store.set_qna_open(&session.id, true).await.unwrap();
        let question = store
            .create_question(&session.id, NewQuestion::new("Why?", None).unwrap())
            .await
            .unwrap();

        for voter in voters {
            let voter = voter.map(client);
            store
                .vote_question(&session.id, &question.id, voter.as_ref())
                .await
                .unwrap();
        }
        store.snapshot(&session.id).await.unwrap().questions[0].votes
    })
}

proptest! {
    #[test]
    fn question_votes_count_distinct_clients(
        voters in proptest::collection::vec(0u8..8, 0..40),
    ) {
        let distinct: HashSet<_> = voters.iter().copied().collect();
        let voters: Vec<_> = voters.into_iter().map(Some).collect();
        prop_assert_eq!(question_votes(&voters), distinct.len() as u32);
    }

    #[test]
    fn anonymous_votes_always_count(
        voters in proptest::collection::vec(proptest::option::of(0u8..4), 0..40),
    ) {
        let anonymous = voters.iter().filter(|v| v.is_none()).count();
        let identified: HashSet<_> = voters.iter().flatten().copied().collect();
        prop_assert_eq!(question_votes(&voters), (anonymous + identified.len()) as u32);
    }

    #[test]
    fn word_votes_are_once_per_client_per_word(
        votes in proptest::collection::vec((0u8..6, 0usize..3), 0..40),
    ) {
        let expected: HashSet<_> = votes.iter().copied().collect();
        let totals = runtime().block_on(async {
            let store = InMemorySessionStore::default();
            let session = store.create_session(None).await.unwrap();
            let words: Vec<String> =
                ["red", "green", "blue"].iter().map(|s| s.to_string()).collect();
            let cloud = store
                .create_word_cloud(&session.id, NewWordCloud::new(None, &words).unwrap())
                .await
                .unwrap();
            store
                .set_word_cloud_status(&session.id, &cloud.id, OpenStatus::Open)
                .await
                .unwrap();
            for (voter, word) in &votes {
                let word_id = cloud.words[*word].id;
                store
                    .vote_word_cloud(&session.id, &cloud.id, &word_id, Some(&client(*voter)))
                    .await
                    .unwrap();
            }
            let snapshot = store.snapshot(&session.id).await.unwrap();
            snapshot.word_clouds[0].words.iter().map(|w| w.votes).sum::<u32>()
        });
        prop_assert_eq!(totals, expected.len() as u32);
    }

    #[test]
    fn switch_policy_leaves_one_vote_per_client(
        votes in proptest::collection::vec((0u8..5, 0usize..3), 1..30),
    ) {
        let clients: HashSet<_> = votes.iter().map(|(c, _)| *c).collect();
        let total = runtime().block_on(async {
            let store = InMemorySessionStore::new(StoreConfig {
                poll_revote: PollRevotePolicy::Switch,
                ..StoreConfig::default()
            });
            let session = store.create_session(None).await.unwrap();
            let options: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
            let poll = store
                .create_poll(&session.id, NewPoll::new("Pick", &options, false).unwrap())
                .await
                .unwrap();
            store
                .set_poll_status(&session.id, &poll.id, OpenStatus::Open)
                .await
                .unwrap();
            for (voter, option) in &votes {
                let option_id = poll.options[*option].id;
                store
                    .vote_poll(&session.id, &poll.id, &option_id, Some(&client(*voter)))
                    .await
                    .unwrap();
            }
            store.snapshot(&session.id).await.unwrap().polls[0].total_votes()
        });
        prop_assert_eq!(total, clients.len() as u32);
    }

    #[test]
    fn session_codes_are_unique_and_resolvable(count in 1usize..60) {
        let (codes, resolved) = runtime().block_on(async {
            let store = InMemorySessionStore::default();
            let mut codes: Vec<JoinCode> = Vec::new();
            let mut resolved = 0;
            for _ in 0..count {
                let session = store.create_session(None).await.unwrap();
                let lower = JoinCode::parse(&session.code.as_str().to_lowercase()).unwrap();
                if store.get_session_by_code(&lower).await.unwrap().id == session.id {
                    resolved += 1;
                }
                codes.push(session.code);
            }
            (codes, resolved)
        });
        let distinct: HashSet<_> = codes.iter().collect();
        prop_assert_eq!(distinct.len(), count);
        prop_assert_eq!(resolved, count);
    }
}
