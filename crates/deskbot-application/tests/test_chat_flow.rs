use deskbot_application::{ChatUseCase, EscalationUseCase, QueryOutcome, SharedState};
use deskbot_core::escalation::EscalationDraftInput;
use deskbot_core::session::{Environment, UserRole};
use deskbot_infrastructure::InMemoryStateStore;
use deskbot_interaction::{
    KnowledgeSearchAgent, ScriptedAnswerAgent, TrackerDraftAgent,
    scripted_answer_agent::{OPTION_NETWORK_SEGMENT, OPTION_OS, WINDOWS_11},
};
use std::sync::Arc;

async fn shared_state(store: InMemoryStateStore) -> SharedState {
    let state = SharedState::load_or_default(Arc::new(store))
        .await
        .expect("Should load state");
    state
        .mutate(|st| {
            st.init_session("alice", UserRole::User, Environment::Dev);
        })
        .await
        .expect("Should start session");
    state
}

fn chat(state: SharedState) -> ChatUseCase {
    ChatUseCase::new(
        state,
        Arc::new(ScriptedAnswerAgent::new().with_latency(false)),
        Arc::new(KnowledgeSearchAgent::new().with_latency(false)),
    )
}

#[tokio::test]
async fn test_full_clarification_episode() {
    let state = shared_state(InMemoryStateStore::new()).await;
    let chat = chat(state.clone());

    // The VPN script asks back before answering
    let outcome = chat
        .handle_query("vpn keeps disconnecting")
        .await
        .expect("Should run the query");
    let ask = match outcome {
        QueryOutcome::Clarification(message) => message,
        other => panic!("Expected a clarification ask, got {:?}", other),
    };
    let options = ask
        .body
        .answer()
        .and_then(|a| a.clarification.as_ref())
        .expect("Should carry clarification options")
        .options
        .clone();
    assert_eq!(options.len(), 3, "Should offer three options");

    // First selection stays below the threshold
    let first = chat
        .select_clarification(OPTION_OS, WINDOWS_11)
        .await
        .expect("Should record the selection");
    assert!(first.is_none(), "One selection should not re-query yet");

    // Second distinct selection triggers the automatic re-query
    let second = chat
        .select_clarification(OPTION_NETWORK_SEGMENT, "Office LAN")
        .await
        .expect("Should record the selection");
    let solution = match second {
        Some(QueryOutcome::Answer(message)) => message,
        other => panic!("Expected the refined answer, got {:?}", other),
    };
    let answer = solution.body.answer().expect("Should carry the answer");
    assert!(answer.confidence > 0.9, "Should be the refined answer");
    assert!(answer.steps[0].contains("Windows 11"));

    state
        .read(|st| {
            // user question + ask-back + solution
            let session = st.session.as_ref().expect("Should have a session");
            assert_eq!(session.messages.len(), 3, "Should hold exactly 3 messages");
            assert!(!st.clarification.is_awaiting(), "Flow should be closed");
            assert!(
                !st.current_sources.is_empty(),
                "Re-query should refresh sources"
            );
        })
        .await;
}

#[tokio::test]
async fn test_escalation_outage_and_recovery() {
    let state = shared_state(InMemoryStateStore::new()).await;
    let tracker = TrackerDraftAgent::new()
        .with_latency(false)
        .with_available(false);
    let escalation = EscalationUseCase::new(state.clone(), Arc::new(tracker.clone()));

    // Submission against a down tracker lands in the retry queue
    let input = EscalationDraftInput::prefill(Some("laptop will not boot"), None);
    let error = escalation
        .submit(input, None)
        .await
        .expect_err("Should fail while the tracker is down");
    assert!(error.is_collaborator());

    let (queued, last_attempt) = escalation.queue().await;
    assert_eq!(queued.len(), 1, "Should queue the failed draft");
    assert!(last_attempt.is_some(), "Should stamp the attempt");

    // Once the tracker is back, draining empties the queue
    tracker.set_available(true);
    let report = escalation.drain().await.expect("Should drain the queue");
    assert_eq!(report.submitted.len(), 1, "Should submit the queued draft");
    assert_eq!(report.remaining, 0);
    assert_eq!(report.submitted[0].summary, "laptop will not boot");
    assert!(report.submitted[0].link.starts_with("jira://draft/"));
}

#[tokio::test]
async fn test_conversation_survives_a_restart() {
    let store = InMemoryStateStore::new();
    let state = shared_state(store.clone()).await;
    let chat = chat(state);

    let outcome = chat
        .handle_query("zabbix agent offline")
        .await
        .expect("Should run the query");
    assert!(matches!(outcome, QueryOutcome::Answer(_)));

    // A fresh SharedState over the same store plays the role of a restart
    let reloaded = SharedState::load_or_default(Arc::new(store))
        .await
        .expect("Should hydrate");
    reloaded
        .read(|st| {
            let session = st.session.as_ref().expect("Session should survive");
            assert_eq!(session.messages.len(), 2, "History should survive");
            assert_eq!(session.user, "alice");
            assert!(
                st.current_sources.is_empty(),
                "Retrieved sources are volatile"
            );
            assert!(!st.clarification.is_awaiting());
            assert_eq!(st.session_epoch, 0, "Epoch restarts at zero");
        })
        .await;
}
