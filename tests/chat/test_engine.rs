// End-to-end orchestrator scenarios with scripted model clients

use std::sync::Arc;
use std::time::Duration;

use ragchat_node::embeddings::HashEmbedder;
use ragchat_node::{ChatEngine, ChatError, Role};

use super::support::{engine_with_llm, test_config, Reply, ScriptedLlm, SlowLlm, MISSION_CORPUS};

#[tokio::test]
async fn test_grounded_answer_returned_unmodified() {
    let dir = tempfile::tempdir().unwrap();
    let llm = ScriptedLlm::new([Reply::Text(
        "Our mission is to enable chat commerce for businesses everywhere.",
    )]);
    let engine = engine_with_llm(dir.path(), MISSION_CORPUS, llm.clone()).await;

    let reply = engine.handle_turn("session-a", "What is the mission?").await.unwrap();
    assert!(reply.contains("chat commerce"));

    // The retrieved context made it into the prompt
    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Our mission is to enable chat commerce"));
    assert!(prompts[0].contains("User: What is the mission?"));

    // Exactly two turns appended: the question and the answer
    let history = engine.session_history("session-a").await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text, "What is the mission?");
    assert_eq!(history[1].role, Role::Assistant);
    assert!(history[1].text.contains("chat commerce"));
}

#[tokio::test]
async fn test_duplicate_questions_both_invoke_generation() {
    let dir = tempfile::tempdir().unwrap();
    let llm = ScriptedLlm::new([Reply::Text("Answer one."), Reply::Text("Answer two.")]);
    let engine = engine_with_llm(dir.path(), MISSION_CORPUS, llm.clone()).await;

    engine.handle_turn("s", "What is the mission?").await.unwrap();
    engine.handle_turn("s", "What is the mission?").await.unwrap();

    assert_eq!(llm.invocation_count(), 2);
    assert_eq!(engine.session_history("s").await.len(), 4);
}

#[tokio::test]
async fn test_generation_failure_leaves_session_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let llm = ScriptedLlm::new([
        Reply::Text("The mission is chat commerce."),
        Reply::Timeout,
        Reply::Text("Billing runs monthly."),
    ]);
    let engine = engine_with_llm(dir.path(), MISSION_CORPUS, llm).await;

    engine.handle_turn("s", "What is the mission?").await.unwrap();
    let before = engine.session_history("s").await;

    let reply = engine.handle_turn("s", "How does billing work?").await.unwrap();
    assert!(reply.contains("Sorry"));
    assert_eq!(engine.session_history("s").await, before);

    // The session is intact: retrying the same question works normally
    let retry = engine.handle_turn("s", "How does billing work?").await.unwrap();
    assert_eq!(retry, "Billing runs monthly.");
    assert_eq!(engine.session_history("s").await.len(), 4);
}

#[tokio::test]
async fn test_empty_input_rejected_before_touching_state() {
    let dir = tempfile::tempdir().unwrap();
    let llm = ScriptedLlm::new([]);
    let engine = engine_with_llm(dir.path(), MISSION_CORPUS, llm.clone()).await;

    for input in ["", "   ", "\t\n"] {
        let err = engine.handle_turn("s", input).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidSessionInput(_)));
    }

    assert_eq!(llm.invocation_count(), 0);
    assert_eq!(engine.session_count().await, 0);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let llm = ScriptedLlm::new([Reply::Text("Hello A."), Reply::Text("Hello B.")]);
    let engine = engine_with_llm(dir.path(), MISSION_CORPUS, llm).await;

    engine.handle_turn("B", "hello there").await.unwrap();
    let b_before = engine.session_history("B").await;

    engine.handle_turn("A", "hello").await.unwrap();

    assert_eq!(engine.session_history("B").await, b_before);
    assert_eq!(engine.session_history("A").await.len(), 2);
}

#[tokio::test]
async fn test_reset_session_clears_history() {
    let dir = tempfile::tempdir().unwrap();
    let llm = ScriptedLlm::new([Reply::Text("First answer."), Reply::Text("Second answer.")]);
    let engine = engine_with_llm(dir.path(), MISSION_CORPUS, llm).await;

    engine.handle_turn("s", "What is the mission?").await.unwrap();
    assert_eq!(engine.session_history("s").await.len(), 2);

    engine.reset_session("s").await;
    assert!(engine.session_history("s").await.is_empty());

    // Session remains usable after reset
    let reply = engine.handle_turn("s", "And billing?").await.unwrap();
    assert_eq!(reply, "Second answer.");
}

#[tokio::test]
async fn test_same_session_turns_serialize() {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(SlowLlm {
        delay: Duration::from_millis(50),
    });
    let engine = Arc::new(engine_with_llm(dir.path(), MISSION_CORPUS, llm).await);

    let a = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.handle_turn("same", "first question").await })
    };
    let b = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.handle_turn("same", "second question").await })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Both turns completed and the history interleaves cleanly:
    // user/assistant pairs, never two user turns from racing appends
    let history = engine.session_history("same").await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[2].role, Role::User);
    assert_eq!(history[3].role, Role::Assistant);
}

#[tokio::test]
async fn test_persisted_index_is_reused_on_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), MISSION_CORPUS);
    let index_path = config.index_path.clone();

    {
        let llm = ScriptedLlm::new([]);
        let embedder = Arc::new(HashEmbedder::new(config.embedding_dimension));
        ChatEngine::new(config.clone(), embedder, llm).await.unwrap();
    }
    assert!(index_path.exists());

    // Delete the corpus: a second startup must load the persisted index
    // rather than rebuilding from the (now missing) source document
    std::fs::remove_file(&config.corpus_path).unwrap();

    let llm = ScriptedLlm::new([Reply::Text("Loaded from disk.")]);
    let embedder = Arc::new(HashEmbedder::new(config.embedding_dimension));
    let engine = ChatEngine::new(config, embedder, llm.clone()).await.unwrap();

    let reply = engine.handle_turn("s", "What is the mission?").await.unwrap();
    assert_eq!(reply, "Loaded from disk.");
    assert!(llm.prompts()[0].contains("chat commerce"));
}

#[tokio::test]
async fn test_missing_corpus_is_fatal_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), MISSION_CORPUS);
    std::fs::remove_file(&config.corpus_path).unwrap();
    config.index_path = dir.path().join("never_built.bin");

    let llm = ScriptedLlm::new([]);
    let embedder = Arc::new(HashEmbedder::new(config.embedding_dimension));
    let err = ChatEngine::new(config, embedder, llm).await.unwrap_err();

    assert!(matches!(err, ChatError::CorpusLoad { .. }));
    assert!(err.is_fatal());
}
