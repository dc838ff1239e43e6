//! Per-session turn orchestration

use std::sync::Arc;
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::context::ContextAssembler;
use crate::error::Result;
use crate::generation::{strip_quotes, PromptBuilder};
use crate::history::HistoryStore;
use crate::providers::{CompletionClient, RetrievalClient};
use crate::rewrite::QueryRewriter;
use crate::types::{ModelId, Turn};

/// One conversation: its history, configuration, and pipeline components
///
/// A session processes one question at a time. All state is in-memory and
/// owned exclusively by the session; independent sessions never share a
/// history store.
pub struct ChatSession {
    id: Uuid,
    history_window_size: usize,
    use_history: bool,
    model: ModelId,
    history: HistoryStore,
    rewriter: QueryRewriter,
    assembler: ContextAssembler,
    completion: Arc<dyn CompletionClient>,
}

impl ChatSession {
    /// Create a session over the given backends
    ///
    /// Fails fast on invalid configuration, before any external call can be
    /// made on behalf of this session.
    pub fn new(
        config: &ChatConfig,
        retrieval: Arc<dyn RetrievalClient>,
        completion: Arc<dyn CompletionClient>,
    ) -> Result<Self> {
        config.validate()?;

        let model = config.llm.model;

        Ok(Self {
            id: Uuid::new_v4(),
            history_window_size: config.session.history_window_size,
            use_history: config.session.use_history,
            model,
            history: HistoryStore::new(),
            rewriter: QueryRewriter::new(Arc::clone(&completion), model, config.session.debug),
            assembler: ContextAssembler::new(retrieval, config.retrieval.context_k),
            completion,
        })
    }

    /// Answer one question and record the exchange
    ///
    /// The rewrite step only runs when history is in play: `use_history` set
    /// and at least two recorded turns. A failed rewrite falls back to the
    /// raw question; any later failure aborts the turn with the history
    /// untouched, so the two appends at the end happen together or not at
    /// all.
    pub async fn ask(&self, question: &str) -> Result<String> {
        tracing::info!(session = %self.id, "question: \"{}\"", question);

        let (window, effective_query) = if !self.use_history || self.history.len() < 2 {
            (Vec::new(), question.to_string())
        } else {
            let window = self.history.window(self.history_window_size);
            match self.rewriter.rewrite(&window, question).await {
                Ok(query) => (window, query),
                Err(e) => {
                    tracing::warn!(
                        session = %self.id,
                        "query rewrite failed, retrieving with the raw question: {}",
                        e
                    );
                    (window, question.to_string())
                }
            }
        };

        let context = self.assembler.assemble(&effective_query).await?;
        if context.is_empty() {
            tracing::debug!(session = %self.id, "retrieval returned no passages");
        }

        let history_text = PromptBuilder::render_history(&window);
        let prompt = PromptBuilder::build_chat_prompt(question, &context, &history_text);

        let answer = self.completion.complete(self.model, &prompt).await?;
        let answer = strip_quotes(answer.trim());

        self.history.append(Turn::user(question));
        self.history.append(Turn::assistant(&answer));

        tracing::info!(
            session = %self.id,
            turns = self.history.len(),
            "answer recorded"
        );

        Ok(answer)
    }

    /// Discard the conversation so far; idempotent
    pub fn reset(&self) {
        self.history.clear();
        tracing::info!(session = %self.id, "conversation reset");
    }

    /// Session identifier for log correlation
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The model answering this session's questions
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Number of recorded turns
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// Snapshot of the recorded conversation
    pub fn turns(&self) -> Vec<Turn> {
        self.history.turns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    use crate::error::Error;
    use crate::types::Role;

    struct FakeRetrieval {
        passages: Vec<String>,
        fail: bool,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl FakeRetrieval {
        fn with_passages(passages: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                passages: passages.iter().map(|s| s.to_string()).collect(),
                fail: false,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                passages: Vec::new(),
                fail: true,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RetrievalClient for FakeRetrieval {
        async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>> {
            self.calls.lock().push((query.to_string(), k));
            if self.fail {
                return Err(Error::Retrieval("index offline".to_string()));
            }
            Ok(self.passages.clone())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    /// Replies in order from a script; `Err` entries simulate backend failure
    struct FakeCompletion {
        script: Mutex<VecDeque<std::result::Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeCompletion {
        fn scripted(replies: &[std::result::Result<&str, &str>]) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(
                    replies
                        .iter()
                        .map(|r| match r {
                            Ok(s) => Ok(s.to_string()),
                            Err(s) => Err(s.to_string()),
                        })
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.prompts.lock().len()
        }
    }

    #[async_trait]
    impl CompletionClient for FakeCompletion {
        async fn complete(&self, _model: ModelId, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            match self.script.lock().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(message)) => Err(Error::Completion(message)),
                None => Err(Error::Completion("script exhausted".to_string())),
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn session(
        retrieval: Arc<FakeRetrieval>,
        completion: Arc<FakeCompletion>,
        use_history: bool,
    ) -> ChatSession {
        let mut config = ChatConfig::default();
        config.session.use_history = use_history;
        ChatSession::new(&config, retrieval, completion).unwrap()
    }

    async fn seed_turns(session: &ChatSession, completion: &Arc<FakeCompletion>, exchanges: usize) {
        for i in 0..exchanges {
            // once two turns exist, ask() spends an extra completion on the rewrite
            if session.use_history && session.turn_count() >= 2 {
                completion
                    .script
                    .lock()
                    .push_back(Ok(format!("seed rewrite {}", i)));
            }
            completion
                .script
                .lock()
                .push_back(Ok(format!("seed answer {}", i)));
            session.ask(&format!("seed question {}", i)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_first_question_skips_rewrite() {
        // Empty history, use_history on: turn count < 2 means no rewrite call
        let retrieval = FakeRetrieval::with_passages(&["A bold Rioja for $15. "]);
        let completion = FakeCompletion::scripted(&[Ok("Try the Rioja.")]);
        let session = session(retrieval.clone(), completion.clone(), true);

        let answer = session.ask("Recommend a red wine under $20").await.unwrap();

        assert_eq!(answer, "Try the Rioja.");
        assert_eq!(completion.call_count(), 1);
        assert_eq!(
            retrieval.calls.lock()[0].0,
            "Recommend a red wine under $20"
        );
        assert_eq!(session.turn_count(), 2);
    }

    #[tokio::test]
    async fn test_turn_ordering_after_ask() {
        let retrieval = FakeRetrieval::with_passages(&[]);
        let completion = FakeCompletion::scripted(&[Ok("the answer")]);
        let session = session(retrieval, completion, true);

        session.ask("the question").await.unwrap();

        let turns = session.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "the question");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].text, "the answer");
    }

    #[tokio::test]
    async fn test_history_disabled_uses_literal_question() {
        // Five prior turns recorded, use_history off: retrieval sees the
        // literal question and the rewriter never runs
        let retrieval = FakeRetrieval::with_passages(&["passage"]);
        let completion = FakeCompletion::scripted(&[]);
        let session = session(retrieval.clone(), completion.clone(), false);

        seed_turns(&session, &completion, 2).await;
        session.history.append(Turn::user("dangling question"));
        assert_eq!(session.turn_count(), 5);

        completion.script.lock().push_back(Ok("Salmon likes Pinot.".to_string()));
        let answer = session.ask("What pairs with salmon?").await.unwrap();

        assert_eq!(answer, "Salmon likes Pinot.");
        // one completion call per exchange, none for rewriting
        assert_eq!(completion.call_count(), 3);
        let calls = retrieval.calls.lock();
        assert_eq!(calls.last().unwrap().0, "What pairs with salmon?");
        // history window stays out of the prompt entirely
        let prompts = completion.prompts.lock();
        assert!(prompts.last().unwrap().contains("<chat_history>\n\n</chat_history>"));
    }

    #[tokio::test]
    async fn test_rewrite_runs_with_history_and_feeds_retrieval() {
        let retrieval = FakeRetrieval::with_passages(&["passage"]);
        let completion = FakeCompletion::scripted(&[]);
        let session = session(retrieval.clone(), completion.clone(), true);

        seed_turns(&session, &completion, 1).await;
        assert_eq!(session.turn_count(), 2);

        completion
            .script
            .lock()
            .push_back(Ok("standalone query about salmon pairings".to_string()));
        completion.script.lock().push_back(Ok("Pinot Noir.".to_string()));

        let answer = session.ask("What pairs with salmon?").await.unwrap();

        assert_eq!(answer, "Pinot Noir.");
        // rewrite + final answer
        assert_eq!(completion.call_count(), 3);
        assert_eq!(
            retrieval.calls.lock().last().unwrap().0,
            "standalone query about salmon pairings"
        );
        // final prompt still carries the original question, not the rewrite
        let prompts = completion.prompts.lock();
        assert!(prompts
            .last()
            .unwrap()
            .contains("<question>\nWhat pairs with salmon?\n</question>"));
    }

    #[tokio::test]
    async fn test_rewrite_failure_falls_back_to_raw_question() {
        let retrieval = FakeRetrieval::with_passages(&["passage"]);
        let completion = FakeCompletion::scripted(&[]);
        let session = session(retrieval.clone(), completion.clone(), true);

        seed_turns(&session, &completion, 1).await;

        completion.script.lock().push_back(Err("model unavailable".to_string()));
        completion.script.lock().push_back(Ok("Still answered.".to_string()));

        let answer = session.ask("And under $20?").await.unwrap();

        assert_eq!(answer, "Still answered.");
        assert_eq!(retrieval.calls.lock().last().unwrap().0, "And under $20?");
        assert_eq!(session.turn_count(), 4);
    }

    #[tokio::test]
    async fn test_completion_failure_leaves_history_unchanged() {
        let retrieval = FakeRetrieval::with_passages(&["passage"]);
        let completion = FakeCompletion::scripted(&[]);
        let session = session(retrieval, completion.clone(), true);

        seed_turns(&session, &completion, 1).await;
        let before = session.turn_count();

        completion.script.lock().push_back(Ok("rewritten query".to_string()));
        completion.script.lock().push_back(Err("model unavailable".to_string()));

        let err = session.ask("follow-up?").await.unwrap_err();
        assert!(matches!(err, Error::Completion(_)));
        assert_eq!(session.turn_count(), before);
    }

    #[tokio::test]
    async fn test_retrieval_failure_aborts_before_any_append() {
        let retrieval = FakeRetrieval::failing();
        let completion = FakeCompletion::scripted(&[]);
        let session = session(retrieval, completion, true);

        let err = session.ask("anything").await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));
        assert_eq!(session.turn_count(), 0);
    }

    #[tokio::test]
    async fn test_answer_is_trimmed_and_quote_stripped() {
        let retrieval = FakeRetrieval::with_passages(&[]);
        let completion = FakeCompletion::scripted(&[Ok("  A 'classic' choice. \n")]);
        let session = session(retrieval, completion, true);

        let answer = session.ask("q").await.unwrap();
        assert_eq!(answer, "A classic choice.");
        assert_eq!(session.turns()[1].text, "A classic choice.");
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let retrieval = FakeRetrieval::with_passages(&[]);
        let completion = FakeCompletion::scripted(&[]);
        let session = session(retrieval, completion.clone(), true);

        seed_turns(&session, &completion, 2).await;
        assert_eq!(session.turn_count(), 4);

        session.reset();
        assert_eq!(session.turn_count(), 0);
        session.reset();
        assert_eq!(session.turn_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_at_construction() {
        let mut config = ChatConfig::default();
        config.retrieval.context_k = 0;
        let result = ChatSession::new(
            &config,
            FakeRetrieval::with_passages(&[]),
            FakeCompletion::scripted(&[]),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_empty_context_still_produces_well_formed_prompt() {
        let retrieval = FakeRetrieval::with_passages(&[]);
        let completion = FakeCompletion::scripted(&[Ok("I have nothing on that.")]);
        let session = session(retrieval, completion.clone(), true);

        session.ask("obscure vintage?").await.unwrap();

        let prompts = completion.prompts.lock();
        assert!(prompts[0].contains("<context>\n\n</context>"));
    }
}
