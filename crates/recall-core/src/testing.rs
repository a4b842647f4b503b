//! In-memory fakes for the ports, shared by the unit tests in this crate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use recall_types::chat::{
    ChatKind, ChatOverview, ChatRecord, HistoryEntry, HistoryWindow, NewMessage, SenderInfo,
    StoredMessage,
};
use recall_types::error::{PublishError, RepositoryError, TransportError};
use recall_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, ProviderCapabilities, StopReason,
    Usage,
};
use recall_types::transport::{ParseMode, ReplyTarget, SentMessage};

use crate::history::repository::HistoryRepository;
use crate::llm::provider::LlmProvider;
use crate::markup::MAX_MESSAGE_CHARS;
use crate::publish::DocumentPublisher;
use crate::transport::ChatTransport;

pub fn group_chat(id: i64) -> ChatRecord {
    ChatRecord {
        id,
        title: Some("Test group".to_string()),
        kind: ChatKind::Supergroup,
    }
}

pub fn sender(user_id: i64, first_name: &str, last_name: Option<&str>) -> SenderInfo {
    SenderInfo {
        user_id,
        username: None,
        first_name: first_name.to_string(),
        last_name: last_name.map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Default)]
struct HistoryState {
    chats: Vec<ChatRecord>,
    messages: Vec<StoredMessage>,
}

#[derive(Default)]
pub struct InMemoryHistory {
    state: Mutex<HistoryState>,
    fail_appends: AtomicBool,
    fail_fetches: AtomicBool,
}

impl InMemoryHistory {
    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    pub fn fail_fetches(&self) {
        self.fail_fetches.store(true, Ordering::SeqCst);
    }

    fn upsert_locked(state: &mut HistoryState, chat: &ChatRecord) -> ChatRecord {
        match state.chats.iter_mut().find(|c| c.id == chat.id) {
            Some(existing) => {
                existing.title = chat.title.clone();
                existing.clone()
            }
            None => {
                state.chats.push(chat.clone());
                chat.clone()
            }
        }
    }
}

impl HistoryRepository for InMemoryHistory {
    async fn upsert_chat(&self, chat: &ChatRecord) -> Result<ChatRecord, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        Ok(Self::upsert_locked(&mut state, chat))
    }

    async fn get_chat(&self, chat_id: i64) -> Result<Option<ChatRecord>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.chats.iter().find(|c| c.id == chat_id).cloned())
    }

    async fn append_message(&self, message: &NewMessage) -> Result<StoredMessage, RepositoryError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("append disabled".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        Self::upsert_locked(&mut state, &message.chat);
        let stored = StoredMessage {
            id: state.messages.len() as i64 + 1,
            chat_id: message.chat.id,
            sender: message.sender.clone(),
            text: message.text.clone(),
            sent_at: message.sent_at,
        };
        state.messages.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_recent(&self, chat_id: i64, limit: u32) -> Result<HistoryWindow, RepositoryError> {
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("fetch disabled".to_string()));
        }
        let state = self.state.lock().unwrap();
        let mut rows: Vec<&StoredMessage> =
            state.messages.iter().filter(|m| m.chat_id == chat_id).collect();
        rows.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        let newest_first = rows
            .into_iter()
            .take(limit as usize)
            .map(HistoryEntry::from)
            .collect();
        Ok(HistoryWindow::from_newest_first(newest_first))
    }

    async fn count_messages(&self, chat_id: i64) -> Result<u64, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.messages.iter().filter(|m| m.chat_id == chat_id).count() as u64)
    }

    async fn list_chats(&self) -> Result<Vec<ChatOverview>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .chats
            .iter()
            .map(|chat| {
                let messages = state.messages.iter().filter(|m| m.chat_id == chat.id);
                ChatOverview {
                    chat: chat.clone(),
                    message_count: messages.clone().count() as u64,
                    last_message_at: messages.map(|m| m.sent_at).max(),
                }
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedReply {
    pub text: String,
    pub mode: ParseMode,
}

#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<Vec<RecordedReply>>,
    deleted: Mutex<Vec<i32>>,
    reject_rich: AtomicBool,
    reject_all: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakeTransport {
    pub fn reject_rich(&self) {
        self.reject_rich.store(true, Ordering::SeqCst);
    }

    pub fn reject_all(&self) {
        self.reject_all.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn replies(&self) -> Vec<RecordedReply> {
        self.replies.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<i32> {
        self.deleted.lock().unwrap().clone()
    }
}

impl ChatTransport for FakeTransport {
    async fn reply(
        &self,
        target: &ReplyTarget,
        text: &str,
        mode: ParseMode,
    ) -> Result<SentMessage, TransportError> {
        let message_id = {
            let mut replies = self.replies.lock().unwrap();
            replies.push(RecordedReply {
                text: text.to_string(),
                mode,
            });
            1000 + replies.len() as i32
        };

        if self.reject_all.load(Ordering::SeqCst) {
            return Err(TransportError::Network("connection reset".to_string()));
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(TransportError::TooLong);
        }
        if mode.is_rich() && self.reject_rich.load(Ordering::SeqCst) {
            return Err(TransportError::Markup(
                "can't parse entities: character '.' is reserved".to_string(),
            ));
        }

        Ok(SentMessage {
            chat: target.chat.clone(),
            message_id,
            sender: sender(42, "Recall", None),
            text: text.to_string(),
            sent_at: Utc::now(),
        })
    }

    async fn delete(&self, message: &SentMessage) -> Result<(), TransportError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(TransportError::NotFound);
        }
        self.deleted.lock().unwrap().push(message.message_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

pub struct FakePublisher {
    url: Option<String>,
    calls: AtomicUsize,
}

impl FakePublisher {
    pub fn publishing(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentPublisher for FakePublisher {
    async fn create_account(&self, _short_name: &str, _author_name: &str) -> Result<String, PublishError> {
        Ok("token".to_string())
    }

    async fn publish(&self, _title: &str, _html: &str) -> Result<String, PublishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.url
            .clone()
            .ok_or_else(|| PublishError::Service("PAGE_SAVE_FAILED".to_string()))
    }
}

// ---------------------------------------------------------------------------
// LLM
// ---------------------------------------------------------------------------

enum Script {
    Answer(String),
    Fail,
    Hang,
}

pub struct ScriptedProvider {
    script: Script,
    capabilities: ProviderCapabilities,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            capabilities: ProviderCapabilities {
                reasoning_trace: true,
                max_output_tokens: 8_192,
            },
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::with_script(Script::Answer(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    pub fn hanging() -> Self {
        Self::with_script(Script::Hang)
    }

    pub fn without_reasoning_trace(mut self) -> Self {
        self.capabilities.reasoning_trace = false;
        self
    }

    pub fn with_output_limit(mut self, max_output_tokens: u32) -> Self {
        self.capabilities.max_output_tokens = max_output_tokens;
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// User prompts seen so far, in call order.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(user) = request.messages.iter().find(|m| m.role == MessageRole::User) {
            self.prompts.lock().unwrap().push(user.content.clone());
        }

        match &self.script {
            Script::Answer(text) => Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: text.clone(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            }),
            Script::Fail => Err(LlmError::Provider {
                message: "upstream exploded".to_string(),
            }),
            Script::Hang => {
                std::future::pending::<()>().await;
                Err(LlmError::Timeout(0))
            }
        }
    }
}
