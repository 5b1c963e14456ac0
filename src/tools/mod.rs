pub mod capture_memory;
pub mod chat_history;
pub mod create_capsule;
pub mod delete_capsule;
pub mod grant_xp;
pub mod recall_memories;
pub mod send_chat;
pub mod unlock_capsule;

use capture_memory::CaptureMemoryParams;
use chat_history::ChatHistoryParams;
use chrono::{NaiveDate, Utc};
use create_capsule::CreateCapsuleParams;
use delete_capsule::DeleteCapsuleParams;
use grant_xp::GrantXpParams;
use recall_memories::RecallMemoriesParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use send_chat::SendChatParams;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use unlock_capsule::UnlockCapsuleParams;

use lifecapsule::companion::prompts::welcome_message;
use lifecapsule::companion::ResponseSelector;
use lifecapsule::error::Error;
use lifecapsule::gamification::{level_title, xp_progress};
use lifecapsule::journal::Journal;
use lifecapsule::memory::search::MemoryFilter;
use lifecapsule::memory::types::{CapsuleView, Mood, NewMemory};
use lifecapsule::store::RecordStore;

/// Default number of memories returned by `recall_memories`.
const DEFAULT_RECALL_LIMIT: usize = 20;

pub type DynJournal = Journal<Box<dyn RecordStore>>;
pub type SharedJournal = Arc<Mutex<DynJournal>>;
pub type SharedSelector = Arc<Mutex<ResponseSelector>>;

/// The LifeCapsule MCP tool handler. Holds the shared journal and reply
/// selector and exposes all MCP tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct JournalTools {
    tool_router: ToolRouter<Self>,
    journal: SharedJournal,
    selector: SharedSelector,
}

/// Calendar day used for streaks, chat limits and capsule dates.
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn tool_error(err: Error) -> String {
    if err.is_rejection() {
        format!("rejected: {err}")
    } else {
        err.to_string()
    }
}

/// Read paths degrade to an empty result when the store is down.
fn recover_read<T: Default>(operation: &str, result: Result<T, Error>) -> Result<T, String> {
    match result {
        Err(Error::Unavailable(reason)) => {
            tracing::error!(operation, %reason, "store unavailable, returning empty result");
            Ok(T::default())
        }
        other => other.map_err(tool_error),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}

#[tool_router]
impl JournalTools {
    pub fn new(journal: SharedJournal, selector: SharedSelector) -> Self {
        Self {
            tool_router: Self::tool_router(),
            journal,
            selector,
        }
    }

    /// Run a journal operation on the blocking pool.
    async fn with_journal<T, F>(&self, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut DynJournal) -> Result<T, Error> + Send + 'static,
    {
        let journal = Arc::clone(&self.journal);
        tokio::task::spawn_blocking(move || {
            let mut journal = journal
                .lock()
                .map_err(|e| Error::Unavailable(format!("journal lock poisoned: {e}")))?;
            op(&mut journal)
        })
        .await
        .map_err(|e| Error::Unavailable(format!("journal task failed: {e}")))?
    }

    #[tool(description = "Capture a memory. Earns 20 XP and advances the streak. Mood is one of happy, sad, excited, calm, grateful, proud.")]
    async fn capture_memory(
        &self,
        Parameters(params): Parameters<CaptureMemoryParams>,
    ) -> Result<String, String> {
        let mood = params
            .mood
            .as_deref()
            .map(str::parse::<Mood>)
            .transpose()?;

        tracing::info!(text_len = params.text.len(), mood = ?mood, "capture_memory called");

        let new = NewMemory {
            text: params.text,
            mood,
            tags: params.tags.unwrap_or_default().into_iter().collect(),
            timestamp: Utc::now(),
        };
        let today = today();
        let outcome = self
            .with_journal(move |journal| journal.capture_memory(new, today))
            .await
            .map_err(tool_error)?;

        to_json(&outcome)
    }

    #[tool(description = "List memories, newest first, optionally filtered by text, tags and mood.")]
    async fn recall_memories(
        &self,
        Parameters(params): Parameters<RecallMemoriesParams>,
    ) -> Result<String, String> {
        let filter = MemoryFilter {
            query: params.query,
            tags: params.tags.unwrap_or_default(),
            mood: params
                .mood
                .as_deref()
                .map(str::parse::<Mood>)
                .transpose()?,
        };
        let limit = params.limit.unwrap_or(DEFAULT_RECALL_LIMIT);

        let result = self
            .with_journal(move |journal| journal.memories(&filter))
            .await;
        let mut memories = recover_read("recall_memories", result)?;
        let total_matched = memories.len();
        memories.truncate(limit);

        tracing::info!(total_matched, returned = memories.len(), "recall_memories done");
        Ok(serde_json::json!({
            "memories": memories,
            "total_matched": total_matched,
        })
        .to_string())
    }

    #[tool(description = "Send a chat message to the companion and get its reply. Earns 5 XP. Free profiles are limited to 10 chats a day.")]
    async fn send_chat(
        &self,
        Parameters(params): Parameters<SendChatParams>,
    ) -> Result<String, String> {
        if params.message.trim().is_empty() {
            return Err("message must not be empty".into());
        }
        let today = today();

        // Reject before the typing delay when the allowance is used up.
        let profile_name = self
            .with_journal(move |journal| {
                journal.check_chat_allowance(today)?;
                Ok(journal.profile()?.name)
            })
            .await
            .map_err(tool_error)?;
        let name = params
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(profile_name);

        let (reply, delay) = {
            let mut selector = self
                .selector
                .lock()
                .map_err(|e| format!("selector lock poisoned: {e}"))?;
            selector.prepare(&params.message, Some(&name))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let message = params.message.trim().to_string();
        let response = reply.text.clone();
        let (outcome, chats_remaining) = self
            .with_journal(move |journal| {
                let outcome = journal.record_chat(&message, &response, Utc::now())?;
                let remaining = journal.chats_remaining(today)?;
                Ok((outcome, remaining))
            })
            .await
            .map_err(tool_error)?;

        tracing::info!(kind = ?reply.kind, "send_chat replied");
        Ok(serde_json::json!({
            "reply": reply.text,
            "kind": reply.kind,
            "exchange_id": outcome.record.id,
            "new_badges": outcome.new_badges,
            "xp_points": outcome.profile.xp_points,
            "level": outcome.profile.current_level(),
            "chats_remaining": chats_remaining,
        })
        .to_string())
    }

    #[tool(description = "Get the chat conversation as alternating user and companion messages, oldest first.")]
    async fn chat_history(
        &self,
        Parameters(params): Parameters<ChatHistoryParams>,
    ) -> Result<String, String> {
        let result = self
            .with_journal(|journal| Ok((journal.chat_history()?, journal.profile()?.name)))
            .await;
        let (mut messages, name) = recover_read("chat_history", result)?;

        if let Some(limit) = params.limit {
            let skip = messages.len().saturating_sub(limit);
            messages.drain(..skip);
        }

        let welcome = messages.is_empty().then(|| welcome_message(&name));
        Ok(serde_json::json!({
            "messages": messages,
            "welcome": welcome,
        })
        .to_string())
    }

    #[tool(description = "Grant XP to the profile. Reaching a new level for the first time earns the 'Level Up' badge.")]
    async fn grant_xp(
        &self,
        Parameters(params): Parameters<GrantXpParams>,
    ) -> Result<String, String> {
        let amount = params.amount;
        let outcome = self
            .with_journal(move |journal| journal.grant_xp(amount))
            .await
            .map_err(tool_error)?;
        to_json(&outcome)
    }

    #[tool(description = "Write a message to the user's future self. It stays locked until the unlock date. Earns 15 XP.")]
    async fn create_capsule(
        &self,
        Parameters(params): Parameters<CreateCapsuleParams>,
    ) -> Result<String, String> {
        let unlock_date = NaiveDate::parse_from_str(params.unlock_date.trim(), "%Y-%m-%d")
            .map_err(|e| format!("invalid unlock_date '{}': {e}", params.unlock_date))?;
        let message = params.message;
        let today = today();

        let outcome = self
            .with_journal(move |journal| journal.create_capsule(&message, unlock_date, today))
            .await
            .map_err(tool_error)?;

        Ok(serde_json::json!({
            "capsule": outcome.record.view(today),
            "new_badges": outcome.new_badges,
            "xp_points": outcome.profile.xp_points,
        })
        .to_string())
    }

    #[tool(description = "List future capsules by unlock date. Messages of locked capsules stay hidden.")]
    async fn list_capsules(&self) -> Result<String, String> {
        let today = today();
        let result = self
            .with_journal(|journal| journal.list_capsules())
            .await;
        let capsules: Vec<CapsuleView> = recover_read("list_capsules", result)?
            .iter()
            .map(|c| c.view(today))
            .collect();
        Ok(serde_json::json!({ "capsules": capsules }).to_string())
    }

    #[tool(description = "Open a capsule whose unlock date has arrived and return its message.")]
    async fn unlock_capsule(
        &self,
        Parameters(params): Parameters<UnlockCapsuleParams>,
    ) -> Result<String, String> {
        let today = today();
        let id = params.id;
        let capsule = self
            .with_journal(move |journal| journal.unlock_capsule(&id, today))
            .await
            .map_err(tool_error)?;
        to_json(&capsule.view(today))
    }

    #[tool(description = "Delete a future capsule by ID.")]
    async fn delete_capsule(
        &self,
        Parameters(params): Parameters<DeleteCapsuleParams>,
    ) -> Result<String, String> {
        let id = params.id;
        let deleted_id = id.clone();
        self.with_journal(move |journal| journal.delete_capsule(&id))
            .await
            .map_err(tool_error)?;
        Ok(serde_json::json!({ "deleted": deleted_id }).to_string())
    }

    #[tool(description = "Get the user's profile: level, XP, streak, badges, subscription and chats left today.")]
    async fn get_profile(&self) -> Result<String, String> {
        let today = today();
        let (profile, chats_remaining) = self
            .with_journal(move |journal| Ok((journal.profile()?, journal.chats_remaining(today)?)))
            .await
            .map_err(tool_error)?;

        let level = profile.current_level();
        Ok(serde_json::json!({
            "profile": profile,
            "level": level,
            "level_title": level_title(level),
            "xp_progress": xp_progress(profile.xp_points),
            "chats_remaining": chats_remaining,
        })
        .to_string())
    }

    #[tool(description = "Get journal statistics: memory and chat counts, mood breakdown, capsules, level and badges.")]
    async fn journal_stats(&self) -> Result<String, String> {
        let today = today();
        let stats = self
            .with_journal(move |journal| journal.stats(today))
            .await
            .map_err(tool_error)?;
        to_json(&stats)
    }
}

#[tool_handler]
impl ServerHandler for JournalTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "LifeCapsule is a gamified journal. Use capture_memory to record what happened, \
                 send_chat to talk with the companion, create_capsule to write to the future, \
                 and get_profile or journal_stats to see progress."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
