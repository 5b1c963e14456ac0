use anyhow::Result;
use serde::Serialize;

use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::memory::types::{ChatExchange, FutureCapsule, Memory, UserProfile};
use lifecapsule::store::RecordStore;

use super::open_journal;

/// Export format: the profile plus every record it owns.
#[derive(Debug, Serialize)]
struct ExportData {
    profile: UserProfile,
    memories: Vec<Memory>,
    chats: Vec<ChatExchange>,
    capsules: Vec<FutureCapsule>,
}

/// Export the whole journal as JSON to stdout.
pub fn export(config: &LifeCapsuleConfig) -> Result<()> {
    let journal = open_journal(config)?;
    let store = journal.store();

    let data = ExportData {
        profile: journal.profile()?,
        memories: store.list_memories()?,
        chats: store.list_chats()?,
        capsules: store.list_capsules()?,
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!(
        "Exported {} memories, {} chat exchanges and {} capsules.",
        data.memories.len(),
        data.chats.len(),
        data.capsules.len()
    );

    Ok(())
}
