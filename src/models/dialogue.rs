use std::collections::HashMap;

use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::{DialogueId, IntentName, ServiceName, SlotName};

/// One annotated dialogue from a bundle file. IDs are composite:
/// `"<file-index>_<within-file-index>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub dialogue_id: DialogueId,
    pub services: Vec<ServiceName>,
    pub turns: Vec<Turn>,
}

impl Dialogue {
    /// File index component of the dialogue ID, if well formed.
    pub fn file_index(&self) -> Option<u64> {
        self.dialogue_id.splitn(2, '_').next()?.parse().ok()
    }

    /// Within-file index component of the dialogue ID, if well formed.
    pub fn within_file_index(&self) -> Option<usize> {
        self.dialogue_id.splitn(2, '_').nth(1)?.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "SYSTEM")]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub utterance: String,
    pub frames: Vec<Frame>,
}

/// Per-turn annotation bundle attached to one service. User turns carry a
/// dialogue state; system turns following an API call additionally carry
/// the call record and its results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub service: ServiceName,
    #[serde(default)]
    pub slots: Vec<SlotMention>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<DialogueState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_call: Option<ServiceCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_results: Option<Vec<HashMap<String, Value>>>,
}

impl Frame {
    pub fn has_service_results(&self) -> bool {
        self.service_results
            .as_ref()
            .map(|results| !results.is_empty())
            .unwrap_or(false)
    }
}

/// A `(slot, value span)` pair marking a slot verbalized in the utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotMention {
    pub slot: SlotName,
    pub start: usize,
    pub exclusive_end: usize,
}

/// The API call issued by the system, recorded on the following turn.
/// The method name is the intent that was invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub method: IntentName,
    #[serde(default)]
    pub parameters: HashMap<SlotName, String>,
}

/// A parametrized dialogue act, e.g. `INFORM(price_range=cheap)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub act: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub canonical_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    pub active_intent: IntentName,
    #[serde(default)]
    pub requested_slots: Vec<SlotName>,
    #[serde(default)]
    pub slot_values: HashMap<SlotName, Vec<String>>,
}

/// Sentinel for turns where no intent is active.
pub const NO_ACTIVE_INTENT: &str = "NONE";
