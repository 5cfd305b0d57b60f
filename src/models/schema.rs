use serde_derive::{Deserialize, Serialize};

use crate::utils::{IntentName, ServiceName, SlotName};

/// A service (API) definition from a split's `schema.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub service_name: ServiceName,
    #[serde(default)]
    pub description: String,
    pub intents: Vec<IntentSchema>,
    pub slots: Vec<SlotSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSchema {
    pub name: IntentName,
    #[serde(default)]
    pub description: String,
    pub is_transactional: bool,
    #[serde(default)]
    pub required_slots: Vec<SlotName>,
    #[serde(default)]
    pub result_slots: Vec<SlotName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSchema {
    pub name: SlotName,
    #[serde(default)]
    pub description: String,
    pub is_categorical: bool,
    #[serde(default)]
    pub possible_values: Vec<String>,
}

impl SlotSchema {
    /// A categorical slot is binary when its two possible values are
    /// boolean-like: the literal `"True"` appears among them, or every
    /// value is a digit string whose integer value is at most 1.
    pub fn is_binary(&self) -> bool {
        if !self.is_categorical || self.possible_values.len() != 2 {
            return false;
        }
        let has_true = self.possible_values.iter().any(|v| v == "True");
        let all_low_digits = self.possible_values.iter().all(|v| {
            !v.is_empty()
                && v.chars().all(|c| c.is_ascii_digit())
                && v.parse::<i64>().map(|n| n <= 1).unwrap_or(false)
        });
        has_true || all_low_digits
    }
}
