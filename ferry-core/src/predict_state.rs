//! Predictive state configuration.
//!
//! A mapping tells the frontend that while `tool` is being called, the value
//! of its `tool_argument` should be shown under `state_key`, before the call
//! has completed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Exposes one tool argument under one UI state key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictStateMapping {
    /// State key the frontend writes to.
    pub state_key: String,
    /// Tool whose call triggers the mapping.
    pub tool: String,
    /// Argument of that tool holding the value.
    pub tool_argument: String,
}

impl PredictStateMapping {
    /// Create a mapping.
    pub fn new(
        state_key: impl Into<String>,
        tool: impl Into<String>,
        tool_argument: impl Into<String>,
    ) -> Self {
        Self {
            state_key: state_key.into(),
            tool: tool.into(),
            tool_argument: tool_argument.into(),
        }
    }
}

/// One or many predictive state mappings.
///
/// Deserializes from either a single mapping object or an array of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictStateConfig {
    /// A single mapping.
    One(PredictStateMapping),
    /// Any number of mappings.
    Many(Vec<PredictStateMapping>),
}

impl PredictStateConfig {
    /// Normalize to a list, preserving declaration order.
    pub fn into_mappings(self) -> Vec<PredictStateMapping> {
        match self {
            Self::One(mapping) => vec![mapping],
            Self::Many(mappings) => mappings,
        }
    }

    /// Group mappings by the tool they belong to.
    pub fn by_tool(self) -> HashMap<String, Vec<PredictStateMapping>> {
        let mut index: HashMap<String, Vec<PredictStateMapping>> = HashMap::new();
        for mapping in self.into_mappings() {
            index.entry(mapping.tool.clone()).or_default().push(mapping);
        }
        index
    }
}

impl From<PredictStateMapping> for PredictStateConfig {
    fn from(mapping: PredictStateMapping) -> Self {
        Self::One(mapping)
    }
}

impl From<Vec<PredictStateMapping>> for PredictStateConfig {
    fn from(mappings: Vec<PredictStateMapping>) -> Self {
        Self::Many(mappings)
    }
}

#[cfg(test)]
#[path = "predict_state_tests.rs"]
mod tests;
