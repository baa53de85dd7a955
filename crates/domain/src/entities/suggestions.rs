//! Assistant exchange types - ephemeral, never persisted on their own

use serde::{Deserialize, Serialize};

use crate::value_objects::ListContext;

/// Ordered candidate names returned for one assistant request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionBatch {
    /// Dish or topic the batch was requested for
    pub subject: Option<String>,
    pub names: Vec<String>,
}

impl SuggestionBatch {
    pub fn new(subject: Option<String>, names: Vec<String>) -> Self {
        Self { subject, names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Result of a whole-list analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Items that seem to be missing
    pub suggestions: Vec<String>,
    /// Short advisory strings
    pub tips: Vec<String>,
}

/// Request for item suggestions about one subject (usually a dish)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub subject: String,
    pub context: ListContext,
    pub list_name: String,
    /// Names shown recently for this list, to be avoided by the assistant
    pub recently_suggested: Vec<String>,
}

/// Request for a whole-list analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub list_name: String,
    pub context: ListContext,
    pub pending: Vec<String>,
    pub done: Vec<String>,
    pub recently_suggested: Vec<String>,
}
