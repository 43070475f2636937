use crate::id::OptionId;
use crate::preview::LinkPreview;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured free-text context attached to a decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Framing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_happened: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealbreakers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_factors: Option<String>,
}

impl Framing {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }

    /// Label/value pairs in display order.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("What happened", self.what_happened.as_deref()),
            ("Goal", self.goal.as_deref()),
            ("Constraints", self.constraints.as_deref()),
            ("Dealbreakers", self.dealbreakers.as_deref()),
            ("Key factors", self.key_factors.as_deref()),
        ]
    }
}

/// A URL attached to a decision or option, with an optional cached preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<LinkPreview>,
}

/// Weighted comparison of options against named criteria.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComparisonMatrix {
    pub criteria: Vec<String>,
    /// One score per criterion, keyed by option.
    #[serde(default)]
    pub scores: BTreeMap<OptionId, Vec<i32>>,
}

impl ComparisonMatrix {
    /// Sum of an option's scores, `None` if the option was never scored.
    pub fn total(&self, option: &OptionId) -> Option<i32> {
        self.scores.get(option).map(|s| s.iter().sum())
    }
}
