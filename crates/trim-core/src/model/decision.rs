use crate::error::CoreError;
use crate::id::{DecisionId, OptionId};
use crate::model::memo::{ComparisonMatrix, Framing, Link};
use crate::model::option::{default_options, DecisionOption, ModeOptionSets};
use crate::model::{Importance, Mode};
use crate::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One node of the decision forest.
///
/// `parent_id` is the only relationship that defines the tree: `None` means
/// the decision is a root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: DecisionId,
    pub title: String,
    pub category: String,
    pub importance: Importance,
    /// Minutes; derived from `importance` unless overridden.
    pub time_budget: u32,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub options: Vec<DecisionOption>,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DecisionId>,
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framing: Option<Framing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_example: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_matrix: Option<ComparisonMatrix>,
    #[serde(default, skip_serializing_if = "ModeOptionSets::is_empty")]
    pub stashed_options: ModeOptionSets,
}

impl Decision {
    /// A fresh, unresolved root decision with the default options of `mode`.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        importance: Importance,
        mode: Mode,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let time_budget = importance.minutes();
        Ok(Self {
            id: DecisionId::generate(),
            title: title.into(),
            category: category.into(),
            importance,
            time_budget,
            deadline: time::deadline_after(created_at, time_budget)?,
            created_at,
            resolved: false,
            resolved_at: None,
            options: default_options(mode),
            order: 0,
            parent_id: None,
            mode,
            framing: None,
            is_example: None,
            links: vec![],
            comparison_matrix: None,
            stashed_options: ModeOptionSets::default(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// True while the node is an untouched built-in sample.
    pub fn is_pristine_example(&self) -> bool {
        self.is_example == Some(true)
    }

    pub fn selected_option(&self) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.is_selected)
    }

    pub fn option(&self, id: &OptionId) -> Option<&DecisionOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    pub fn option_mut(&mut self, id: &OptionId) -> Option<&mut DecisionOption> {
        self.options.iter_mut().find(|o| &o.id == id)
    }

    /// Resolve an option by full id, id prefix, or 1-based position.
    pub fn find_option(&self, key: &str) -> Option<&DecisionOption> {
        if let Some(o) = self.options.iter().find(|o| o.id.as_str() == key) {
            return Some(o);
        }
        if let Ok(pos) = key.parse::<usize>() {
            if pos >= 1 {
                return self.options.get(pos - 1);
            }
        }
        let mut matches = self.options.iter().filter(|o| o.id.as_str().starts_with(key));
        match (matches.next(), matches.next()) {
            (Some(o), None) if !key.is_empty() => Some(o),
            _ => None,
        }
    }
}
