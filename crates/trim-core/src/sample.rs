//! The bundled pack of example decisions.
//!
//! The pack is a TOML file compiled into the binary. Each sample has a fixed,
//! reserved id; the pack's `version` is the force-sync marker used by
//! [`crate::reconcile`].

use crate::error::CoreError;
use crate::id::{DecisionId, OptionId};
use crate::model::{Decision, DecisionOption, Framing, Importance, Mode, ModeOptionSets};
use crate::time;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;

const BUNDLED_SAMPLES_TOML: &str = include_str!("../data/samples.toml");

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PackToml {
    version: String,
    #[serde(default)]
    samples: Vec<SampleToml>,
}

#[derive(Debug, Deserialize)]
struct SampleToml {
    id: String,
    #[serde(default)]
    parent: Option<String>,
    title: String,
    category: String,
    importance: Importance,
    mode: Mode,
    #[serde(default)]
    order: i64,
    #[serde(default)]
    framing: Option<FramingToml>,
    #[serde(default)]
    options: Vec<OptionToml>,
}

#[derive(Debug, Deserialize)]
struct FramingToml {
    what_happened: Option<String>,
    goal: Option<String>,
    constraints: Option<String>,
    dealbreakers: Option<String>,
    key_factors: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OptionToml {
    id: String,
    title: String,
    #[serde(default)]
    memo: Option<String>,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    cons: Vec<String>,
}

// ── Pack model ──────────────────────────────────────────────────────────

/// One example decision as authored in the pack.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTemplate {
    pub id: DecisionId,
    pub parent: Option<DecisionId>,
    pub title: String,
    pub category: String,
    pub importance: Importance,
    pub mode: Mode,
    pub order: i64,
    pub framing: Option<Framing>,
    pub options: Vec<DecisionOption>,
}

impl SampleTemplate {
    /// The decision this template produces for a user whose first dashboard
    /// view was at `first_view`. Same inputs always give the same decision.
    pub fn materialize(&self, first_view: DateTime<Utc>) -> Result<Decision, CoreError> {
        let time_budget = self.importance.minutes();
        Ok(Decision {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            importance: self.importance,
            time_budget,
            deadline: time::deadline_after(first_view, time_budget)?,
            created_at: first_view,
            resolved: false,
            resolved_at: None,
            options: self.options.clone(),
            order: self.order,
            parent_id: self.parent.clone(),
            mode: self.mode,
            framing: self.framing.clone(),
            is_example: Some(true),
            links: vec![],
            comparison_matrix: None,
            stashed_options: ModeOptionSets::default(),
        })
    }
}

/// A versioned set of sample templates.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePack {
    version: String,
    templates: Vec<SampleTemplate>,
    reserved: HashSet<DecisionId>,
}

impl SamplePack {
    /// The pack compiled into this binary.
    pub fn bundled() -> Result<Self, CoreError> {
        Self::parse(BUNDLED_SAMPLES_TOML)
    }

    /// Parse and validate a pack.
    ///
    /// Ids must be unique, and a child template must come after its parent.
    pub fn parse(toml_str: &str) -> Result<Self, CoreError> {
        let parsed: PackToml =
            toml::from_str(toml_str).map_err(|e| CoreError::SamplePack(e.to_string()))?;
        if parsed.version.trim().is_empty() {
            return Err(CoreError::SamplePack("pack version cannot be empty".into()));
        }

        let mut reserved = HashSet::new();
        let mut templates = Vec::with_capacity(parsed.samples.len());
        for s in parsed.samples {
            let id = DecisionId::from(s.id);
            if let Some(parent) = &s.parent {
                if !reserved.contains(&DecisionId::from(parent.as_str())) {
                    return Err(CoreError::SamplePack(format!(
                        "sample {} references parent {} which is not defined before it",
                        id, parent
                    )));
                }
            }
            if !reserved.insert(id.clone()) {
                return Err(CoreError::SamplePack(format!("duplicate sample id {}", id)));
            }
            let mut option_ids = HashSet::new();
            let mut options = Vec::with_capacity(s.options.len());
            for o in s.options {
                if !option_ids.insert(o.id.clone()) {
                    return Err(CoreError::SamplePack(format!(
                        "duplicate option id {} in sample {}",
                        o.id, id
                    )));
                }
                options.push(DecisionOption {
                    id: OptionId::from(o.id.as_str()),
                    title: o.title,
                    is_selected: false,
                    memo: o.memo,
                    pros: o.pros,
                    cons: o.cons,
                    links: vec![],
                });
            }
            templates.push(SampleTemplate {
                id,
                parent: s.parent.map(DecisionId::from),
                title: s.title,
                category: s.category,
                importance: s.importance,
                mode: s.mode,
                order: s.order,
                framing: s.framing.map(|f| Framing {
                    what_happened: f.what_happened,
                    goal: f.goal,
                    constraints: f.constraints,
                    dealbreakers: f.dealbreakers,
                    key_factors: f.key_factors,
                }),
                options,
            });
        }

        Ok(Self {
            version: parsed.version,
            templates,
            reserved,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Templates in pack order; parents always precede their children.
    pub fn templates(&self) -> &[SampleTemplate] {
        &self.templates
    }

    /// True if `id` belongs to a sample of this pack.
    pub fn is_reserved(&self, id: &DecisionId) -> bool {
        self.reserved.contains(id)
    }

    pub fn template(&self, id: &DecisionId) -> Option<&SampleTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn bundled_pack_parses() {
        let pack = SamplePack::bundled().unwrap();
        assert!(!pack.version().is_empty());
        assert!(pack.templates().len() >= 3);
        assert!(pack.is_reserved(&DecisionId::from("sample-lunch")));
        assert!(!pack.is_reserved(&DecisionId::from("my-own")));
    }

    #[test]
    fn bundled_pack_contains_a_chunked_sample() {
        let pack = SamplePack::bundled().unwrap();
        let children: Vec<_> = pack
            .templates()
            .iter()
            .filter(|t| t.parent.as_ref() == Some(&DecisionId::from("sample-move")))
            .collect();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn materialize_is_deterministic() {
        let pack = SamplePack::bundled().unwrap();
        let first_view = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let t = pack.template(&DecisionId::from("sample-gym")).unwrap();
        let a = t.materialize(first_view).unwrap();
        let b = t.materialize(first_view).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.created_at, first_view);
        assert_eq!(a.deadline, first_view + Duration::minutes(1440));
        assert_eq!(a.is_example, Some(true));
        assert_eq!(a.framing.unwrap().goal.as_deref(), Some("Exercise three times a week"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let toml = r#"
version = "1"

[[samples]]
id = "s"
title = "A"
category = "Work"
importance = "LOW"
mode = "choose_best"

[[samples]]
id = "s"
title = "B"
category = "Work"
importance = "LOW"
mode = "choose_best"
"#;
        assert!(matches!(
            SamplePack::parse(toml),
            Err(CoreError::SamplePack(_))
        ));
    }

    #[test]
    fn child_before_parent_rejected() {
        let toml = r#"
version = "1"

[[samples]]
id = "child"
parent = "root"
title = "C"
category = "Work"
importance = "LOW"
mode = "choose_best"

[[samples]]
id = "root"
title = "R"
category = "Work"
importance = "LOW"
mode = "choose_best"
"#;
        assert!(SamplePack::parse(toml).is_err());
    }

    #[test]
    fn malformed_pack_rejected() {
        assert!(SamplePack::parse("version = ").is_err());
        assert!(SamplePack::parse("version = \"\"").is_err());
    }
}
