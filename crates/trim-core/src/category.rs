use crate::error::CoreError;
use crate::id::DecisionId;
use crate::model::Decision;
use crate::ops;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORIES: [&str; 4] = ["Personal", "Work", "Health", "Money"];

/// The user's ordered list of category names.
///
/// Never empty, names are unique (case-sensitive). Every mutation validates
/// fully before changing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryList(Vec<String>);

impl Default for CategoryList {
    fn default() -> Self {
        Self(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect())
    }
}

impl CategoryList {
    /// Build from stored names, dropping blanks and duplicates.
    /// Falls back to the defaults if nothing usable remains.
    pub fn from_stored(names: Vec<String>) -> Self {
        let mut out: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim().to_string();
            if !name.is_empty() && !out.contains(&name) {
                out.push(name);
            }
        }
        if out.is_empty() {
            Self::default()
        } else {
            Self(out)
        }
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    fn validate_new(&self, name: &str) -> Result<String, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyCategoryName);
        }
        if self.contains(name) {
            return Err(CoreError::DuplicateCategory(name.to_string()));
        }
        Ok(name.to_string())
    }

    pub fn add(&mut self, name: &str) -> Result<(), CoreError> {
        let name = self.validate_new(name)?;
        self.0.push(name);
        Ok(())
    }

    /// Append `name` if it is not already listed. Used for categories that
    /// arrive with stored or sample decisions. Returns true if it was added.
    pub fn adopt(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    /// Rename a category and re-point every decision that used it.
    /// Returns how many decisions were updated.
    pub fn rename(
        &mut self,
        old: &str,
        new: &str,
        decisions: &mut [Decision],
    ) -> Result<usize, CoreError> {
        let pos = self
            .0
            .iter()
            .position(|c| c == old)
            .ok_or_else(|| CoreError::UnknownCategory(old.to_string()))?;
        let new = self.validate_new(new)?;
        let affected: Vec<DecisionId> = decisions
            .iter()
            .filter(|d| d.category == old)
            .map(|d| d.id.clone())
            .collect();
        for id in &affected {
            ops::edit(decisions, id, |d| {
                d.category = new.clone();
                Ok(())
            })?;
        }
        self.0[pos] = new;
        Ok(affected.len())
    }

    /// Delete a category that is neither the last one nor in use.
    pub fn remove(&mut self, name: &str, decisions: &[Decision]) -> Result<(), CoreError> {
        let pos = self
            .0
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CoreError::UnknownCategory(name.to_string()))?;
        if self.0.len() == 1 {
            return Err(CoreError::LastCategory);
        }
        let count = decisions.iter().filter(|d| d.category == name).count();
        if count > 0 {
            return Err(CoreError::CategoryInUse {
                name: name.to_string(),
                count,
            });
        }
        self.0.remove(pos);
        Ok(())
    }
}
