use crate::error::StoreError;
use crate::port::Persistence;
use trim_core::model::Decision;
use trim_core::reconcile::SampleLedger;

/// In-process storage. Holds whatever was last saved.
///
/// Setting `fail_saves` makes every save return [`StoreError::Unavailable`]
/// without touching the held data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub decisions: Vec<Decision>,
    pub categories: Vec<String>,
    pub ledger: SampleLedger,
    pub fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decisions(decisions: Vec<Decision>) -> Self {
        Self {
            decisions,
            ..Self::default()
        }
    }

    /// Successful saves so far, across all three records.
    pub fn saves(&self) -> usize {
        self.saves
    }

    fn check(&mut self, what: &str) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Unavailable(format!("cannot save {}", what)));
        }
        self.saves += 1;
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load_decisions(&self) -> Vec<Decision> {
        self.decisions.clone()
    }

    fn save_decisions(&mut self, decisions: &[Decision]) -> Result<(), StoreError> {
        self.check("decisions")?;
        self.decisions = decisions.to_vec();
        Ok(())
    }

    fn load_categories(&self) -> Vec<String> {
        self.categories.clone()
    }

    fn save_categories(&mut self, categories: &[String]) -> Result<(), StoreError> {
        self.check("categories")?;
        self.categories = categories.to_vec();
        Ok(())
    }

    fn load_sample_ledger(&self) -> SampleLedger {
        self.ledger.clone()
    }

    fn save_sample_ledger(&mut self, ledger: &SampleLedger) -> Result<(), StoreError> {
        self.check("sample ledger")?;
        self.ledger = ledger.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_saves_keep_previous_data() {
        let mut store = MemoryStore::new();
        store.save_categories(&["Work".into()]).unwrap();
        store.fail_saves = true;
        assert!(matches!(
            store.save_categories(&["Other".into()]),
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.load_categories(), vec!["Work".to_string()]);
        assert_eq!(store.saves(), 1);
    }
}
