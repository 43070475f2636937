use crate::error::StoreError;
use trim_core::model::Decision;
use trim_core::reconcile::SampleLedger;

/// Durable storage for one user's decisions.
///
/// Loads never fail. Missing data loads as empty (or the default category
/// list); corrupt data does too, after a warning. The three records are
/// independent: there is no transaction across them.
pub trait Persistence {
    fn load_decisions(&self) -> Vec<Decision>;
    fn save_decisions(&mut self, decisions: &[Decision]) -> Result<(), StoreError>;

    fn load_categories(&self) -> Vec<String>;
    fn save_categories(&mut self, categories: &[String]) -> Result<(), StoreError>;

    fn load_sample_ledger(&self) -> SampleLedger;
    fn save_sample_ledger(&mut self, ledger: &SampleLedger) -> Result<(), StoreError>;
}
