use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("decision not found: {0}")]
    DecisionNotFound(String),

    #[error("option {option} not found on decision {decision}")]
    OptionNotFound { decision: String, option: String },

    #[error("parent decision not found: {0}")]
    ParentNotFound(String),

    #[error("decision {0} has no selected option")]
    NoOptionSelected(String),

    #[error("decision {0} is already resolved")]
    AlreadyResolved(String),

    #[error("decision {0} is not resolved")]
    NotResolved(String),

    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),

    #[error("cannot move {id} under {target}: target is the decision itself or one of its descendants")]
    CycleDetected { id: String, target: String },

    #[error("invalid reorder: {0}")]
    InvalidReorder(String),

    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    #[error("category name cannot be empty")]
    EmptyCategoryName,

    #[error("cannot delete the last remaining category")]
    LastCategory,

    #[error("category '{name}' is used by {count} decision(s)")]
    CategoryInUse { name: String, count: usize },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("sample pack error: {0}")]
    SamplePack(String),
}
