//! What happens to a decision being edited when the user navigates away.

/// Action to take when leaving the editor for a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftExit {
    /// The draft has a title: write it, then navigate.
    SaveThenLeave,
    /// Empty and never changed: remove it, then navigate.
    DeleteThenLeave,
    /// Empty but changed: ask the user before discarding.
    Confirm,
}

pub fn exit_action(title: &str, changed: bool) -> DraftExit {
    if !title.trim().is_empty() {
        DraftExit::SaveThenLeave
    } else if changed {
        DraftExit::Confirm
    } else {
        DraftExit::DeleteThenLeave
    }
}
