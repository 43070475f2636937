use crate::id::OptionId;
use crate::model::memo::Link;
use crate::model::Mode;
use serde::{Deserialize, Serialize};

/// One candidate answer to a decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOption {
    pub id: OptionId,
    pub title: String,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pros: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl DecisionOption {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: OptionId::generate(),
            title: title.into(),
            is_selected: false,
            memo: None,
            pros: vec![],
            cons: vec![],
            links: vec![],
        }
    }
}

/// The option set a freshly created decision starts with.
pub fn default_options(mode: Mode) -> Vec<DecisionOption> {
    match mode {
        Mode::DoOrNot => vec![DecisionOption::new("Do it"), DecisionOption::new("Don't do it")],
        Mode::ChooseBest | Mode::NoClearOptions => {
            vec![DecisionOption::new(""), DecisionOption::new("")]
        }
    }
}

/// Option sets of the modes that are not currently active.
///
/// A decision only shows the options of its current mode; the others are kept
/// here so that switching back restores them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModeOptionSets {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub do_or_not: Vec<DecisionOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choose_best: Vec<DecisionOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_clear_options: Vec<DecisionOption>,
}

impl ModeOptionSets {
    pub fn is_empty(&self) -> bool {
        self.do_or_not.is_empty() && self.choose_best.is_empty() && self.no_clear_options.is_empty()
    }

    pub fn get(&self, mode: Mode) -> &[DecisionOption] {
        match mode {
            Mode::DoOrNot => &self.do_or_not,
            Mode::ChooseBest => &self.choose_best,
            Mode::NoClearOptions => &self.no_clear_options,
        }
    }

    fn slot(&mut self, mode: Mode) -> &mut Vec<DecisionOption> {
        match mode {
            Mode::DoOrNot => &mut self.do_or_not,
            Mode::ChooseBest => &mut self.choose_best,
            Mode::NoClearOptions => &mut self.no_clear_options,
        }
    }

    /// Swap `active` (the options of mode `from`) for the stored set of `to`.
    ///
    /// Returns the new active options and the updated stash. Between the two
    /// open-ended modes, titles, pros and cons are mirrored by position before
    /// the swap. Leaving `do_or_not` for an open-ended mode that has no set of
    /// its own mirrors from the other open-ended set instead, so a detour
    /// through `do_or_not` carries the options across. The `do_or_not` set is
    /// never mirrored.
    pub fn switch(
        mut self,
        from: Mode,
        active: Vec<DecisionOption>,
        to: Mode,
    ) -> (Vec<DecisionOption>, ModeOptionSets) {
        if from == to {
            return (active, self);
        }
        let mut target = std::mem::take(self.slot(to));
        let fresh = target.is_empty();
        if fresh {
            target = default_options(to);
        }
        if from.is_open_ended() && to.is_open_ended() {
            mirror_positionally(&active, &mut target);
        } else if fresh && to.is_open_ended() {
            let sibling = match to {
                Mode::ChooseBest => Mode::NoClearOptions,
                _ => Mode::ChooseBest,
            };
            let stashed = self.get(sibling);
            if !stashed.is_empty() {
                mirror_positionally(stashed, &mut target);
            }
        }
        *self.slot(from) = active;
        (target, self)
    }
}

fn mirror_positionally(source: &[DecisionOption], target: &mut Vec<DecisionOption>) {
    target.truncate(source.len());
    for (i, src) in source.iter().enumerate() {
        match target.get_mut(i) {
            Some(t) => {
                t.title = src.title.clone();
                t.pros = src.pros.clone();
                t.cons = src.cons.clone();
            }
            None => {
                let mut opt = DecisionOption::new(src.title.clone());
                opt.pros = src.pros.clone();
                opt.cons = src.cons.clone();
                target.push(opt);
            }
        }
    }
}
