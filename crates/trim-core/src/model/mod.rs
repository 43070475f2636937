pub mod decision;
pub mod memo;
pub mod option;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use decision::Decision;
pub use memo::{ComparisonMatrix, Framing, Link};
pub use option::{DecisionOption, ModeOptionSets};

/// How much a decision matters, which fixes its default time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Importance {
    Trivial,
    Low,
    Medium,
    High,
    Critical,
}

impl Importance {
    pub const ALL: [Importance; 5] = [
        Importance::Trivial,
        Importance::Low,
        Importance::Medium,
        Importance::High,
        Importance::Critical,
    ];

    /// Default time budget in minutes.
    pub fn minutes(self) -> u32 {
        match self {
            Self::Trivial => 10,
            Self::Low => 60,
            Self::Medium => 1440,
            Self::High => 4320,
            Self::Critical => 10080,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown importance '{}'", s))
    }
}

/// The structural shape of a decision's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// A yes/no decision with a fixed do / don't pair.
    DoOrNot,
    /// Pick the best of several known options.
    ChooseBest,
    /// The options are not clear yet and are being discovered.
    NoClearOptions,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoOrNot => "do_or_not",
            Self::ChooseBest => "choose_best",
            Self::NoClearOptions => "no_clear_options",
        }
    }

    /// `choose_best` and `no_clear_options` share option content; `do_or_not` never does.
    pub fn is_open_ended(self) -> bool {
        !matches!(self, Self::DoOrNot)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "do_or_not" => Ok(Self::DoOrNot),
            "choose_best" => Ok(Self::ChooseBest),
            "no_clear_options" => Ok(Self::NoClearOptions),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}
