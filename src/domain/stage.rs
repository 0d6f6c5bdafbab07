use std::fmt;

/// Position of a job inside the three-stage pipeline. `NotStarted` is the
/// stage of every pending job; a processing job advances 1 -> 2 -> 3 and
/// never moves backwards within a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    NotStarted,
    Structuring,
    Enriching,
    Synthesizing,
}

impl Stage {
    pub fn as_u8(&self) -> u8 {
        match self {
            Stage::NotStarted => 0,
            Stage::Structuring => 1,
            Stage::Enriching => 2,
            Stage::Synthesizing => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Stage::NotStarted),
            1 => Some(Stage::Structuring),
            2 => Some(Stage::Enriching),
            3 => Some(Stage::Synthesizing),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
