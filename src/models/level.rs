//! CEFR proficiency levels covered by the curriculum.

use serde::{Deserialize, Serialize};

/// CEFR level a topic belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A1" => Some(Level::A1),
            "A2" => Some(Level::A2),
            "B1" => Some(Level::B1),
            "B2" => Some(Level::B2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One index tab of the curriculum spreadsheet.
///
/// Each level has its own tab; rows below the header describe that level's
/// topics in classroom order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTab {
    pub level: Level,
    pub sheet_name: &'static str,
    pub gid: &'static str,
}
