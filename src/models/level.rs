use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// CEFR proficiency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

/// Level as listed by `GET /api/levels`.
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
    pub id: Level,
    pub name: &'static str,
    pub description: &'static str,
}

impl Level {
    pub const ALL: [Level; 6] = [Level::A1, Level::A2, Level::B1, Level::B2, Level::C1, Level::C2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Level::A1 => "Beginner",
            Level::A2 => "Elementary",
            Level::B1 => "Intermediate",
            Level::B2 => "Upper Intermediate",
            Level::C1 => "Advanced",
            Level::C2 => "Mastery",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Level::A1 => "Basic vocabulary and phrases",
            Level::A2 => "Simple everyday expressions",
            Level::B1 => "Common topics and situations",
            Level::B2 => "Complex ideas and technical topics",
            Level::C1 => "Advanced vocabulary and expressions",
            Level::C2 => "Native-like proficiency",
        }
    }

    pub fn info(&self) -> LevelInfo {
        LevelInfo {
            id: *self,
            name: self.name(),
            description: self.description(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(Level::A1),
            "A2" => Ok(Level::A2),
            "B1" => Ok(Level::B1),
            "B2" => Ok(Level::B2),
            "C1" => Ok(Level::C1),
            "C2" => Ok(Level::C2),
            _ => Err(format!("Invalid level '{}', expected one of A1, A2, B1, B2, C1, C2", s.trim())),
        }
    }
}
