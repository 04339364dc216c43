use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalystError;

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
}

impl Frequency {
    pub fn all() -> &'static [Frequency] {
        &[Frequency::Daily, Frequency::Weekly]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(CatalystError::InvalidFrequency(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// BlockKind
// ---------------------------------------------------------------------------

/// The three kinds of protected time block in a 12-week week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Strategic,
    Buffer,
    Breakout,
}

impl BlockKind {
    pub fn all() -> &'static [BlockKind] {
        &[BlockKind::Strategic, BlockKind::Buffer, BlockKind::Breakout]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Strategic => "strategic",
            BlockKind::Buffer => "buffer",
            BlockKind::Breakout => "breakout",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BlockKind::Strategic => "Strategic Block",
            BlockKind::Buffer => "Buffer Block",
            BlockKind::Breakout => "Breakout Block",
        }
    }

    pub fn default_minutes(self) -> u32 {
        match self {
            BlockKind::Strategic => 180,
            BlockKind::Buffer => 60,
            BlockKind::Breakout => 180,
        }
    }

    pub fn purpose(self) -> &'static str {
        match self {
            BlockKind::Strategic => "Deep work on 12-week year tactics. No interruptions.",
            BlockKind::Buffer => "Emails, calls and administrative catch-up.",
            BlockKind::Breakout => "Renew your energy. No work allowed.",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockKind {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strategic" => Ok(BlockKind::Strategic),
            "buffer" => Ok(BlockKind::Buffer),
            "breakout" => Ok(BlockKind::Breakout),
            _ => Err(CatalystError::InvalidBlockKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_parse_is_case_insensitive() {
        assert_eq!("Daily".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!(" weekly ".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!("monthly".parse::<Frequency>().is_err());
    }

    #[test]
    fn frequency_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Frequency::Daily).unwrap(), "\"daily\"");
        for &f in Frequency::all() {
            assert_eq!(f.to_string(), f.as_str());
        }
    }

    #[test]
    fn block_kind_defaults() {
        assert_eq!(BlockKind::default(), BlockKind::Strategic);
        assert_eq!(BlockKind::Strategic.default_minutes(), 180);
        assert_eq!(BlockKind::Buffer.default_minutes(), 60);
        assert_eq!("breakout".parse::<BlockKind>().unwrap(), BlockKind::Breakout);
        assert!("nap".parse::<BlockKind>().is_err());
    }
}
