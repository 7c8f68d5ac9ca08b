use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A committee role being contested. The set is fixed for the election;
/// any other position name coming off the wire is an error.
///
/// The declaration order below is the canonical ballot order, so deriving
/// `Ord` gives grouped views a stable, meaningful ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    Chairman,
    ViceChairman,
    SocialDirector1,
    SocialDirector2,
    WelfareDirector1,
    WelfareDirector2,
    Pro1,
    Pro2,
    Secretary1,
    Secretary2,
}

impl Position {
    /// Every contested position, in ballot order.
    pub const ALL: [Position; 10] = [
        Position::Chairman,
        Position::ViceChairman,
        Position::SocialDirector1,
        Position::SocialDirector2,
        Position::WelfareDirector1,
        Position::WelfareDirector2,
        Position::Pro1,
        Position::Pro2,
        Position::Secretary1,
        Position::Secretary2,
    ];

    /// The wire name of this position, exactly as the backend spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Position::Chairman => "Chairman",
            Position::ViceChairman => "Vice-Chairman",
            Position::SocialDirector1 => "Social Director 1",
            Position::SocialDirector2 => "Social Director 2",
            Position::WelfareDirector1 => "Welfare Director 1",
            Position::WelfareDirector2 => "Welfare Director 2",
            Position::Pro1 => "PRO 1",
            Position::Pro2 => "PRO 2",
            Position::Secretary1 => "Secretary 1",
            Position::Secretary2 => "Secretary 2",
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown position: {0}")]
pub struct UnknownPosition(pub String);

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|position| position.name() == s)
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

impl TryFrom<String> for Position {
    type Error = UnknownPosition;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.name().to_string()
    }
}
