//! Turn-by-turn route following.
//!
//! The route is a fixed list of decisions, one per intersection. The
//! navigator hands them out in order and reports [`Turn::Finish`] once the
//! list is used up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decision taken at an intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Forward,
    Left,
    Right,
    /// End of the route.
    Finish,
}

impl Turn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Left => "left",
            Self::Right => "right",
            Self::Finish => "finish",
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown turn '{0}', expected forward, left, right or finish")]
pub struct ParseTurnError(pub String);

impl FromStr for Turn {
    type Err = ParseTurnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "finish" => Ok(Self::Finish),
            _ => Err(ParseTurnError(s.to_owned())),
        }
    }
}

/// Ordered route plus a cursor that only moves forward.
///
/// # Example
///
/// ```rust
/// use linewise::navigation::{Navigator, Turn};
///
/// let mut navigator = Navigator::new([Turn::Left, Turn::Forward]);
///
/// assert_eq!(navigator.next_turn(), Turn::Left);
/// assert_eq!(navigator.next_turn(), Turn::Forward);
/// assert_eq!(navigator.next_turn(), Turn::Finish);
/// assert_eq!(navigator.next_turn(), Turn::Finish);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Navigator {
    turns: Vec<Turn>,
    cursor: usize,
}

impl Navigator {
    pub fn new(turns: impl IntoIterator<Item = Turn>) -> Self {
        Self {
            turns: turns.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Parse a route from turn tokens such as `"left"`.
    pub fn parse<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Result<Self, ParseTurnError> {
        let turns = tokens
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<Turn>, _>>()?;
        Ok(Self::new(turns))
    }

    /// Hand out the next decision, or [`Turn::Finish`] once exhausted.
    pub fn next_turn(&mut self) -> Turn {
        let Some(&turn) = self.turns.get(self.cursor) else {
            return Turn::Finish;
        };
        self.cursor += 1;
        log::info!(
            "Route step {}/{}: {}",
            self.cursor,
            self.turns.len(),
            turn
        );
        turn
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Decisions not yet handed out.
    pub fn remaining(&self) -> &[Turn] {
        &self.turns[self.cursor.min(self.turns.len())..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.turns.len()
    }
}
