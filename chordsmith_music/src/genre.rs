// Genres a piece can be composed in.
//
// Jazz, Pop and Country each have a progression strategy (progression.rs)
// and harmony policy (chord.rs). Generic is the genre of mixed pieces: it
// carries voiced tracks produced elsewhere and has no strategy of its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Jazz,
    Pop,
    Country,
    Generic,
}

impl Genre {
    pub const ALL: [Genre; 4] = [Genre::Jazz, Genre::Pop, Genre::Country, Genre::Generic];

    /// Case-insensitive name, or the single-letter menu shortcut (`J`, `P`,
    /// `C`, `G`).
    pub fn parse(text: &str) -> Result<Genre, InputError> {
        match text.trim().to_ascii_lowercase().as_str() {
            "jazz" | "j" => Ok(Genre::Jazz),
            "pop" | "p" => Ok(Genre::Pop),
            "country" | "c" => Ok(Genre::Country),
            "generic" | "g" => Ok(Genre::Generic),
            _ => Err(InputError::InvalidGenre(text.trim().to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Jazz => "jazz",
            Genre::Pop => "pop",
            Genre::Country => "country",
            Genre::Generic => "generic",
        }
    }

    /// Pop and Country are written in major only.
    pub fn major_only(self) -> bool {
        matches!(self, Genre::Pop | Genre::Country)
    }
}

impl FromStr for Genre {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::parse(s)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
