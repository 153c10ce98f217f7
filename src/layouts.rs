use crate::error::{TfResult, TypoError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Physical keyboard layouts the corpus text can be remapped to before
/// statistics are gathered. The corpus was typed on QWERTY, so remapping
/// moves each observed typo onto the key that sits in the same position.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    EnumIter,
    EnumString,
    Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    Azerty,
    Qwertz,
}

impl KeyboardLayout {
    /// Character pairs `(qwerty, target)`. Anything not listed maps to itself.
    pub fn substitutions(&self) -> &'static [(char, char)] {
        match self {
            Self::Qwerty => &[],
            Self::Azerty => &[
                ('q', 'a'),
                ('w', 'z'),
                ('a', 'q'),
                (';', 'm'),
                ('z', 'w'),
                ('m', ','),
                (',', ';'),
                ('.', ':'),
            ],
            Self::Qwertz => &[('z', 'y'), ('y', 'z')],
        }
    }

    #[inline]
    pub fn map_char(&self, c: char) -> char {
        self.substitutions()
            .iter()
            .find(|(from, _)| *from == c)
            .map(|&(_, to)| to)
            .unwrap_or(c)
    }

    /// Applies the table to every character at once (no chained remapping).
    pub fn apply(&self, text: &str) -> String {
        if *self == Self::Qwerty {
            return text.to_string();
        }
        text.chars().map(|c| self.map_char(c)).collect()
    }

    pub fn parse(name: &str) -> TfResult<Self> {
        Self::from_str(name.trim()).map_err(|_| {
            let known: Vec<String> = Self::iter().map(|v| v.to_string()).collect();
            TypoError::config(format!(
                "Unknown keyboard layout '{}' (expected one of: {})",
                name,
                known.join(", ")
            ))
        })
    }
}
