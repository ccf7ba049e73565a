//! Visual style and color mode.
//!
//! Both are closed sets. They only select classes and the indicator height
//! policy; no selection logic depends on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual style of a code-tabs widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStyle {
    /// High-contrast header with a thin underline indicator.
    #[default]
    Loud,
    /// Flat header with a pill indicator sized to the selected tab.
    Subtle,
}

/// Two-valued color mode supplied by the host page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

/// Error returned when parsing an unknown style or color mode name.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseStyleError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl BlockStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loud => "loud",
            Self::Subtle => "subtle",
        }
    }

    /// Whether the indicator height follows the measured tab.
    ///
    /// Under `loud` the indicator is an underline whose height is fixed by
    /// its class.
    #[must_use]
    pub fn measures_indicator_height(self) -> bool {
        matches!(self, Self::Subtle)
    }

    pub(crate) fn background_class(self, mode: ColorMode) -> &'static str {
        match (self, mode) {
            (Self::Loud, _) => "code-tabs--contrast",
            (Self::Subtle, ColorMode::Light) => "code-tabs--component",
            (Self::Subtle, ColorMode::Dark) => "code-tabs--code-header",
        }
    }

    pub(crate) fn shadow_class(self) -> &'static str {
        match self {
            Self::Loud => "code-tabs--elevated",
            Self::Subtle => "code-tabs--flat",
        }
    }

    pub(crate) fn indicator_class(self, mode: ColorMode) -> &'static str {
        match (self, mode) {
            (Self::Loud, _) => "code-tabs__indicator--underline",
            (Self::Subtle, ColorMode::Light) => {
                "code-tabs__indicator--pill code-tabs__indicator--light"
            }
            (Self::Subtle, ColorMode::Dark) => {
                "code-tabs__indicator--pill code-tabs__indicator--dark"
            }
        }
    }

    pub(crate) fn header_class(self) -> &'static str {
        match self {
            Self::Loud => "code-tabs__header code-tabs__header--loud",
            Self::Subtle => "code-tabs__header code-tabs__header--subtle",
        }
    }
}

impl ColorMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for BlockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loud" => Ok(Self::Loud),
            "subtle" => Ok(Self::Subtle),
            _ => Err(ParseStyleError {
                kind: "block style",
                value: s.to_owned(),
                expected: "loud, subtle",
            }),
        }
    }
}

impl FromStr for ColorMode {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseStyleError {
                kind: "color mode",
                value: s.to_owned(),
                expected: "light, dark",
            }),
        }
    }
}
