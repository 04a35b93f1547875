//! Value kinds shared by the AST and the IR
//!
//! These are plain data enums (no tree structure), so both node families can
//! carry them without the IR depending on parser types or vice versa.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-width position assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorKind {
    Start,
    End,
    WordBoundary,
    NotWordBoundary,
    AbsoluteStart,
    EndBeforeFinalNewline,
    AbsoluteEnd,
}

/// Quantifier matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuantMode {
    #[default]
    Greedy,
    Lazy,
    Possessive,
}

/// Direction of a lookaround.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookDir {
    Ahead,
    Behind,
}

/// Escapes that may appear as character class items.
///
/// Serialised as the escape letter (`"d"`, `"P"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassEscapeKind {
    #[serde(rename = "d")]
    Digit,
    #[serde(rename = "D")]
    NotDigit,
    #[serde(rename = "w")]
    Word,
    #[serde(rename = "W")]
    NotWord,
    #[serde(rename = "s")]
    Space,
    #[serde(rename = "S")]
    NotSpace,
    #[serde(rename = "p")]
    Property,
    #[serde(rename = "P")]
    NotProperty,
}

impl ClassEscapeKind {
    /// Map an escape letter to its kind.
    pub fn from_letter(ch: char) -> Option<Self> {
        match ch {
            'd' => Some(Self::Digit),
            'D' => Some(Self::NotDigit),
            'w' => Some(Self::Word),
            'W' => Some(Self::NotWord),
            's' => Some(Self::Space),
            'S' => Some(Self::NotSpace),
            'p' => Some(Self::Property),
            'P' => Some(Self::NotProperty),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Digit => 'd',
            Self::NotDigit => 'D',
            Self::Word => 'w',
            Self::NotWord => 'W',
            Self::Space => 's',
            Self::NotSpace => 'S',
            Self::Property => 'p',
            Self::NotProperty => 'P',
        }
    }

    /// `true` for `\p` / `\P`, which carry a property name.
    pub fn is_property(self) -> bool {
        matches!(self, Self::Property | Self::NotProperty)
    }

    /// The same escape with its sense flipped (`\d` <-> `\D`, `\p` <-> `\P`).
    pub fn negate(self) -> Self {
        match self {
            Self::Digit => Self::NotDigit,
            Self::NotDigit => Self::Digit,
            Self::Word => Self::NotWord,
            Self::NotWord => Self::Word,
            Self::Space => Self::NotSpace,
            Self::NotSpace => Self::Space,
            Self::Property => Self::NotProperty,
            Self::NotProperty => Self::Property,
        }
    }
}

/// Upper bound of a quantifier.
///
/// Serialises as a JSON integer, or the string `"Inf"` when unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Max {
    Finite(u32),
    Inf,
}

impl fmt::Display for Max {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Max::Finite(n) => write!(f, "{}", n),
            Max::Inf => write!(f, "Inf"),
        }
    }
}

impl Serialize for Max {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Max::Finite(n) => serializer.serialize_u32(*n),
            Max::Inf => serializer.serialize_str("Inf"),
        }
    }
}

impl<'de> Deserialize<'de> for Max {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MaxVisitor;

        impl<'de> Visitor<'de> for MaxVisitor {
            type Value = Max;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer or \"Inf\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Max, E> {
                u32::try_from(v)
                    .map(Max::Finite)
                    .map_err(|_| E::custom(format!("quantifier bound {} out of range", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Max, E> {
                u32::try_from(v)
                    .map(Max::Finite)
                    .map_err(|_| E::custom(format!("quantifier bound {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Max, E> {
                if v == "Inf" {
                    Ok(Max::Inf)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(MaxVisitor)
    }
}
