//! `Y`/`N` indicator columns.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A yes/no indicator, stored and sent as `"Y"` or `"N"`.
///
/// Deserialization also accepts lower-case letters and JSON booleans so that
/// API clients may send either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Yes,
    No,
}

impl Flag {
    /// The single-letter column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Yes => "Y",
            Flag::No => "N",
        }
    }

    /// Parses `Y`/`N`, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Y" | "y" => Some(Flag::Yes),
            "N" | "n" => Some(Flag::No),
            _ => None,
        }
    }

    pub fn is_set(self) -> bool {
        self == Flag::Yes
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Flag::Yes } else { Flag::No }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = Flag;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("\"Y\", \"N\" or a boolean")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Flag, E>
            where
                E: de::Error,
            {
                Ok(Flag::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Flag, E>
            where
                E: de::Error,
            {
                Flag::parse(value).ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}
