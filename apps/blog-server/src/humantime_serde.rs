//! Serde support for `std::time::Duration` written as humantime strings
//! (`"90d"`, `"1h"`, `"250ms"`).

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer, de};

/// Deserializes a `Duration` via the humantime crate.
///
/// This function can be used with `serde_derive`'s `with` and
/// `deserialize_with` annotations.
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    humantime::parse_duration(&raw)
        .map_err(|e| de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

/// Serializes a `Duration` via the humantime crate.
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}
