//! Lenient deserialization helpers for backend rows.
//!
//! The backend returns `null` for unset columns. Report records treat those the
//! same as missing fields.

use serde::{Deserialize, Deserializer};

pub use crate::timestamp::lenient_timestamp;

/// Deserialize `null` as `T::default()`.
///
/// Pair with `#[serde(default)]` so an absent field behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
