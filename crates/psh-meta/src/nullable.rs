//! Null-tolerant field deserialization.
//!
//! A YAML key with nothing after it (`variables:`) deserializes as `null`.
//! Descriptor sections written that way are read as empty.

use serde::{Deserialize, Deserializer};

/// Deserialize `T`, treating an explicit `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
