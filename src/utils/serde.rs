//! Custom deserializers for loosely-typed query parameters.
//!
//! Filter values arrive as strings; anything that fails to parse is treated
//! as absent rather than rejected, matching the listing endpoint's contract.

use serde::{Deserialize, Deserializer};

pub fn deserialize_lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.parse::<i32>().ok()))
}

pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.parse::<f64>().ok()))
}
