pub mod user;
pub mod order;
pub mod order_line;
pub mod brand;

pub use user::*;
pub use order::*;
pub use order_line::*;
pub use brand::*;

use serde::{Deserialize, Deserializer};

/// Decimal columns arrive either as JSON numbers or as strings like `"12.50"`.
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Decimal::deserialize(deserializer)? {
        Decimal::Number(value) => Ok(value),
        Decimal::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
