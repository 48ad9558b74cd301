use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered user. Also the identity orders are attributed to.
///
/// The password is write-only: it travels in [`UserPayload`] and is never
/// read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}

/// Body for creating or fully replacing a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Left out of the body when editing without a new password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}
