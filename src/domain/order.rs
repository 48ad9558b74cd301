use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A customer order ("pedido").
///
/// Customer details are copied from the selected user when the order is
/// edited, but stored on the order itself; `user_id` is the only link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(rename = "usuario")]
    pub user_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dni")]
    pub national_id: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}

/// Body for creating or fully replacing an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    #[serde(rename = "usuario")]
    pub user_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dni")]
    pub national_id: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}
