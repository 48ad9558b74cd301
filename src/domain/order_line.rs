use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One product line of an order ("detalle de pedido").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    #[serde(rename = "pedido")]
    pub order_id: i64,
    #[serde(rename = "producto_nombre")]
    pub product_name: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio", deserialize_with = "super::deserialize_decimal")]
    pub price: f64,
    // Denormalized by the backend from the parent order.
    #[serde(rename = "pedido_fecha", default)]
    pub order_date: Option<NaiveDate>,
    #[serde(rename = "pedido_nombre_usuario", default)]
    pub order_customer: Option<String>,
}

/// Body for creating an order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLinePayload {
    #[serde(rename = "pedido")]
    pub order_id: i64,
    #[serde(rename = "producto_nombre")]
    pub product_name: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio")]
    pub price: f64,
}
