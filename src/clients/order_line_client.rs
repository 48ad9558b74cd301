use crate::domain::OrderLine;
use crate::resource_framework::ResourceClient;

/// Client for the `detallepedido` collection.
#[derive(Clone)]
pub struct OrderLineClient {
    inner: ResourceClient<OrderLine>,
}

impl_basic_client!(OrderLineClient, OrderLine, order_line, order_lines);
