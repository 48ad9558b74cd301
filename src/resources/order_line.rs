use crate::domain::{OrderLine, OrderLinePayload};
use crate::forms::{FieldErrors, FieldValue, FieldWidget, FormState, FormValues, TextField};
use crate::navigation::ResourceKind;
use crate::resource_framework::{FormModel, Messages, Resource};
use crate::views::{Cell, Column, Mode};

impl Resource for OrderLine {
    type Payload = OrderLinePayload;

    const KIND: ResourceKind = ResourceKind::OrderLines;
    const COLLECTION: &'static str = "detallepedido";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("Pedido", |l: &OrderLine| match &l.order_customer {
                Some(customer) => Cell::text(customer),
                None => Cell::Integer(l.order_id),
            }),
            Column::new("Nombre del Producto", |l: &OrderLine| Cell::text(&l.product_name)),
            Column::new("Cantidad", |l: &OrderLine| Cell::Integer(i64::from(l.quantity))),
            Column::new("Precio", |l: &OrderLine| Cell::Decimal(l.price)),
            Column::new("Fecha", |l: &OrderLine| l.order_date.map_or(Cell::Empty, Cell::Date)),
        ]
    }
}

impl FormModel for OrderLine {
    const MESSAGES: Messages = Messages {
        created: "El detalle del pedido {name} se creó correctamente.",
        updated: "El detalle del pedido {name} se actualizó correctamente.",
        deleted: "El detalle del pedido {name} se eliminó correctamente.",
        create_failed: "Error al crear el detalle del pedido. Verifique los datos e intente nuevamente.",
        update_failed: "Error al actualizar el detalle del pedido. Verifique los datos e intente nuevamente.",
        delete_failed: "Error al eliminar el detalle del pedido. Intente nuevamente.",
        load_failed: "No se pudo cargar el detalle del pedido.",
        cancel_create: "¿Estás seguro de cancelar la creación del detalle del pedido?",
        cancel_edit: "¿Estás seguro de cancelar la edición del detalle del pedido?",
        confirm_delete: "¿Estás seguro de eliminar el detalle del pedido {name}?",
    };

    fn fields(_mode: Mode) -> Vec<Box<dyn FieldWidget>> {
        vec![
            Box::new(TextField::new("order_id", "Pedido").placeholder("Proporcionar el número de pedido")),
            Box::new(
                TextField::new("product_name", "Nombre del Producto")
                    .placeholder("Proporcionar el nombre del producto"),
            ),
            Box::new(TextField::new("quantity", "Cantidad").placeholder("Proporcionar la cantidad")),
            Box::new(TextField::new("price", "Precio").placeholder("Proporcionar el precio")),
        ]
    }

    fn defaults() -> FormValues {
        FormValues::from([
            ("order_id", FieldValue::text("")),
            ("product_name", FieldValue::text("")),
            ("quantity", FieldValue::text("")),
            ("price", FieldValue::text("")),
        ])
    }

    fn values(&self) -> FormValues {
        FormValues::from([
            ("order_id", FieldValue::text(self.order_id.to_string())),
            ("product_name", FieldValue::text(&self.product_name)),
            ("quantity", FieldValue::text(self.quantity.to_string())),
            ("price", FieldValue::text(format!("{:.2}", self.price))),
        ])
    }

    fn payload(form: &FormState) -> Result<OrderLinePayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let order_id = super::integer::<i64>(form, "order_id", &mut errors);
        let quantity = super::integer::<u32>(form, "quantity", &mut errors);
        let price = super::decimal(form, "price", &mut errors);
        match (order_id, quantity, price) {
            (Some(order_id), Some(quantity), Some(price)) => Ok(OrderLinePayload {
                order_id,
                product_name: super::text(form, "product_name"),
                quantity,
                price,
            }),
            _ => Err(errors),
        }
    }

    fn display_name(payload: &OrderLinePayload) -> String {
        payload.product_name.clone()
    }

    fn record_name(&self) -> String {
        self.product_name.clone()
    }
}
