use crate::domain::{Order, OrderPayload};
use crate::forms::{DatePickerField, FieldErrors, FieldValue, FieldWidget, FormState, FormValues, SelectField, TextField};
use crate::navigation::ResourceKind;
use crate::resource_framework::{FormModel, Messages, Resource};
use crate::views::{Cell, Column, Mode};

impl Resource for Order {
    type Payload = OrderPayload;

    const KIND: ResourceKind = ResourceKind::Orders;
    const COLLECTION: &'static str = "pedido";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("Nombre", |o: &Order| Cell::text(&o.name)),
            Column::new("DNI", |o: &Order| Cell::text(&o.national_id)),
            Column::new("Dirección", |o: &Order| Cell::text(&o.address)),
            Column::new("Teléfono", |o: &Order| Cell::text(&o.phone)),
            Column::new("Email", |o: &Order| Cell::text(&o.email)),
            Column::new("Fecha", |o: &Order| Cell::Date(o.date)),
        ]
    }
}

impl FormModel for Order {
    const MESSAGES: Messages = Messages {
        created: "El pedido de {name} se creó correctamente.",
        updated: "El pedido de {name} se actualizó correctamente.",
        deleted: "El pedido de {name} se eliminó correctamente.",
        create_failed: "Error al crear el pedido. Verifique los datos e intente nuevamente.",
        update_failed: "Error al actualizar el pedido. Verifique los datos e intente nuevamente.",
        delete_failed: "Error al eliminar el pedido. Intente nuevamente.",
        load_failed: "No se pudo cargar el pedido.",
        cancel_create: "¿Estás seguro de cancelar la creación del pedido?",
        cancel_edit: "¿Estás seguro de cancelar la edición del pedido?",
        confirm_delete: "¿Estás seguro de eliminar el pedido de {name}?",
    };

    /// The user select starts without options; the order view fills them
    /// once the user list arrives.
    fn fields(_mode: Mode) -> Vec<Box<dyn FieldWidget>> {
        vec![
            Box::new(SelectField::new("user_id", "Usuario")),
            Box::new(TextField::new("name", "Nombre").placeholder("Proporcionar el nombre")),
            Box::new(TextField::new("national_id", "DNI").placeholder("Proporcionar el DNI")),
            Box::new(TextField::new("address", "Dirección").placeholder("Proporcionar la dirección")),
            Box::new(TextField::new("phone", "Teléfono").placeholder("Proporcionar el teléfono")),
            Box::new(TextField::new("email", "Email").placeholder("Proporcionar el email")),
            Box::new(DatePickerField::new("date", "Fecha")),
        ]
    }

    fn defaults() -> FormValues {
        FormValues::from([
            ("user_id", FieldValue::Choice(None)),
            ("name", FieldValue::text("")),
            ("national_id", FieldValue::text("")),
            ("address", FieldValue::text("")),
            ("phone", FieldValue::text("")),
            ("email", FieldValue::text("")),
            ("date", FieldValue::Date(None)),
        ])
    }

    fn values(&self) -> FormValues {
        FormValues::from([
            ("user_id", FieldValue::Choice(Some(self.user_id))),
            ("name", FieldValue::text(&self.name)),
            ("national_id", FieldValue::text(&self.national_id)),
            ("address", FieldValue::text(&self.address)),
            ("phone", FieldValue::text(&self.phone)),
            ("email", FieldValue::text(&self.email)),
            ("date", FieldValue::Date(Some(self.date))),
        ])
    }

    fn payload(form: &FormState) -> Result<OrderPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let user_id = super::choice(form, "user_id", &mut errors);
        let date = super::date(form, "date", &mut errors);
        match (user_id, date) {
            (Some(user_id), Some(date)) => Ok(OrderPayload {
                user_id,
                name: super::text(form, "name"),
                national_id: super::text(form, "national_id"),
                address: super::text(form, "address"),
                phone: super::text(form, "phone"),
                email: super::text(form, "email"),
                date,
            }),
            _ => Err(errors),
        }
    }

    fn display_name(payload: &OrderPayload) -> String {
        payload.name.clone()
    }

    fn record_name(&self) -> String {
        self.name.clone()
    }
}
