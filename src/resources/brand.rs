use crate::domain::{Brand, BrandPayload};
use crate::forms::{
    DatePickerField, FieldErrors, FieldValue, FieldWidget, FormState, FormValues, MultiLineField, TextField,
};
use crate::navigation::ResourceKind;
use crate::resource_framework::{FormModel, Messages, Resource};
use crate::views::{Cell, Column, Mode};

impl Resource for Brand {
    type Payload = BrandPayload;

    const KIND: ResourceKind = ResourceKind::Brands;
    const COLLECTION: &'static str = "marca";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("Nombre", |b: &Brand| Cell::text(&b.name)),
            Column::new("Descripción", |b: &Brand| Cell::text(&b.description)),
            Column::new("Fecha", |b: &Brand| Cell::Date(b.date)),
        ]
    }
}

impl FormModel for Brand {
    const MESSAGES: Messages = Messages {
        created: "La marca {name} se creó correctamente.",
        updated: "La marca {name} se actualizó correctamente.",
        deleted: "La marca {name} se eliminó correctamente.",
        create_failed: "Error al crear la marca. Verifique los datos e intente nuevamente.",
        update_failed: "Error al actualizar la marca. Verifique los datos e intente nuevamente.",
        delete_failed: "Error al eliminar la marca. Intente nuevamente.",
        load_failed: "No se pudo cargar la marca.",
        cancel_create: "¿Estás seguro de cancelar la creación de la marca?",
        cancel_edit: "¿Estás seguro de cancelar la edición de la marca?",
        confirm_delete: "¿Estás seguro de eliminar la marca {name}?",
    };

    fn fields(_mode: Mode) -> Vec<Box<dyn FieldWidget>> {
        vec![
            Box::new(TextField::new("name", "Nombre").placeholder("Proporcionar el nombre")),
            Box::new(
                MultiLineField::new("description", "Descripción")
                    .placeholder("Proporcionar la descripción de la marca"),
            ),
            Box::new(DatePickerField::new("date", "Fecha")),
        ]
    }

    fn defaults() -> FormValues {
        FormValues::from([
            ("name", FieldValue::text("")),
            ("description", FieldValue::text("")),
            ("date", FieldValue::Date(None)),
        ])
    }

    fn values(&self) -> FormValues {
        FormValues::from([
            ("name", FieldValue::text(&self.name)),
            ("description", FieldValue::text(&self.description)),
            ("date", FieldValue::Date(Some(self.date))),
        ])
    }

    fn payload(form: &FormState) -> Result<BrandPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        match super::date(form, "date", &mut errors) {
            Some(date) => Ok(BrandPayload {
                name: super::text(form, "name"),
                description: form.text("description").to_string(),
                date,
            }),
            None => Err(errors),
        }
    }

    fn display_name(payload: &BrandPayload) -> String {
        payload.name.clone()
    }

    fn record_name(&self) -> String {
        self.name.clone()
    }
}
