use crate::domain::{User, UserPayload};
use crate::forms::{DatePickerField, FieldErrors, FieldValue, FieldWidget, FormState, FormValues, TextField};
use crate::navigation::ResourceKind;
use crate::resource_framework::{FormModel, Messages, Resource};
use crate::views::{Cell, Column, Mode};

impl Resource for User {
    type Payload = UserPayload;

    const KIND: ResourceKind = ResourceKind::Users;
    const COLLECTION: &'static str = "usuario";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("Nombre", |u: &User| Cell::text(&u.name)),
            Column::new("Email", |u: &User| Cell::text(&u.email)),
            Column::new("Dirección", |u: &User| Cell::text(&u.address)),
            Column::new("Teléfono", |u: &User| Cell::text(&u.phone)),
            Column::new("Fecha", |u: &User| Cell::Date(u.date)),
        ]
    }
}

impl FormModel for User {
    const MESSAGES: Messages = Messages {
        created: "El usuario {name} se creó correctamente.",
        updated: "El usuario {name} se actualizó correctamente.",
        deleted: "El usuario {name} se eliminó correctamente.",
        create_failed: "Error al crear el usuario. Verifique los datos e intente nuevamente.",
        update_failed: "Error al actualizar el usuario. Verifique los datos e intente nuevamente.",
        delete_failed: "Error al eliminar el usuario. Intente nuevamente.",
        load_failed: "No se pudo cargar el usuario.",
        cancel_create: "¿Estás seguro de cancelar la creación del usuario?",
        cancel_edit: "¿Estás seguro de cancelar la edición del usuario?",
        confirm_delete: "¿Estás seguro de eliminar el usuario {name}?",
    };

    fn fields(mode: Mode) -> Vec<Box<dyn FieldWidget>> {
        let password = TextField::new("password", "Password")
            .placeholder("Proporcionar la contraseña")
            .masked();
        // The backend never returns the password, so editing keeps it unless retyped.
        let password = match mode {
            Mode::Create => password,
            Mode::Edit(_) => password.optional(),
        };
        vec![
            Box::new(TextField::new("name", "Nombre").placeholder("Proporcionar el nombre")),
            Box::new(TextField::new("email", "Email").placeholder("Proporcionar el email")),
            Box::new(TextField::new("address", "Dirección").placeholder("Proporcionar la dirección")),
            Box::new(TextField::new("phone", "Teléfono").placeholder("Proporcionar el teléfono")),
            Box::new(password),
            Box::new(DatePickerField::new("date", "Fecha")),
        ]
    }

    fn defaults() -> FormValues {
        FormValues::from([
            ("name", FieldValue::text("")),
            ("email", FieldValue::text("")),
            ("address", FieldValue::text("")),
            ("phone", FieldValue::text("")),
            ("password", FieldValue::text("")),
            ("date", FieldValue::Date(None)),
        ])
    }

    fn values(&self) -> FormValues {
        FormValues::from([
            ("name", FieldValue::text(&self.name)),
            ("email", FieldValue::text(&self.email)),
            ("address", FieldValue::text(&self.address)),
            ("phone", FieldValue::text(&self.phone)),
            ("password", FieldValue::text("")),
            ("date", FieldValue::Date(Some(self.date))),
        ])
    }

    fn payload(form: &FormState) -> Result<UserPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let date = super::date(form, "date", &mut errors);
        let password = form.text("password");
        match date {
            Some(date) if errors.is_empty() => Ok(UserPayload {
                name: super::text(form, "name"),
                email: super::text(form, "email"),
                address: super::text(form, "address"),
                phone: super::text(form, "phone"),
                password: (!password.is_empty()).then(|| password.to_string()),
                date,
            }),
            _ => Err(errors),
        }
    }

    fn display_name(payload: &UserPayload) -> String {
        payload.name.clone()
    }

    fn record_name(&self) -> String {
        self.name.clone()
    }
}
