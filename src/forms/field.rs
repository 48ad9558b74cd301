use chrono::NaiveDate;

use super::{FieldValue, FormState, REQUIRED_MESSAGE};
use crate::error::FieldError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// A widget bound to one named field of a [`FormState`].
///
/// Widgets hold no value of their own: reads go to the form, and `change`
/// is the only way they write to it.
pub trait FieldWidget: Send + Sync {
    fn name(&self) -> &'static str;

    fn label(&self) -> &str;

    fn required(&self) -> bool;

    /// Value as the widget shows it.
    fn display_value(&self, form: &FormState) -> String;

    /// Parses raw user input and writes it to the bound field. Unparseable
    /// input leaves the value alone and records an error on the field.
    fn change(&self, form: &mut FormState, input: &str) -> Result<(), FieldError>;

    fn error<'a>(&self, form: &'a FormState) -> Option<&'a str> {
        form.error(self.name())
    }

    fn render(&self, form: &FormState) -> String {
        let mut line = format!("{}: {}", self.label(), self.display_value(form));
        if let Some(error) = self.error(form) {
            line.push_str(&format!("\n  ! {error}"));
        }
        line
    }
}

/// Flags every required field that is empty. Returns true when all pass.
pub fn validate_required(fields: &[Box<dyn FieldWidget>], form: &mut FormState) -> bool {
    let mut valid = true;
    for field in fields.iter().filter(|field| field.required()) {
        let empty = form.value(field.name()).map_or(true, FieldValue::is_empty);
        if empty {
            form.set_error(field.name(), REQUIRED_MESSAGE);
            valid = false;
        }
    }
    valid
}

// =============================================================================
// Text
// =============================================================================

pub struct TextField {
    name: &'static str,
    label: String,
    placeholder: Option<String>,
    required: bool,
    masked: bool,
}

impl TextField {
    pub fn new(name: &'static str, label: impl Into<String>) -> Self {
        Self {
            name,
            label: label.into(),
            placeholder: None,
            required: true,
            masked: false,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Renders the value as bullets, for passwords.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }
}

impl FieldWidget for TextField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn required(&self) -> bool {
        self.required
    }

    fn display_value(&self, form: &FormState) -> String {
        let text = form.text(self.name);
        if text.is_empty() {
            self.placeholder.clone().unwrap_or_default()
        } else if self.masked {
            "•".repeat(text.chars().count())
        } else {
            text.to_string()
        }
    }

    fn change(&self, form: &mut FormState, input: &str) -> Result<(), FieldError> {
        form.set_value(self.name, FieldValue::text(input));
        Ok(())
    }
}

// =============================================================================
// Multi-line text
// =============================================================================

pub struct MultiLineField {
    name: &'static str,
    label: String,
    placeholder: Option<String>,
    required: bool,
}

impl MultiLineField {
    pub fn new(name: &'static str, label: impl Into<String>) -> Self {
        Self {
            name,
            label: label.into(),
            placeholder: None,
            required: true,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

impl FieldWidget for MultiLineField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn required(&self) -> bool {
        self.required
    }

    fn display_value(&self, form: &FormState) -> String {
        let text = form.text(self.name);
        if text.is_empty() {
            return self.placeholder.clone().unwrap_or_default();
        }
        text.lines().collect::<Vec<_>>().join("\n  | ")
    }

    fn change(&self, form: &mut FormState, input: &str) -> Result<(), FieldError> {
        form.set_value(self.name, FieldValue::text(input));
        Ok(())
    }
}

// =============================================================================
// Date picker
// =============================================================================

pub struct DatePickerField {
    name: &'static str,
    label: String,
    required: bool,
}

impl DatePickerField {
    pub fn new(name: &'static str, label: impl Into<String>) -> Self {
        Self {
            name,
            label: label.into(),
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Accepts `YYYY-MM-DD` and `DD-MM-YYYY`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT))
        .ok()
}

impl FieldWidget for DatePickerField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn required(&self) -> bool {
        self.required
    }

    fn display_value(&self, form: &FormState) -> String {
        form.date(self.name)
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    fn change(&self, form: &mut FormState, input: &str) -> Result<(), FieldError> {
        if input.trim().is_empty() {
            form.set_value(self.name, FieldValue::Date(None));
            return Ok(());
        }
        match parse_date(input) {
            Some(date) => {
                form.set_value(self.name, FieldValue::Date(Some(date)));
                Ok(())
            }
            None => {
                let error = FieldError::InvalidDate(input.to_string());
                form.reject_input(self.name, error.to_string());
                Err(error)
            }
        }
    }
}

// =============================================================================
// Select
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

pub struct SelectField {
    name: &'static str,
    label: String,
    options: Vec<SelectOption>,
    required: bool,
}

impl SelectField {
    pub fn new(name: &'static str, label: impl Into<String>) -> Self {
        Self {
            name,
            label: label.into(),
            options: Vec::new(),
            required: true,
        }
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn option_list(&self) -> &[SelectOption] {
        &self.options
    }
}

impl FieldWidget for SelectField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn required(&self) -> bool {
        self.required
    }

    fn display_value(&self, form: &FormState) -> String {
        match form.choice(self.name) {
            Some(value) => self
                .options
                .iter()
                .find(|option| option.value == value)
                .map(|option| option.label.clone())
                // Options may not have loaded yet.
                .unwrap_or_else(|| format!("#{value}")),
            None => String::new(),
        }
    }

    fn change(&self, form: &mut FormState, input: &str) -> Result<(), FieldError> {
        if input.trim().is_empty() {
            form.set_value(self.name, FieldValue::Choice(None));
            return Ok(());
        }
        let selected = input
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|value| self.options.iter().any(|option| option.value == *value));
        match selected {
            Some(value) => {
                form.set_value(self.name, FieldValue::Choice(Some(value)));
                Ok(())
            }
            None => {
                let error = FieldError::UnknownOption(input.to_string());
                form.reject_input(self.name, error.to_string());
                Err(error)
            }
        }
    }
}
