use std::collections::BTreeMap;

use chrono::NaiveDate;

pub const REQUIRED_MESSAGE: &str = "Este campo es obligatorio.";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(Option<NaiveDate>),
    Choice(Option<i64>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Date(date) => date.is_none(),
            FieldValue::Choice(choice) => choice.is_none(),
        }
    }
}

pub type FormValues = BTreeMap<&'static str, FieldValue>;

/// Validation errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Values of one form plus the snapshot they are compared against.
///
/// The form is dirty when its values differ from the last loaded or
/// submitted snapshot.
///
/// Input a widget could not parse is kept apart from validation errors: it
/// survives `clear_errors` and blocks submission until the field gets a
/// value again.
#[derive(Debug, Clone)]
pub struct FormState {
    values: FormValues,
    snapshot: FormValues,
    errors: FieldErrors,
    rejected: FieldErrors,
}

impl FormState {
    pub fn new(defaults: FormValues) -> Self {
        Self {
            snapshot: defaults.clone(),
            values: defaults,
            errors: FieldErrors::new(),
            rejected: FieldErrors::new(),
        }
    }

    /// Replaces values and snapshot, as after loading a record.
    pub fn reset(&mut self, values: FormValues) {
        self.snapshot = values.clone();
        self.values = values;
        self.errors = FieldErrors::new();
        self.rejected = FieldErrors::new();
    }

    /// Marks the current values as saved.
    pub fn commit(&mut self) {
        self.snapshot = self.values.clone();
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.snapshot
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn set_value(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
        self.errors.0.remove(name);
        self.rejected.0.remove(name);
    }

    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(text)) => text,
            _ => "",
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.values.get(name) {
            Some(FieldValue::Date(date)) => *date,
            _ => None,
        }
    }

    pub fn choice(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Choice(choice)) => *choice,
            _ => None,
        }
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.rejected.get(name).or_else(|| self.errors.get(name))
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_error(&mut self, name: &'static str, message: impl Into<String>) {
        self.errors.insert(name, message);
    }

    pub fn set_errors(&mut self, errors: FieldErrors) {
        for (field, message) in errors.0 {
            self.errors.insert(field, message);
        }
    }

    /// Validation errors only; rejected input stays.
    pub fn clear_errors(&mut self) {
        self.errors = FieldErrors::new();
    }

    /// Records input the widget for `name` could not parse. The previous
    /// value is left untouched.
    pub fn reject_input(&mut self, name: &'static str, message: impl Into<String>) {
        self.rejected.insert(name, message);
    }

    pub fn rejected(&self) -> &FieldErrors {
        &self.rejected
    }

    pub fn has_rejected_input(&self) -> bool {
        !self.rejected.is_empty()
    }
}
