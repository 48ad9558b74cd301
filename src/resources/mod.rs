//! `Resource` and `FormModel` implementations for each entity.

mod user;
mod order;
mod order_line;
mod brand;

pub use user::*;
pub use order::*;
pub use order_line::*;
pub use brand::*;

use chrono::NaiveDate;

use crate::forms::{FieldErrors, FormState, REQUIRED_MESSAGE};

pub const INTEGER_MESSAGE: &str = "Debe ser un número entero.";
pub const DECIMAL_MESSAGE: &str = "Debe ser un número.";

fn text(form: &FormState, name: &str) -> String {
    form.text(name).trim().to_string()
}

fn date(form: &FormState, name: &'static str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let date = form.date(name);
    if date.is_none() {
        errors.insert(name, REQUIRED_MESSAGE);
    }
    date
}

fn choice(form: &FormState, name: &'static str, errors: &mut FieldErrors) -> Option<i64> {
    let choice = form.choice(name);
    if choice.is_none() {
        errors.insert(name, REQUIRED_MESSAGE);
    }
    choice
}

fn integer<N: std::str::FromStr>(form: &FormState, name: &'static str, errors: &mut FieldErrors) -> Option<N> {
    let parsed = form.text(name).trim().parse().ok();
    if parsed.is_none() {
        errors.insert(name, INTEGER_MESSAGE);
    }
    parsed
}

/// Accepts both `12.5` and `12,5`.
fn decimal(form: &FormState, name: &'static str, errors: &mut FieldErrors) -> Option<f64> {
    let parsed = form
        .text(name)
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite());
    if parsed.is_none() {
        errors.insert(name, DECIMAL_MESSAGE);
    }
    parsed
}
