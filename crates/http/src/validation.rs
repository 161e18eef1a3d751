//! Client-side checks run before create and update requests

use crate::messages::Locale;
use crate::types::{PersonDraft, PersonPatch, ProductDraft, ProductPatch};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

pub const NAME_MAX_LEN: usize = 100;
pub const PRODUCT_NAME_MAX_LEN: usize = 150;
pub const SKU_MIN_LEN: usize = 3;
pub const SKU_MAX_LEN: usize = 50;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Field violations in insertion order, rendered like a 400 response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", render_fields(.fields))]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_string(), vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn render_fields(fields: &[(String, Vec<String>)]) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

struct Checker {
    locale: Locale,
    errors: ValidationErrors,
}

impl Checker {
    fn new(locale: Locale) -> Self {
        Self {
            locale,
            errors: ValidationErrors::new(),
        }
    }

    fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.errors.add(field, self.locale.required());
            false
        } else {
            true
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.errors.add(field, self.locale.too_long(max));
        }
    }

    fn min_len(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.errors.add(field, self.locale.too_short(min));
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        if !EMAIL_RE.is_match(value.trim()) {
            self.errors.add(field, self.locale.invalid_email());
        }
    }

    fn non_negative(&mut self, field: &str, value: Decimal) {
        if value.is_sign_negative() && !value.is_zero() {
            self.errors.add(field, self.locale.negative());
        }
    }

    fn name(&mut self, field: &str, value: &str, max: usize) {
        if self.required(field, value) {
            self.max_len(field, value, max);
        }
    }

    fn email_field(&mut self, field: &str, value: &str) {
        if self.required(field, value) {
            self.email(field, value);
        }
    }

    fn sku(&mut self, field: &str, value: &str) {
        if self.required(field, value) {
            self.min_len(field, value, SKU_MIN_LEN);
            self.max_len(field, value, SKU_MAX_LEN);
        }
    }
}

pub fn validate_credentials(
    username: &str,
    password: &str,
    locale: Locale,
) -> Result<(), ValidationErrors> {
    let mut check = Checker::new(locale);
    check.required("username", username);
    check.required("password", password);
    check.errors.into_result()
}

pub fn validate_person(draft: &PersonDraft, locale: Locale) -> Result<(), ValidationErrors> {
    let mut check = Checker::new(locale);
    check.name("first_name", &draft.first_name, NAME_MAX_LEN);
    check.name("last_name", &draft.last_name, NAME_MAX_LEN);
    check.email_field("email", &draft.email);
    check.errors.into_result()
}

/// Only the fields present in the patch are checked
pub fn validate_person_patch(patch: &PersonPatch, locale: Locale) -> Result<(), ValidationErrors> {
    let mut check = Checker::new(locale);
    if let Some(first_name) = &patch.first_name {
        check.name("first_name", first_name, NAME_MAX_LEN);
    }
    if let Some(last_name) = &patch.last_name {
        check.name("last_name", last_name, NAME_MAX_LEN);
    }
    if let Some(email) = &patch.email {
        check.email_field("email", email);
    }
    check.errors.into_result()
}

pub fn validate_product(draft: &ProductDraft, locale: Locale) -> Result<(), ValidationErrors> {
    let mut check = Checker::new(locale);
    check.name("name", &draft.name, PRODUCT_NAME_MAX_LEN);
    check.sku("sku", &draft.sku);
    check.non_negative("price", draft.price);
    check.errors.into_result()
}

pub fn validate_product_patch(
    patch: &ProductPatch,
    locale: Locale,
) -> Result<(), ValidationErrors> {
    let mut check = Checker::new(locale);
    if let Some(name) = &patch.name {
        check.name("name", name, PRODUCT_NAME_MAX_LEN);
    }
    if let Some(sku) = &patch.sku {
        check.sku("sku", sku);
    }
    if let Some(price) = patch.price {
        check.non_negative("price", price);
    }
    check.errors.into_result()
}
