//! # Input Validation
//!
//! Turns raw form parameters into typed values, collecting every failing field
//! before giving up.

use chrono::NaiveDate;
use shared_types::errors::{QuoteError, QuoteResult, ValidationErrors};
use shared_types::money::Money;
use shared_types::params::{LineItemDateParams, LineItemParams};

const BLANK: &str = "can't be blank";

/// Validated line item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemFields {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Money,
}

/// Trimmed, non-empty text or a "can't be blank" error on `field`.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            errors.add(field, BLANK);
            None
        }
    }
}

/// A single required name, as for companies and quotes.
pub fn name(value: Option<&str>) -> QuoteResult<String> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", value);
    errors.into_result()?;
    Ok(name.unwrap_or_default())
}

/// Lower-cased login identifier with exactly one `@` and text on both sides.
pub fn email(value: Option<&str>) -> QuoteResult<String> {
    let mut errors = ValidationErrors::new();
    if let Some(email) = required_text(&mut errors, "email", value) {
        let email = email.to_lowercase();
        let valid = matches!(
            email.split_once('@'),
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        );
        if valid {
            return Ok(email);
        }
        errors.add("email", "is invalid");
    }
    errors.into_result()?;
    Ok(String::new())
}

pub fn date(params: &LineItemDateParams) -> QuoteResult<NaiveDate> {
    let mut errors = ValidationErrors::new();
    let date = required_text(&mut errors, "date", params.date.as_deref())
        .and_then(|text| parse_date(&mut errors, &text));
    errors.into_result()?;
    date.ok_or_else(|| QuoteError::invalid("date", BLANK))
}

fn parse_date(errors: &mut ValidationErrors, text: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add("date", "is not a valid date");
            None
        }
    }
}

/// Full validation of a line item: `params` is the complete final state.
pub fn line_item(params: &LineItemParams) -> QuoteResult<LineItemFields> {
    let mut errors = ValidationErrors::new();

    let name = required_text(&mut errors, "name", params.name.as_deref());
    let description = params
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    let quantity = required_text(&mut errors, "quantity", params.quantity.as_deref())
        .and_then(|text| parse_quantity(&mut errors, &text));
    let unit_price = required_text(&mut errors, "unit_price", params.unit_price.as_deref())
        .and_then(|text| parse_unit_price(&mut errors, &text));

    errors.into_result()?;
    match (name, quantity, unit_price) {
        (Some(name), Some(quantity), Some(unit_price)) => Ok(LineItemFields {
            name,
            description,
            quantity,
            unit_price,
        }),
        _ => Err(QuoteError::invalid("name", BLANK)),
    }
}

fn parse_quantity(errors: &mut ValidationErrors, text: &str) -> Option<i32> {
    if let Ok(quantity) = text.parse::<i32>() {
        return Some(quantity);
    }
    let message = if text.parse::<f64>().is_ok() {
        "must be an integer"
    } else {
        "is not a number"
    };
    errors.add("quantity", message);
    None
}

fn parse_unit_price(errors: &mut ValidationErrors, text: &str) -> Option<Money> {
    match Money::parse(text) {
        Ok(price) => Some(price),
        Err(err) => {
            errors.add("unit_price", err.to_string());
            None
        }
    }
}
