use crate::error::ParseError;

/// Splits a `|`-separated backend payload into exactly `expected` fields.
pub(crate) fn split_fields(payload: &str, expected: usize) -> Result<Vec<&str>, ParseError> {
    let fields: Vec<&str> = payload.trim().split('|').map(str::trim).collect();
    if fields.len() != expected {
        return Err(ParseError::FieldCount {
            payload: payload.to_string(),
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

pub(crate) fn non_empty<'a>(
    field: &'static str,
    value: &'a str,
    payload: &str,
) -> Result<&'a str, ParseError> {
    if value.is_empty() {
        return Err(ParseError::EmptyField {
            field,
            payload: payload.to_string(),
        });
    }
    Ok(value)
}

pub(crate) fn number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, ParseError> {
    value.parse::<T>().map_err(|_| ParseError::NotANumber {
        field,
        value: value.to_string(),
    })
}
