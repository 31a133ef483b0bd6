//! `${key}` / `${key:default}` placeholder resolution

use nrc_domain::error::{Error, Result};
use nrc_domain::ports::PropertySource;

const PREFIX: &str = "${";
const SUFFIX: char = '}';
const DEFAULT_SEPARATOR: char = ':';

/// Replace every placeholder in `input` with its property value
///
/// Text without placeholders is returned unchanged. A placeholder whose key
/// is undefined and has no default is a configuration error.
pub fn resolve_placeholders(input: &str, properties: &dyn PropertySource) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(PREFIX) {
        output.push_str(&rest[..start]);
        let after = &rest[start + PREFIX.len()..];
        let end = after.find(SUFFIX).ok_or_else(|| {
            Error::configuration(format!("Unclosed placeholder in '{input}'"))
        })?;
        let expression = &after[..end];
        let (key, default) = match expression.split_once(DEFAULT_SEPARATOR) {
            Some((key, default)) => (key, Some(default)),
            None => (expression, None),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::configuration(format!(
                "Empty placeholder in '{input}'"
            )));
        }
        let value = properties
            .property(key)
            .or_else(|| default.map(str::to_string))
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Could not resolve placeholder '{key}' in '{input}'"
                ))
            })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Resolve placeholders in an optional attribute, dropping blank results
pub fn resolve_attribute(
    value: Option<&str>,
    properties: &dyn PropertySource,
) -> Result<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let resolved = resolve_placeholders(value, properties)?;
    let trimmed = resolved.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
