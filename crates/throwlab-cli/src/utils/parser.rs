use thiserror::Error;
use throwlab::engine::config::BlendPart;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Blend specification cannot be empty.")]
    EmptyBlend,

    #[error("Invalid blend entry '{0}'. Expected 'key=share' (e.g., 'paraffin=80').")]
    InvalidBlendEntry(String),

    #[error("Invalid share '{value}' for wax '{key}'. Expected a number.")]
    InvalidShare { key: String, value: String },

    #[error("Wax '{0}' appears more than once in the blend.")]
    DuplicateWax(String),

    #[error("Invalid assignment '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),
}

/// Parses `paraffin=80,microcrystalline=20` into blend parts.
///
/// Shares are kept as given; normalization happens in the blend combiner.
pub fn parse_blend(spec: &str) -> Result<Vec<BlendPart>, ParseError> {
    let mut parts: Vec<BlendPart> = Vec::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| ParseError::InvalidBlendEntry(entry.to_string()))?;
        let share: f64 = value.parse().map_err(|_| ParseError::InvalidShare {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        if parts.iter().any(|p| p.key == key) {
            return Err(ParseError::DuplicateWax(key.to_string()));
        }
        parts.push(BlendPart::new(key, share));
    }

    if parts.is_empty() {
        return Err(ParseError::EmptyBlend);
    }
    Ok(parts)
}

/// Splits a `-S` assignment at the first `=`.
pub fn parse_key_value(assignment: &str) -> Result<(&str, &str), ParseError> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidAssignment(assignment.to_string())),
    }
}
