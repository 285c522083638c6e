//! Shared tokenizing and formatting for the whitespace-separated label
//! text formats.

use std::fmt::Write as _;

use super::types::{ClassId, LabelError};

/// Decimal places written for every coordinate.
pub const COORD_DECIMALS: usize = 7;

/// Split a label line into its class and exactly `coords` numbers.
pub(crate) fn parse_fields(
    line: &str,
    record: usize,
    coords: usize,
) -> Result<(ClassId, Vec<f64>), LabelError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != coords + 1 {
        return Err(LabelError::parse(
            record,
            format!("expected {} fields, got {}", coords + 1, parts.len()),
        ));
    }

    let class = parts[0]
        .parse::<u8>()
        .ok()
        .and_then(ClassId::from_index)
        .ok_or_else(|| LabelError::parse(record, format!("unknown class '{}'", parts[0])))?;

    let values = parts[1..]
        .iter()
        .map(|p| match p.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(LabelError::parse(record, format!("invalid coordinate '{}'", p))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((class, values))
}

/// Format `class c1 c2 ...` with fixed decimals and a trailing newline.
pub(crate) fn push_line(out: &mut String, class: ClassId, values: &[f64]) {
    out.push_str(&class.index().to_string());
    for v in values {
        // Writing into a String cannot fail
        let _ = write!(out, " {:.*}", COORD_DECIMALS, v);
    }
    out.push('\n');
}

/// Iterate the non-blank lines of a label file with their zero-based
/// line numbers.
pub(crate) fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
}
