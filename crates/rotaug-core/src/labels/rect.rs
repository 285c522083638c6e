//! Axis-aligned label text: `class cx cy w h` per line, normalized.
//!
//! Only quarter turns keep an axis-aligned box axis-aligned, so any other
//! angle is rejected up front. Because the shape survives the rotation,
//! each corner is simply clamped to the unit canvas; a box is only dropped
//! when nothing of it is left after clamping.

use crate::geometry::{bounding_rect, rotate_quad, Canvas, Quad, Transform};

use super::text::{parse_fields, push_line, records};
use super::types::{LabelError, LabelOutput, LabelRecord, RecordOutcome};

/// Reject transforms this format cannot represent.
pub fn validate_rect_transform(transform: Transform) -> Result<(), LabelError> {
    if matches!(transform.angle, 0 | 90 | 180 | 270) {
        Ok(())
    } else {
        Err(LabelError::Validation(format!(
            "angle {} is not allowed for axis-aligned labels (use 0, 90, 180 or 270)",
            transform.angle
        )))
    }
}

/// Parse one rect line, expanding `(cx, cy, w, h)` to four corners
/// clockwise from the top-left.
pub fn parse_rect_line(line: &str, record: usize) -> Result<LabelRecord, LabelError> {
    let (class, v) = parse_fields(line, record, 4)?;
    let (cx, cy, w, h) = (v[0], v[1], v[2], v[3]);
    let (hw, hh) = (w / 2.0, h / 2.0);
    Ok(LabelRecord {
        class,
        quad: [
            [cx - hw, cy - hh],
            [cx + hw, cy - hh],
            [cx + hw, cy + hh],
            [cx - hw, cy + hh],
        ],
        direction: 0.0,
    })
}

/// `(cx, cy, w, h)` of the box's axis-aligned extent.
pub fn rect_params(quad: &Quad) -> [f64; 4] {
    let [[x1, y1], _, [x2, y2], _] = bounding_rect(quad).unwrap_or_default();
    [(x1 + x2) / 2.0, (y1 + y2) / 2.0, x2 - x1, y2 - y1]
}

/// Rotate one box and clamp it back into the unit canvas.
///
/// Boxes touching or covering the frame border are kept. Only a box whose
/// clamped extent has zero width or height is dropped.
pub fn transform_rect_record(record: &LabelRecord, transform: Transform) -> RecordOutcome {
    let rotated = rotate_quad(&record.quad, transform, Canvas::UNIT);
    let clamped = rotated.map(|[x, y]| [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)]);
    let quad = bounding_rect(&clamped).unwrap_or(clamped);

    let [_, _, w, h] = rect_params(&quad);
    if w <= 0.0 || h <= 0.0 {
        return RecordOutcome::Dropped;
    }

    RecordOutcome::Kept(LabelRecord {
        class: record.class,
        quad,
        direction: 0.0,
    })
}

/// Transform a whole rect label file held in memory.
pub fn transform_rect_text(text: &str, transform: Transform) -> Result<LabelOutput, LabelError> {
    validate_rect_transform(transform)?;

    let parsed = records(text)
        .map(|(i, line)| parse_rect_line(line, i).map(|r| (i, r)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = LabelOutput::default();
    for (i, record) in parsed {
        let outcome = transform_rect_record(&record, transform);
        if let RecordOutcome::Kept(kept) = &outcome {
            push_line(&mut output.contents, kept.class, &rect_params(&kept.quad));
        }
        output.report.record(i, &outcome);
    }

    Ok(output)
}
