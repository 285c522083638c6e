//! Oriented-box label text: `class x1 y1 x2 y2 x3 y3 x4 y4` per line,
//! coordinates normalized to the unit canvas.

use crate::geometry::{
    clip_to_canvas, direction, is_missing, rotate_quad_to_frame, Canvas, Quad, Transform,
};

use super::text::{parse_fields, push_line, records};
use super::types::{LabelError, LabelOutput, LabelRecord, RecordOutcome};

/// Parse one OBB line. `record` is only used in error messages.
pub fn parse_obb_line(line: &str, record: usize) -> Result<LabelRecord, LabelError> {
    let (class, v) = parse_fields(line, record, 8)?;
    let quad: Quad = [[v[0], v[1]], [v[2], v[3]], [v[4], v[5]], [v[6], v[7]]];
    Ok(LabelRecord {
        class,
        quad,
        direction: direction(&quad),
    })
}

/// Rotate, then drop or clip a single oriented box.
///
/// `canvas` is the source frame. Dropping and clipping happen against the
/// rotated frame, which has its sides swapped after a 90 or 270 degree turn.
pub fn transform_obb_record(
    record: &LabelRecord,
    transform: Transform,
    canvas: Canvas,
) -> RecordOutcome {
    let frame = canvas.after(transform);
    let mut quad = rotate_quad_to_frame(&record.quad, transform, canvas);

    if is_missing(&quad, frame) {
        return RecordOutcome::Dropped;
    }

    let coords = quad;
    match clip_to_canvas(&mut quad, frame) {
        Ok(()) => RecordOutcome::Kept(LabelRecord {
            class: record.class,
            quad,
            direction: direction(&quad),
        }),
        Err(error) => RecordOutcome::Skipped { coords, error },
    }
}

/// Transform a whole OBB label file held in memory.
///
/// Parse errors abort the file. Boxes that leave the frame are dropped and
/// boxes the clipper rejects are skipped; both are counted in the report
/// while the remaining lines keep their order.
pub fn transform_obb_text(text: &str, transform: Transform) -> Result<LabelOutput, LabelError> {
    let parsed = records(text)
        .map(|(i, line)| parse_obb_line(line, i).map(|r| (i, r)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = LabelOutput::default();
    for (i, record) in parsed {
        let outcome = transform_obb_record(&record, transform, Canvas::UNIT);
        if let RecordOutcome::Kept(kept) = &outcome {
            push_line(&mut output.contents, kept.class, kept.quad.as_flattened());
        }
        output.report.record(i, &outcome);
    }

    Ok(output)
}

/// Serialize records without transforming them.
pub fn write_obb_text(records: &[LabelRecord]) -> String {
    let mut out = String::new();
    for record in records {
        push_line(&mut out, record.class, record.quad.as_flattened());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryError;
    use crate::labels::types::ClassId;

    const SQUARE: &str =
        "0 0.1000000 0.1000000 0.9000000 0.1000000 0.9000000 0.9000000 0.1000000 0.9000000";

    fn values(line: &str) -> Vec<f64> {
        line.split_whitespace()
            .skip(1)
            .map(|v| v.parse().unwrap())
            .collect()
    }

    #[test]
    fn test_parse_obb_line() {
        let record = parse_obb_line(SQUARE, 0).unwrap();
        assert_eq!(record.class, ClassId::Contusion);
        assert_eq!(record.quad[2], [0.9, 0.9]);
        assert_eq!(record.direction, 0.0);
    }

    #[test]
    fn test_parse_obb_line_wrong_field_count() {
        assert!(parse_obb_line("0 0.1 0.1 0.9 0.1", 0).is_err());
    }

    #[test]
    fn test_square_quarter_turn_stays_inside() {
        let output = transform_obb_text(SQUARE, Transform::new(90, false)).unwrap();
        let line = output.contents.lines().next().unwrap();
        assert!(line.starts_with("0 "));
        for v in values(line) {
            assert!((0.0..=1.0).contains(&v), "{} out of range in {}", v, line);
        }
        assert_eq!(
            line,
            "0 0.9000000 0.1000000 0.9000000 0.9000000 0.1000000 0.9000000 0.1000000 0.1000000"
        );
        assert_eq!(output.report.written, 1);
    }

    #[test]
    fn test_identity_reproduces_input() {
        let output = transform_obb_text(SQUARE, Transform::IDENTITY).unwrap();
        assert_eq!(output.contents, format!("{}\n", SQUARE));
    }

    #[test]
    fn test_box_rotated_out_of_frame_is_dropped() {
        // Top-left corner box; a 45 degree turn swings it above the top edge
        let corner = "1 0.0100000 0.0100000 0.0500000 0.0100000 0.0500000 0.0500000 0.0100000 0.0500000";
        let center = "0 0.4000000 0.4000000 0.6000000 0.4000000 0.6000000 0.6000000 0.4000000 0.6000000";
        let text = format!("{}\n{}\n", corner, center);
        let output = transform_obb_text(&text, Transform::new(45, false)).unwrap();

        assert_eq!(output.report.dropped, 1);
        assert_eq!(output.report.written, 1);
        assert_eq!(output.contents.lines().count(), 1);
        assert!(output.contents.starts_with("0 "));
    }

    #[test]
    fn test_partially_outside_box_is_clipped() {
        let line = "3 0.4000000 0.1000000 0.9900000 0.1000000 0.9900000 0.3000000 0.4000000 0.3000000";
        let output = transform_obb_text(line, Transform::new(30, false)).unwrap();
        assert_eq!(output.report.written, 1);
        assert_eq!(
            output.contents,
            "3 0.6133975 0.1035898 1.0000000 0.3267949 0.9000000 0.5000000 0.5133975 0.2767949\n"
        );
    }

    #[test]
    fn test_unclippable_box_is_skipped_and_rest_kept() {
        // Long side runs along the top edge, above the canvas
        let bad = LabelRecord {
            class: ClassId::Crack,
            quad: [[0.2, -0.3], [0.8, -0.3], [0.8, 0.2], [0.2, 0.2]],
            direction: 0.0,
        };
        let outcome = transform_obb_record(&bad, Transform::IDENTITY, Canvas::UNIT);
        assert!(matches!(
            outcome,
            RecordOutcome::Skipped {
                error: GeometryError::Infeasible { vertex: 0, .. },
                ..
            }
        ));

        let text = format!("{}{}\n", write_obb_text(&[bad]), SQUARE);
        let output = transform_obb_text(&text, Transform::IDENTITY).unwrap();
        assert_eq!(output.report.skipped.len(), 1);
        assert_eq!(output.report.skipped[0].index, 0);
        assert_eq!(output.report.written, 1);
        assert_eq!(output.contents, format!("{}\n", SQUARE));
    }

    #[test]
    fn test_parse_error_aborts_file() {
        let text = format!("{}\n9 0.1 0.1 0.2 0.1 0.2 0.2 0.1 0.2\n", SQUARE);
        let err = transform_obb_text(&text, Transform::IDENTITY).unwrap_err();
        assert!(matches!(err, LabelError::Parse { record: 1, .. }));
    }

    #[test]
    fn test_direction_is_recomputed() {
        let record = parse_obb_line(SQUARE, 0).unwrap();
        match transform_obb_record(&record, Transform::new(90, false), Canvas::UNIT) {
            RecordOutcome::Kept(kept) => {
                assert!((kept.direction - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
