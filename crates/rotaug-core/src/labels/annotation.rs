//! Polygon annotation documents (LabelMe-style JSON) in pixel space.
//!
//! Only the fields this crate reads or writes are typed; every other key
//! of the document and of each shape is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::{
    bounding_rect, clip_to_canvas, direction, min_area_rect, Canvas, Point, Quad, Transform,
};

use super::obb::transform_obb_record;
use super::types::{ClassId, FileReport, LabelError, LabelRecord, RecordOutcome, SkippedRecord};

/// One labelled shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationShape {
    pub label: String,
    pub points: Vec<Point>,
    #[serde(default = "default_shape_type")]
    pub shape_type: String,
    /// Radians in `[0, 2*pi)`, written for oriented shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_shape_type() -> String {
    "polygon".to_string()
}

/// A whole annotation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDocument {
    pub shapes: Vec<AnnotationShape>,
    pub image_path: String,
    pub image_height: u32,
    pub image_width: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationDocument {
    pub fn from_json(text: &str) -> Result<Self, LabelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, LabelError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    /// The pixel canvas shapes are clipped into.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.image_width as f64, self.image_height as f64)
    }
}

/// Target shape kind for [`normalize_annotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Minimum-area oriented rectangle with a direction.
    Rotation,
    /// Axis-aligned rectangle.
    Rectangle,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rotation => "rotation",
            ShapeKind::Rectangle => "rectangle",
        }
    }
}

impl std::str::FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rotation" => Ok(ShapeKind::Rotation),
            "rectangle" => Ok(ShapeKind::Rectangle),
            other => Err(format!("unknown shape kind '{}'", other)),
        }
    }
}

/// Result of rewriting a document in memory.
#[derive(Debug, Clone)]
pub struct AnnotationOutput {
    pub document: AnnotationDocument,
    pub report: FileReport,
    /// True if any shape or the image reference changed.
    pub modified: bool,
}

/// Read the class and four corners of a shape.
pub fn shape_record(shape: &AnnotationShape, index: usize) -> Result<LabelRecord, LabelError> {
    let class = ClassId::from_name(&shape.label)
        .ok_or_else(|| LabelError::parse(index, format!("unknown label '{}'", shape.label)))?;

    let quad: Quad = shape.points.as_slice().try_into().map_err(|_| {
        LabelError::parse(
            index,
            format!("expected 4 points, got {}", shape.points.len()),
        )
    })?;

    if quad.as_flattened().iter().any(|v| !v.is_finite()) {
        return Err(LabelError::parse(index, "non-finite coordinate"));
    }

    Ok(LabelRecord {
        class,
        quad,
        direction: shape.direction.unwrap_or_else(|| direction(&quad)),
    })
}

/// Rotate every shape of a document in pixel space.
///
/// Shapes are expressed in the frame of the rotated image, so a 90 or 270
/// degree turn also swaps `imageWidth` and `imageHeight`. Shapes whose four
/// corners all leave the frame are dropped and shapes the clipper rejects
/// are skipped; both are removed from the output document. When
/// `image_path` is given it replaces the document's image reference.
pub fn transform_annotation(
    doc: &AnnotationDocument,
    transform: Transform,
    image_path: Option<&str>,
) -> Result<AnnotationOutput, LabelError> {
    let canvas = doc.canvas();
    let records = doc
        .shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| shape_record(shape, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut document = doc.clone();
    document.shapes.clear();
    let mut report = FileReport::default();
    let mut modified = false;

    if transform.swaps_axes() && doc.image_width != doc.image_height {
        document.image_width = doc.image_height;
        document.image_height = doc.image_width;
        modified = true;
    }

    for (i, (shape, record)) in doc.shapes.iter().zip(&records).enumerate() {
        let outcome = transform_obb_record(record, transform, canvas);
        report.record(i, &outcome);

        match outcome {
            RecordOutcome::Kept(kept) => {
                let mut shape = shape.clone();
                let points = kept.quad.to_vec();
                if shape.points != points || shape.direction != Some(kept.direction) {
                    modified = true;
                }
                shape.points = points;
                shape.direction = Some(kept.direction);
                document.shapes.push(shape);
            }
            RecordOutcome::Dropped | RecordOutcome::Skipped { .. } => modified = true,
        }
    }

    if let Some(path) = image_path {
        if document.image_path != path {
            document.image_path = path.to_string();
            modified = true;
        }
    }

    Ok(AnnotationOutput {
        document,
        report,
        modified,
    })
}

/// Convert shapes to `target` in place.
///
/// Shapes already of the target kind are left alone unless `force` is set.
/// A shape whose points cannot be turned into a valid box keeps its
/// original form and is listed in the report.
pub fn normalize_annotation(
    doc: &AnnotationDocument,
    target: ShapeKind,
    force: bool,
) -> AnnotationOutput {
    let canvas = doc.canvas();
    let mut document = doc.clone();
    let mut report = FileReport::default();
    let mut modified = false;

    for (i, shape) in document.shapes.iter_mut().enumerate() {
        if !force && shape.shape_type == target.as_str() {
            continue;
        }

        match target {
            ShapeKind::Rotation => {
                let fitted = min_area_rect(&shape.points).and_then(|mut quad| {
                    clip_to_canvas(&mut quad, canvas).map(|()| quad)
                });
                match fitted {
                    Ok(quad) => {
                        shape.points = quad.to_vec();
                        shape.direction = Some(direction(&quad));
                    }
                    Err(error) => {
                        let coords = bounding_rect(&shape.points).unwrap_or_default();
                        report.skipped.push(SkippedRecord {
                            index: i,
                            coords,
                            error,
                        });
                        continue;
                    }
                }
            }
            ShapeKind::Rectangle => {
                let Some(quad) = bounding_rect(&shape.points) else {
                    continue;
                };
                shape.points = quad
                    .map(|[x, y]| [x.clamp(0.0, canvas.width), y.clamp(0.0, canvas.height)])
                    .to_vec();
            }
        }

        shape.shape_type = target.as_str().to_string();
        report.written += 1;
        modified = true;
    }

    report.unchanged = !modified;
    AnnotationOutput {
        document,
        report,
        modified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> AnnotationDocument {
        let value = json!({
            "version": "5.2.1",
            "flags": {},
            "shapes": [
                {
                    "label": "crack",
                    "points": [[100.0, 100.0], [300.0, 100.0], [300.0, 150.0], [100.0, 150.0]],
                    "group_id": null,
                    "shape_type": "rotation",
                    "flags": {}
                },
                {
                    "label": "spot",
                    "points": [[250.0, 130.0], [290.0, 130.0], [290.0, 160.0], [250.0, 160.0]],
                    "group_id": null,
                    "shape_type": "rotation",
                    "flags": {}
                }
            ],
            "imagePath": "part_01.png",
            "imageData": null,
            "imageHeight": 300,
            "imageWidth": 400
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_shape_kind_from_str() {
        assert_eq!("rotation".parse::<ShapeKind>(), Ok(ShapeKind::Rotation));
        assert_eq!("rectangle".parse::<ShapeKind>(), Ok(ShapeKind::Rectangle));
        assert!("polygon".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let doc = sample_document();
        let text = doc.to_json().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], "5.2.1");
        assert_eq!(value["imageData"], Value::Null);
        assert_eq!(value["imageWidth"], 400);
        assert_eq!(value["shapes"][0]["group_id"], Value::Null);
        assert_eq!(value["shapes"][0]["flags"], json!({}));
        assert!(value["shapes"][0].get("direction").is_none());
    }

    #[test]
    fn test_quarter_turn_in_pixel_space() {
        let doc = sample_document();
        let out = transform_annotation(&doc, Transform::new(90, false), Some("part_01_0090.png")).unwrap();

        assert!(out.modified);
        assert_eq!(out.document.image_path, "part_01_0090.png");
        assert_eq!((out.document.image_width, out.document.image_height), (300, 400));
        assert_eq!(out.document.shapes.len(), 2);
        let canvas = out.document.canvas();
        for shape in &out.document.shapes {
            for p in &shape.points {
                assert!(canvas.contains(*p), "{:?} outside {:?}", p, canvas);
            }
            let d = shape.direction.unwrap();
            assert!((0.0..std::f64::consts::TAU).contains(&d));
        }
        assert_eq!(out.document.shapes[0].label, "crack");
        assert_eq!(out.document.extra["version"], "5.2.1");
    }

    #[test]
    fn test_quarter_turns_follow_rotated_image() {
        use crate::pixels::rotate_image;
        use image::{DynamicImage, Rgb, RgbImage};

        let mut pixels = RgbImage::new(100, 80);
        pixels.put_pixel(20, 10, Rgb([255, 255, 255]));
        let image = DynamicImage::ImageRgb8(pixels);

        let mut doc = sample_document();
        doc.image_width = 100;
        doc.image_height = 80;
        doc.shapes.truncate(1);
        doc.shapes[0].points = vec![[20.5, 10.5], [30.0, 10.5], [30.0, 20.0], [20.5, 20.0]];

        for angle in [90, 270] {
            let transform = Transform::new(angle, false);
            let rotated = rotate_image(&image, transform, [114, 114, 0]).to_rgb8();
            let out = transform_annotation(&doc, transform, None).unwrap();

            assert_eq!(
                (out.document.image_width, out.document.image_height),
                rotated.dimensions()
            );
            assert_eq!(out.report.written, 1);

            // The first corner sits on the marker pixel's center in both
            let (mx, my) = rotated
                .enumerate_pixels()
                .find(|(_, _, p)| p.0 == [255, 255, 255])
                .map(|(x, y, _)| (x, y))
                .unwrap();
            let [px, py] = out.document.shapes[0].points[0];
            assert!(
                (px - (mx as f64 + 0.5)).abs() < 1e-9 && (py - (my as f64 + 0.5)).abs() < 1e-9,
                "angle {}: point {:?}, marker ({}, {})",
                angle,
                [px, py],
                mx,
                my
            );
        }
    }

    #[test]
    fn test_square_quarter_turn_keeps_dimensions() {
        let mut doc = sample_document();
        doc.image_width = 300;
        doc.image_height = 300;
        let out = transform_annotation(&doc, Transform::new(270, true), None).unwrap();
        assert_eq!((out.document.image_width, out.document.image_height), (300, 300));
    }

    #[test]
    fn test_shape_leaving_frame_is_dropped() {
        let mut doc = sample_document();
        doc.shapes[0].points = vec![[2.0, 2.0], [10.0, 2.0], [10.0, 10.0], [2.0, 10.0]];
        let out = transform_annotation(&doc, Transform::new(45, false), None).unwrap();

        assert!(out.modified);
        assert_eq!(out.report.dropped, 1);
        assert!(out.report.skipped.is_empty());
        assert_eq!(out.document.shapes.len(), 1);
        assert_eq!(out.document.shapes[0].label, "spot");
    }

    #[test]
    fn test_identity_without_rename_is_unmodified_once_directed() {
        let doc = sample_document();
        let first = transform_annotation(&doc, Transform::IDENTITY, None).unwrap();
        // Adding the direction field counts as a modification
        assert!(first.modified);

        let second = transform_annotation(&first.document, Transform::IDENTITY, None).unwrap();
        assert!(!second.modified);
        assert_eq!(second.document, first.document);
    }

    #[test]
    fn test_unknown_label_is_parse_error() {
        let mut doc = sample_document();
        doc.shapes[1].label = "dent".to_string();
        let err = transform_annotation(&doc, Transform::IDENTITY, None).unwrap_err();
        assert!(matches!(err, LabelError::Parse { record: 1, .. }));
    }

    #[test]
    fn test_wrong_point_count_is_parse_error() {
        let mut doc = sample_document();
        doc.shapes[0].points.pop();
        let err = transform_annotation(&doc, Transform::IDENTITY, None).unwrap_err();
        assert!(matches!(err, LabelError::Parse { record: 0, .. }));
    }

    #[test]
    fn test_unclippable_shape_is_removed() {
        let mut doc = sample_document();
        doc.shapes[0].points = vec![[100.0, -50.0], [300.0, -50.0], [300.0, 20.0], [100.0, 20.0]];
        let out = transform_annotation(&doc, Transform::IDENTITY, None).unwrap();
        assert_eq!(out.report.skipped.len(), 1);
        assert_eq!(out.report.written, 1);
        assert_eq!(out.document.shapes.len(), 1);
        assert_eq!(out.document.shapes[0].label, "spot");
    }

    #[test]
    fn test_normalize_polygon_to_rotation() {
        let mut doc = sample_document();
        doc.shapes[0].shape_type = "polygon".to_string();
        doc.shapes[0].points = vec![[100.0, 100.0], [200.0, 50.0], [250.0, 150.0], [150.0, 200.0], [160.0, 120.0]];

        let out = normalize_annotation(&doc, ShapeKind::Rotation, false);
        assert!(out.modified);
        assert_eq!(out.report.written, 1);
        let shape = &out.document.shapes[0];
        assert_eq!(shape.shape_type, "rotation");
        assert_eq!(shape.points.len(), 4);
        assert!(shape.direction.is_some());
        // The second shape was already a rotation and is untouched
        assert_eq!(out.document.shapes[1], doc.shapes[1]);
    }

    #[test]
    fn test_normalize_without_changes_reports_unchanged() {
        let doc = sample_document();
        let out = normalize_annotation(&doc, ShapeKind::Rotation, false);
        assert!(!out.modified);
        assert!(out.report.unchanged);
        assert_eq!(out.document, doc);
    }

    #[test]
    fn test_normalize_to_rectangle_clamps() {
        let mut doc = sample_document();
        doc.shapes[0].points = vec![[-10.0, 20.0], [50.0, 5.0], [420.0, 60.0], [30.0, 80.0]];
        let out = normalize_annotation(&doc, ShapeKind::Rectangle, false);
        assert_eq!(
            out.document.shapes[0].points,
            vec![[0.0, 5.0], [400.0, 5.0], [400.0, 80.0], [0.0, 80.0]]
        );
        assert_eq!(out.document.shapes[0].shape_type, "rectangle");
        assert_eq!(out.report.written, 2);
    }

    #[test]
    fn test_normalize_collinear_shape_is_skipped() {
        let mut doc = sample_document();
        doc.shapes[0].shape_type = "polygon".to_string();
        doc.shapes[0].points = vec![[10.0, 10.0], [20.0, 20.0], [30.0, 30.0]];
        let out = normalize_annotation(&doc, ShapeKind::Rotation, false);
        assert_eq!(out.report.skipped.len(), 1);
        assert_eq!(out.document.shapes[0].shape_type, "polygon");
    }
}
