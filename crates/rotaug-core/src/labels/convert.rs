//! Conversion from pixel-space annotation documents to normalized YOLO
//! label text.

use crate::geometry::bounding_rect;

use super::annotation::{shape_record, AnnotationDocument};
use super::rect::rect_params;
use super::text::push_line;
use super::types::{ClassId, LabelError};

/// One OBB line per shape: the four points divided by the image size.
pub fn annotation_to_obb_text(doc: &AnnotationDocument) -> Result<String, LabelError> {
    let (w, h) = (doc.image_width as f64, doc.image_height as f64);
    let mut out = String::new();
    for (i, shape) in doc.shapes.iter().enumerate() {
        let record = shape_record(shape, i)?;
        let normalized = record.quad.map(|[x, y]| [x / w, y / h]);
        push_line(&mut out, record.class, normalized.as_flattened());
    }
    Ok(out)
}

/// One rect line per shape: `cx cy w h` of the normalized point extent.
///
/// Any number of points is accepted; the axis-aligned extent is used.
pub fn annotation_to_rect_text(doc: &AnnotationDocument) -> Result<String, LabelError> {
    let (w, h) = (doc.image_width as f64, doc.image_height as f64);
    let mut out = String::new();
    for (i, shape) in doc.shapes.iter().enumerate() {
        let class = ClassId::from_name(&shape.label)
            .ok_or_else(|| LabelError::parse(i, format!("unknown label '{}'", shape.label)))?;
        let normalized: Vec<_> = shape.points.iter().map(|[x, y]| [x / w, y / h]).collect();
        let quad = bounding_rect(&normalized)
            .ok_or_else(|| LabelError::parse(i, "shape has no points"))?;
        push_line(&mut out, class, &rect_params(&quad));
    }
    Ok(out)
}
