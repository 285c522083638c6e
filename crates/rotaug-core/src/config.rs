//! Augmentation options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::Transform;
use crate::labels::{validate_rect_transform, LabelError, LabelFormat};
use crate::pixels::DEFAULT_FILL;

/// Options shared by every batch run.
///
/// Missing fields in a JSON config fall back to [`AugmentOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentOptions {
    /// Angle increment in degrees; must divide 360.
    pub angle_step: u32,
    /// Format of the label files being augmented.
    pub label_format: LabelFormat,
    /// Border color (RGB) for arbitrary-angle image rotation.
    pub fill: [u8; 3],
    /// Emit mirrored variants alongside the plain ones.
    pub include_flips: bool,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        Self {
            angle_step: 90,
            label_format: LabelFormat::Obb,
            fill: DEFAULT_FILL,
            include_flips: true,
        }
    }
}

impl AugmentOptions {
    /// Read options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let text = std::fs::read_to_string(path).map_err(|e| LabelError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `0, s, 2s, ...` below 360.
    pub fn angles(&self) -> Result<Vec<u32>, LabelError> {
        let step = self.angle_step;
        if step == 0 || 360 % step != 0 {
            return Err(LabelError::Validation(format!(
                "angle step {} does not divide 360",
                step
            )));
        }
        Ok((0..360).step_by(step as usize).collect())
    }

    /// Every (angle, flip) variant to produce, angle-major.
    ///
    /// Fails before any file is touched if the label format cannot
    /// represent one of the angles.
    pub fn transforms(&self) -> Result<Vec<Transform>, LabelError> {
        let flips: &[bool] = if self.include_flips {
            &[false, true]
        } else {
            &[false]
        };

        let mut transforms = Vec::new();
        for angle in self.angles()? {
            for &flip in flips {
                let transform = Transform::new(angle, flip);
                if self.label_format == LabelFormat::Rect {
                    validate_rect_transform(transform)?;
                }
                transforms.push(transform);
            }
        }
        Ok(transforms)
    }
}
