//! Model analysis record produced by the STL analyzer and consumed by the
//! quote estimator.
//!
//! A [`ModelAnalysis`] is created once per successfully parsed upload and is
//! never mutated afterwards. When no geometry is available the caller uses
//! [`ModelAnalysis::fallback`] instead.

use serde::{Deserialize, Serialize};

/// Triangle-count thresholds separating the complexity classes.
const MEDIUM_ABOVE: u32 = 5_000;
const COMPLEX_ABOVE: u32 = 10_000;

/// A 3-component f64 vector in model units (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn zero() -> Self {
        Vec3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

/// Axis-aligned bounding box of every mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Extent along X in millimetres.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y in millimetres.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Extent along Z in millimetres.
    pub fn depth(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// Human-readable `W × H × D mm` string with one decimal per axis.
    pub fn dimensions_label(&self) -> String {
        format!(
            "{:.1} × {:.1} × {:.1} mm",
            self.width(),
            self.height(),
            self.depth()
        )
    }
}

/// Coarse mesh complexity derived solely from the triangle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// Classify a mesh: more than 10 000 triangles is complex, more than
    /// 5 000 is medium, anything else is simple.
    pub fn from_triangle_count(count: u32) -> Self {
        if count > COMPLEX_ABOVE {
            Complexity::Complex
        } else if count > MEDIUM_ABOVE {
            Complexity::Medium
        } else {
            Complexity::Simple
        }
    }

    /// Label shown on the Romanian quote page.
    pub fn label_ro(&self) -> &'static str {
        match self {
            Complexity::Simple => "Simplă",
            Complexity::Medium => "Medie",
            Complexity::Complex => "Complexă",
        }
    }
}

/// Geometric summary of an uploaded model.
///
/// `volume_cm3` is an approximation; see
/// [`VolumeMethod`](super::stl::VolumeMethod) for how it was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAnalysis {
    pub triangle_count: u32,
    pub bounding_box: BoundingBox,
    pub volume_cm3: f64,
    pub surface_area_cm2: f64,
    pub complexity: Complexity,
}

impl ModelAnalysis {
    /// Volume assumed when no file has been analyzed.
    pub const FALLBACK_VOLUME_CM3: f64 = 15.0;
    /// Surface area assumed when no file has been analyzed.
    pub const FALLBACK_SURFACE_AREA_CM2: f64 = 100.0;

    /// Placeholder geometry used when the upload is missing, is not an STL,
    /// or could not be parsed. Quotes are still produced from it.
    pub fn fallback() -> Self {
        Self {
            triangle_count: 0,
            bounding_box: BoundingBox::default(),
            volume_cm3: Self::FALLBACK_VOLUME_CM3,
            surface_area_cm2: Self::FALLBACK_SURFACE_AREA_CM2,
            complexity: Complexity::Simple,
        }
    }

    /// False when any coordinate, the volume or the area is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        let BoundingBox { min, max } = self.bounding_box;
        [min.x, min.y, min.z, max.x, max.y, max.z, self.volume_cm3, self.surface_area_cm2]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_thresholds_are_strict() {
        assert_eq!(Complexity::from_triangle_count(0), Complexity::Simple);
        assert_eq!(Complexity::from_triangle_count(5_000), Complexity::Simple);
        assert_eq!(Complexity::from_triangle_count(5_001), Complexity::Medium);
        assert_eq!(Complexity::from_triangle_count(10_000), Complexity::Medium);
        assert_eq!(Complexity::from_triangle_count(10_001), Complexity::Complex);
    }

    #[test]
    fn fallback_is_finite_and_nan_area_is_not() {
        assert!(ModelAnalysis::fallback().is_finite());
        let broken = ModelAnalysis {
            surface_area_cm2: f64::NAN,
            ..ModelAnalysis::fallback()
        };
        assert!(!broken.is_finite());
    }

    #[test]
    fn complexity_romanian_labels() {
        assert_eq!(Complexity::Simple.label_ro(), "Simplă");
        assert_eq!(Complexity::Medium.label_ro(), "Medie");
        assert_eq!(Complexity::Complex.label_ro(), "Complexă");
    }

    #[test]
    fn bounding_box_extents() {
        let bb = BoundingBox {
            min: Vec3 {
                x: -5.0,
                y: 0.0,
                z: 2.0,
            },
            max: Vec3 {
                x: 15.0,
                y: 8.0,
                z: 5.0,
            },
        };
        assert_eq!(bb.width(), 20.0);
        assert_eq!(bb.height(), 8.0);
        assert_eq!(bb.depth(), 3.0);
        assert_eq!(bb.dimensions_label(), "20.0 × 8.0 × 3.0 mm");
    }

    #[test]
    fn fallback_uses_placeholder_volume_and_area() {
        let m = ModelAnalysis::fallback();
        assert_eq!(m.volume_cm3, 15.0);
        assert_eq!(m.surface_area_cm2, 100.0);
        assert_eq!(m.triangle_count, 0);
        assert_eq!(m.complexity, Complexity::Simple);
    }

    #[test]
    fn model_analysis_serializes_camel_case() {
        let value = serde_json::to_value(ModelAnalysis::fallback()).expect("to_value");
        assert!(value.get("triangleCount").is_some());
        assert!(value.get("boundingBox").is_some());
        assert!(value.get("volumeCm3").is_some());
        assert!(value.get("surfaceAreaCm2").is_some());
        assert_eq!(value["complexity"], "simple");
    }
}
