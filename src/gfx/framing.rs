//! # Model Framing
//!
//! Fits an arbitrary model into a canonical view: the model is centered on
//! the origin, uniformly scaled so its longest side spans
//! [`CANONICAL_SPAN`] units, and the camera is pulled back along +Z.
//!
//! Framing reads the object's untransformed geometry and *sets* its model
//! matrix, so applying it twice to the same object gives the same result.
//! It must still run exactly once per finished model load, before anything
//! else touches the transform.

use cgmath::{Matrix4, Vector3};
use thiserror::Error;

use crate::gfx::{camera::OrbitCamera, scene::Object};

/// Length the longest side of a framed model is scaled to
pub const CANONICAL_SPAN: f32 = 2.0;

/// Camera distance as a multiple of the model's unscaled longest side
pub const CAMERA_DISTANCE_FACTOR: f32 = 2.5;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Box enclosing all points, `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = [f32; 3]>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = Vector3::from(points.next()?);

        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Vector3::new(min.x.min(p[0]), min.y.min(p[1]), min.z.min(p[2])),
                Vector3::new(max.x.max(p[0]), max.y.max(p[1]), max.z.max(p[2])),
            )
        });

        Some(Self::new(min, max))
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Longest side
    pub fn max_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FramingError {
    #[error("model has no vertices")]
    EmptyGeometry,

    /// Zero-volume or non-finite extent; `2 / max_dimension` is undefined
    #[error("model bounds are degenerate (longest side {max_dimension})")]
    DegenerateBounds { max_dimension: f32 },
}

/// Scale, translation and camera distance that fit one model into view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingFrame {
    pub scale: f32,
    /// Applied before scaling; moves the geometric center to the origin
    pub translation: Vector3<f32>,
    pub camera_distance: f32,
    pub center: Vector3<f32>,
    pub max_dimension: f32,
}

impl BoundingFrame {
    /// Computes the frame for a bounding box.
    ///
    /// # Errors
    /// [`FramingError::DegenerateBounds`] when the longest side is zero or
    /// not finite.
    pub fn from_bounds(bounds: &BoundingBox) -> Result<Self, FramingError> {
        let max_dimension = bounds.max_dimension();
        let center = bounds.center();

        if !max_dimension.is_finite() || max_dimension <= 0.0 || !center.x.is_finite()
            || !center.y.is_finite() || !center.z.is_finite()
        {
            return Err(FramingError::DegenerateBounds { max_dimension });
        }

        Ok(Self {
            scale: CANONICAL_SPAN / max_dimension,
            translation: -center,
            camera_distance: max_dimension * CAMERA_DISTANCE_FACTOR,
            center,
            max_dimension,
        })
    }

    /// Model matrix: translate to the origin first, then scale uniformly
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_scale(self.scale) * Matrix4::from_translation(self.translation)
    }

    /// Where the camera eye goes
    pub fn camera_position(&self) -> Vector3<f32> {
        Vector3::new(0.0, 0.0, self.camera_distance)
    }
}

/// Frames `object` and points `camera` at it.
///
/// On error neither the object nor the camera is modified.
pub fn frame(object: &mut Object, camera: &mut OrbitCamera) -> Result<BoundingFrame, FramingError> {
    let bounds = object.local_bounds().ok_or(FramingError::EmptyGeometry)?;
    let bounding_frame = BoundingFrame::from_bounds(&bounds)?;

    object.transform = bounding_frame.transform();

    // The center is at the origin after translation, so look there
    camera.frame_origin(bounding_frame.camera_distance);

    Ok(bounding_frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::object::Mesh;
    use approx::assert_relative_eq;
    use cgmath::{Vector4, Zero};

    fn box_object(min: [f32; 3], max: [f32; 3]) -> Object {
        let positions = vec![min, max, [min[0], max[1], min[2]]];
        Object::new(vec![Mesh::new(positions, Vec::new(), vec![0, 1, 2])])
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::new(5.0, 0.3, 0.2, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_four_two_one_box() {
        let bounds = BoundingBox::new(Vector3::zero(), Vector3::new(4.0, 2.0, 1.0));
        let frame = BoundingFrame::from_bounds(&bounds).unwrap();

        assert_relative_eq!(frame.max_dimension, 4.0);
        assert_relative_eq!(frame.scale, 0.5);
        assert_relative_eq!(frame.camera_distance, 10.0);
        assert_eq!(frame.translation, Vector3::new(-2.0, -1.0, -0.5));
    }

    #[test]
    fn test_frame_centers_and_scales_object() {
        let mut object = box_object([1.0, 1.0, 1.0], [5.0, 3.0, 2.0]);
        let mut camera = camera();

        let frame = frame(&mut object, &mut camera).unwrap();

        let corner_min = object.transform * Vector4::new(1.0, 1.0, 1.0, 1.0);
        let corner_max = object.transform * Vector4::new(5.0, 3.0, 2.0, 1.0);
        assert_relative_eq!(corner_min.x, -1.0);
        assert_relative_eq!(corner_max.x, 1.0);
        assert_relative_eq!(corner_min.y, -0.5);
        assert_relative_eq!(corner_max.z, 0.25);

        assert_relative_eq!(camera.eye.x, 0.0);
        assert_relative_eq!(camera.eye.y, 0.0);
        assert_relative_eq!(camera.eye.z, 10.0);
        assert_eq!(frame.camera_position(), camera.eye);
        assert!(camera.is_projection_dirty());
    }

    #[test]
    fn test_frame_is_idempotent() {
        let mut object = box_object([-3.0, 0.0, 2.0], [1.0, 8.0, 4.0]);
        let mut camera = camera();

        let first = frame(&mut object, &mut camera).unwrap();
        let transform = object.transform;
        let second = frame(&mut object, &mut camera).unwrap();

        assert_eq!(first, second);
        assert_eq!(object.transform, transform);
    }

    #[test]
    fn test_degenerate_bounds_are_rejected() {
        let mut object = box_object([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        let mut camera = camera();
        let eye_before = camera.eye;

        let result = frame(&mut object, &mut camera);

        assert_eq!(
            result,
            Err(FramingError::DegenerateBounds { max_dimension: 0.0 })
        );
        assert_eq!(camera.eye, eye_before);
        assert_eq!(object.transform, Matrix4::from_scale(1.0));
    }

    #[test]
    fn test_flat_model_still_frames() {
        // A plane has zero thickness on one axis but a usable longest side
        let bounds = BoundingBox::new(Vector3::zero(), Vector3::new(2.0, 0.0, 1.0));
        let frame = BoundingFrame::from_bounds(&bounds).unwrap();
        assert_relative_eq!(frame.scale, 1.0);
    }

    #[test]
    fn test_non_finite_bounds_are_rejected() {
        let bounds = BoundingBox::new(Vector3::zero(), Vector3::new(f32::INFINITY, 1.0, 1.0));
        assert!(matches!(
            BoundingFrame::from_bounds(&bounds),
            Err(FramingError::DegenerateBounds { .. })
        ));
    }

    #[test]
    fn test_empty_object() {
        let mut object = Object::new(Vec::new());
        assert_eq!(
            frame(&mut object, &mut camera()),
            Err(FramingError::EmptyGeometry)
        );
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds =
            BoundingBox::from_points([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]])
                .unwrap();
        assert_eq!(bounds.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(bounds.center(), Vector3::zero());
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }
}
