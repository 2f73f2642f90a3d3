use log::{info, warn};
use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::{CameraManager, INITIAL_CAMERA_DISTANCE},
    framing::{self, BoundingFrame},
    geometry::generate_cube,
};

use super::object::Object;

/// What the viewport currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneContent {
    /// Nothing; a model is on its way
    Empty,
    /// The stand-in cube
    Placeholder,
    /// A loaded, framed product model
    Model,
}

/// Viewer scene: the camera plus at most one product model or the placeholder
pub struct Scene {
    pub camera_manager: CameraManager,
    model: Option<Object>,
    placeholder: Object,
    content: SceneContent,
    bounding_frame: Option<BoundingFrame>,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        let placeholder = Object::new(vec![generate_cube().into_mesh()]).with_name("Placeholder");

        Self {
            camera_manager,
            model: None,
            placeholder,
            content: SceneContent::Empty,
            bounding_frame: None,
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    /// Uploads the placeholder. Must be called once a device exists.
    pub fn init_gpu_resources(&mut self, device: &Device, transform_layout: &wgpu::BindGroupLayout) {
        self.placeholder.init_gpu_resources(device, transform_layout);
    }

    /// Frames a freshly loaded model and makes it the visible content.
    ///
    /// Framing runs exactly once here, on the untouched transform. Models
    /// that cannot be framed are shown unscaled from the initial camera
    /// position and a warning is logged.
    pub fn show_model(
        &mut self,
        mut object: Object,
        device: &Device,
        transform_layout: &wgpu::BindGroupLayout,
    ) -> Option<BoundingFrame> {
        object.reset_transform();
        let camera = &mut self.camera_manager.camera;

        self.bounding_frame = match framing::frame(&mut object, camera) {
            Ok(bounding_frame) => {
                info!(
                    "Framed '{}': longest side {:.3}, scale {:.3}, camera distance {:.3}",
                    object.name,
                    bounding_frame.max_dimension,
                    bounding_frame.scale,
                    bounding_frame.camera_distance
                );
                Some(bounding_frame)
            }
            Err(e) => {
                warn!("Cannot frame '{}': {}; showing it unscaled", object.name, e);
                camera.frame_origin(INITIAL_CAMERA_DISTANCE);
                None
            }
        };

        object.init_gpu_resources(device, transform_layout);
        self.model = Some(object);
        self.content = SceneContent::Model;
        self.bounding_frame
    }

    /// Replaces any model with the placeholder cube
    pub fn show_placeholder(&mut self) {
        self.model = None;
        self.bounding_frame = None;
        self.content = SceneContent::Placeholder;
        self.camera_manager.camera.frame_origin(INITIAL_CAMERA_DISTANCE);
    }

    /// Drops the current model and shows nothing until the next one arrives
    pub fn clear(&mut self) {
        self.model = None;
        self.bounding_frame = None;
        self.content = SceneContent::Empty;
    }

    pub fn content(&self) -> SceneContent {
        self.content
    }

    pub fn bounding_frame(&self) -> Option<&BoundingFrame> {
        self.bounding_frame.as_ref()
    }

    pub fn model(&self) -> Option<&Object> {
        self.model.as_ref()
    }

    /// Objects the renderer should draw this frame
    pub fn visible_objects(&self) -> impl Iterator<Item = &Object> {
        let object = match self.content {
            SceneContent::Empty => None,
            SceneContent::Placeholder => Some(&self.placeholder),
            SceneContent::Model => self.model.as_ref(),
        };
        object.into_iter()
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let (total_vertices, total_triangles) = self
            .visible_objects()
            .map(|obj| (obj.vertex_count(), obj.triangle_count()))
            .fold((0, 0), |(v, t), (ov, ot)| (v + ov, t + ot));

        SceneStatistics {
            content: self.content,
            total_triangles,
            total_vertices,
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug)]
pub struct SceneStatistics {
    pub content: SceneContent,
    pub total_triangles: u32,
    pub total_vertices: usize,
}
