//! Global uniform bindings for camera and scene data
//!
//! One uniform buffer at group 0 carries the camera and the fixed light rig
//! shared by every draw call.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{uniform_bind_group, uniform_layout, UniformBuffer},
};

/// Global uniform buffer content.
/// MUST match the `Globals` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    /// rgb = color, w = intensity
    ambient: [f32; 4],
    /// xyz = position, w = intensity
    spot_position: [f32; 4],
    /// xyz = direction, w = unused
    spot_direction: [f32; 4],
    /// x = cos(inner angle), y = cos(outer angle)
    spot_cone: [f32; 4],
    /// xyz = position, w = intensity
    point_position: [f32; 4],
}
// 16 + 64 + 5 * 16 = 160 bytes

/// Fixed lighting: soft ambient fill, a key spot light and a back point light
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightRig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub spot_position: [f32; 3],
    pub spot_intensity: f32,
    /// Half-angle of the full-intensity cone, radians
    pub spot_inner_angle: f32,
    /// Half-angle where the spot fades to zero, radians
    pub spot_outer_angle: f32,
    pub point_position: [f32; 3],
    pub point_intensity: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
            spot_position: [10.0, 10.0, 10.0],
            spot_intensity: 1.0,
            spot_inner_angle: 0.0,
            spot_outer_angle: 0.15,
            point_position: [-10.0, -10.0, -10.0],
            point_intensity: 0.6,
        }
    }
}

impl LightRig {
    /// Packs camera and lights into the GPU layout. The spot always aims at the origin.
    pub fn to_content(&self, camera: CameraUniform) -> GlobalUBOContent {
        let [x, y, z] = self.spot_position;
        let length = (x * x + y * y + z * z).sqrt().max(f32::EPSILON);
        let spot_direction = [-x / length, -y / length, -z / length, 0.0];

        GlobalUBOContent {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: with_w(self.ambient_color, self.ambient_intensity),
            spot_position: with_w(self.spot_position, self.spot_intensity),
            spot_direction,
            spot_cone: [
                self.spot_inner_angle.cos(),
                self.spot_outer_angle.cos(),
                0.0,
                0.0,
            ],
            point_position: with_w(self.point_position, self.point_intensity),
        }
    }
}

fn with_w(xyz: [f32; 3], w: f32) -> [f32; 4] {
    [xyz[0], xyz[1], xyz[2], w]
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes camera and light data to the global uniform buffer
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &LightRig,
) {
    ubo.update_content(queue, lights.to_content(camera));
}

/// Layout and bind group for group 0
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = uniform_layout(
            device,
            "Globals Bind Group Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let bind_group = uniform_bind_group(
            device,
            "Global Bind Group",
            &bind_group_layout,
            ubo.binding_resource(),
        );

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_content_size_matches_shader() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 160);
    }

    #[test]
    fn test_default_rig_positions() {
        let rig = LightRig::default();
        let content = rig.to_content(CameraUniform::default());

        assert_eq!(content.spot_position, [10.0, 10.0, 10.0, 1.0]);
        assert_eq!(content.point_position, [-10.0, -10.0, -10.0, 0.6]);
        assert_eq!(content.ambient[3], 0.5);
    }

    #[test]
    fn test_spot_aims_at_origin() {
        let content = LightRig::default().to_content(CameraUniform::default());
        let d = content.spot_direction;
        let expected = -1.0 / 3.0_f32.sqrt();

        assert_relative_eq!(d[0], expected, epsilon = 1e-6);
        assert_relative_eq!(d[1], expected, epsilon = 1e-6);
        assert_relative_eq!(d[2], expected, epsilon = 1e-6);
        // Inner cone is narrower, so its cosine is larger
        assert!(content.spot_cone[0] > content.spot_cone[1]);
    }
}
