//! Global uniform bindings for camera and lighting data
//!
//! Everything here is bound to group 0 and shared by every object drawn in
//! a frame.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::light::{LightingStrengths, PointLight},
    },
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Per-frame global data.
/// MUST match the `Globals` struct in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
    /// ambient, diffuse, specular, unused
    strengths: [f32; 4],
}

impl GlobalUBOContent {
    pub fn new(camera: &CameraUniform, light: &PointLight, strengths: &LightingStrengths) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_position: light.position.extend(1.0).into(),
            light_color: light.color.extend(1.0).into(),
            strengths: strengths.as_array(),
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes this frame's camera and light state into the global UBO
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: &CameraUniform,
    light: &PointLight,
    strengths: &LightingStrengths,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, light, strengths));
}

/// Bind group layout and bind group for slot 0
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[binding_types::rendering_entry(0, binding_types::uniform())],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

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
    use cgmath::Vector3;

    #[test]
    fn test_global_content_layout() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 128);

        let light = PointLight {
            position: Vector3::new(1.0, 2.0, 3.0),
            color: Vector3::new(0.5, 0.25, 1.0),
        };
        let strengths = LightingStrengths {
            ambient: 0.3,
            diffuse: 0.6,
            specular: 0.9,
        };
        let content = GlobalUBOContent::new(&CameraUniform::default(), &light, &strengths);
        assert_eq!(content.light_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(content.light_color, [0.5, 0.25, 1.0, 1.0]);
        assert_eq!(content.strengths, [0.3, 0.6, 0.9, 0.0]);
    }
}
