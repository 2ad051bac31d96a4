//! Per-object uniform data: transform plus Phong material coefficients
//!
//! Bound to group 1 together with the object's diffuse texture.

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::{
    gfx::resources::texture_resource::TextureResource,
    import::MaterialDescription,
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// MUST match the `ObjectData` struct in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, applied to normals
    pub normal_matrix: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl ObjectUniform {
    pub fn new(model: Matrix4<f32>, material: &MaterialDescription) -> Self {
        let normal_matrix = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);

        Self {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            ambient: material.ambient.extend(1.0).into(),
            diffuse: material.diffuse.extend(1.0).into(),
            specular: material.specular.into(),
            shininess: material.shininess,
        }
    }
}

pub type ObjectUBO = UniformBuffer<ObjectUniform>;

/// Layout of bind group 1: object uniform, diffuse texture, sampler
pub struct ObjectBindings {
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[
                binding_types::rendering_entry(0, binding_types::uniform()),
                binding_types::fragment_entry(1, binding_types::texture_2d()),
                binding_types::fragment_entry(
                    2,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        Self { bind_group_layout }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        ubo: &ObjectUBO,
        texture: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }
}
