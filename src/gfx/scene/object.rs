use cgmath::{Deg, Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        resources::{
            material::{ObjectBindings, ObjectUBO, ObjectUniform},
            texture_resource::TextureResource,
        },
        scene::vertex::Vertex3D,
    },
    import::{ImportedMesh, MaterialDescription, MaterialTextures},
    simulation::spline::WaypointPath,
};

/// Path speed (segments per second) for objects that don't set their own
pub const DEFAULT_PATH_SPEED: f32 = 0.5;

/// Smallest uniform scale the scale command will produce
pub const MIN_SCALE: f32 = 0.1;

/// Rotation axes addressable by the rotate command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// GPU-side handles owned by one object. Dropping it releases them.
pub struct ObjectGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub uniform_buffer: ObjectUBO,
    pub bind_group: wgpu::BindGroup,
    pub vertex_count: u32,
}

/// A mesh placed in the world, optionally travelling along a waypoint loop
pub struct AnimatedObject {
    pub name: String,
    pub vertices: Vec<Vertex3D>,
    pub material: MaterialDescription,
    pub textures: MaterialTextures,
    pub position: Vector3<f32>,
    /// Euler angles in degrees, composed as Rz · Ry · Rx
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub path: WaypointPath,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl AnimatedObject {
    pub fn from_vertices(name: &str, vertices: Vec<Vertex3D>) -> Self {
        Self {
            name: name.to_string(),
            vertices,
            material: MaterialDescription::default(),
            textures: MaterialTextures::default(),
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            path: WaypointPath::new(Vec::new(), DEFAULT_PATH_SPEED),
            gpu_resources: None,
        }
    }

    pub fn from_imported(mesh: ImportedMesh) -> Self {
        let mut object = Self::from_vertices(&mesh.name, mesh.vertices);
        object.material = mesh.material;
        object.textures = mesh.textures;
        object
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// T · Rz · Ry · Rx · S
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_scale(self.scale)
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f32) {
        match axis {
            Axis::X => self.rotation.x += degrees,
            Axis::Y => self.rotation.y += degrees,
            Axis::Z => self.rotation.z += degrees,
        }
    }

    /// Adds `delta` to the uniform scale, never going below [`MIN_SCALE`]
    pub fn scale_by(&mut self, delta: f32) {
        self.scale = (self.scale + delta).max(MIN_SCALE);
    }

    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform::new(self.model_matrix(), &self.material)
    }

    /// Uploads the vertices and creates the object's uniform and bind group.
    ///
    /// `texture` is the diffuse map, or the white fallback.
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        bindings: &ObjectBindings,
        texture: &TextureResource,
    ) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = ObjectUBO::new_with_data(device, &self.uniform());
        let bind_group = bindings.create_bind_group(
            device,
            &uniform_buffer,
            texture,
            &format!("{} Bind Group", self.name),
        );

        self.gpu_resources = Some(ObjectGpuResources {
            vertex_buffer,
            uniform_buffer,
            bind_group,
            vertex_count: self.vertices.len() as u32,
        });
    }

    /// Writes the current transform and material to the GPU if resources exist
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources.uniform_buffer.update_content(queue, uniform);
        }
    }
}

pub trait DrawObject<'a> {
    fn draw_object(&mut self, object: &'a AnimatedObject);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_object(&mut self, object: &'b AnimatedObject) {
        let Some(resources) = &object.gpu_resources else {
            return;
        };
        if resources.vertex_count == 0 {
            return;
        }

        self.set_bind_group(1, &resources.bind_group, &[]);
        self.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
        self.draw(0..resources.vertex_count, 0..1);
    }
}
