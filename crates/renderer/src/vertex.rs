//! Vertex and per-draw instance layouts.

use bytemuck::{Pod, Zeroable};

/// A mesh vertex: position + normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// Per-draw instance data: model matrix plus material parameters.
///
/// Each draw of a material sub-range is one instance; the model matrix
/// is `global * part_local` for helicopter parts and identity for the
/// ground. Material travels here too, so one pipeline and one render
/// pass cover the whole scene.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    /// rgb = diffuse color, a unused.
    pub diffuse: [f32; 4],
    /// rgb = specular color, a = shininess.
    pub specular: [f32; 4],
}

impl InstanceData {
    pub fn new(model: glam::Mat4, diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            diffuse: [diffuse[0], diffuse[1], diffuse[2], 1.0],
            specular: [specular[0], specular[1], specular[2], shininess],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}
