//! Model loading: glTF files become named parts with per-material draw
//! ranges. Parsing is the `gltf` crate's job; this module only reshapes
//! the document into what the scene pipeline draws.

use crate::mesh::{Mesh, MeshData};
use crate::vertex::Vertex;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to import model: {0}")]
    Import(#[from] gltf::Error),
    #[error("model contains no meshes")]
    Empty,
    #[error("mesh primitive has no position data")]
    MissingPositions,
}

/// One material's index span within a part mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialRange {
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    /// First index of this material's span.
    pub index_offset: u32,
    /// Number of indices in the span.
    pub index_count: u32,
}

/// A named sub-model on the CPU side: geometry plus material ranges.
#[derive(Debug, Clone)]
pub struct PartData {
    pub name: String,
    pub mesh: MeshData,
    pub materials: Vec<MaterialRange>,
}

/// A sub-model uploaded to the GPU.
pub struct Model {
    pub mesh: Mesh,
    pub materials: Vec<MaterialRange>,
}

impl PartData {
    pub fn upload(&self, device: &wgpu::Device) -> Model {
        Model {
            mesh: self.mesh.upload(device),
            materials: self.materials.clone(),
        }
    }
}

/// Load every mesh-bearing node of a glTF file as a named part.
///
/// Each primitive of a node's mesh becomes one [`MaterialRange`] over a
/// shared index buffer, so a part draws as a sequence of indexed spans.
pub fn load_parts(path: &Path) -> Result<Vec<PartData>, ModelError> {
    let (document, buffers, _images) = gltf::import(path)?;

    let mut parts = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else { continue };
        let name = node
            .name()
            .or_else(|| mesh.name())
            .unwrap_or_default()
            .to_owned();

        let mut data = MeshData::new();
        let mut materials = Vec::new();

        for primitive in mesh.primitives() {
            let reader =
                primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or(ModelError::MissingPositions)?
                .collect();
            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(iter) => iter.collect(),
                None => vec![[0.0, 1.0, 0.0]; positions.len()],
            };

            let base_vertex = data.vertices.len() as u32;
            for (position, normal) in positions.into_iter().zip(normals) {
                data.vertices.push(Vertex::new(position, normal));
            }

            let index_offset = data.indices.len() as u32;
            match reader.read_indices() {
                Some(indices) => {
                    data.indices
                        .extend(indices.into_u32().map(|i| i + base_vertex));
                }
                None => {
                    // non-indexed primitive: trivial index list
                    let count = data.vertices.len() as u32 - base_vertex;
                    data.indices.extend(base_vertex..base_vertex + count);
                }
            }
            let index_count = data.indices.len() as u32 - index_offset;

            materials.push(material_range(&primitive.material(), index_offset, index_count));
        }

        if !materials.is_empty() {
            log::debug!(
                "loaded part '{}': {} vertices, {} material ranges",
                name,
                data.vertices.len(),
                materials.len()
            );
            parts.push(PartData { name, mesh: data, materials });
        }
    }

    if parts.is_empty() {
        return Err(ModelError::Empty);
    }
    Ok(parts)
}

/// Map a glTF PBR material onto the Blinn-Phong parameters the shader
/// wants: metallic drives the specular color, roughness the shininess.
fn material_range(material: &gltf::Material, index_offset: u32, index_count: u32) -> MaterialRange {
    let pbr = material.pbr_metallic_roughness();
    let base = pbr.base_color_factor();
    let metallic = pbr.metallic_factor();
    let roughness = pbr.roughness_factor();
    MaterialRange {
        diffuse: [base[0], base[1], base[2]],
        specular: [metallic; 3],
        shininess: 4.0 + (1.0 - roughness) * 124.0,
        index_offset,
        index_count,
    }
}
