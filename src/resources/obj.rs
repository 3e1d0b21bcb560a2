//! OBJ + MTL import.
//!
//! The material library is read first and handed to the OBJ parser, so
//! `usemtl` names resolve against it even when the OBJ file carries no
//! `mtllib` line (or points somewhere else).

use std::{
    collections::HashMap,
    io::{BufReader, Cursor},
};

use cgmath::{InnerSpace, Vector3};

use crate::{
    data_structures::{
        color::Color,
        geometry::{Geometry, Vertex},
        material::{Material, MaterialKind},
        object::{NodeHandle, Object3D},
    },
    error::SceneError,
    resources::{AssetSource, file_stem, load_texture, resolve_relative},
};

fn parse_error(url: &str, error: tobj::LoadError) -> SceneError {
    SceneError::Parse {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

pub async fn load_obj<S: AssetSource>(source: &S, mtl_url: &str, obj_url: &str) -> Result<NodeHandle, SceneError> {
    let mtl_text = source
        .load_string(mtl_url)
        .await
        .map_err(|e| SceneError::asset_load(mtl_url, e))?;
    let library = tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl_text))).map_err(|e| parse_error(mtl_url, e))?;

    let mut materials = HashMap::new();
    for material in &library.0 {
        materials.insert(material.name.clone(), to_material(source, mtl_url, material).await);
    }

    let obj_text = source
        .load_string(obj_url)
        .await
        .map_err(|e| SceneError::asset_load(obj_url, e))?;
    // Every `mtllib` line, including this one, resolves to the library above.
    let obj_text = format!("mtllib {}\n{obj_text}", file_stem(mtl_url));
    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut BufReader::new(Cursor::new(obj_text)),
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| {
            let library = library.clone();
            async move { Ok(library) }
        },
    )
    .await
    .map_err(|e| parse_error(obj_url, e))?;
    let obj_materials = obj_materials.map_err(|e| parse_error(mtl_url, e))?;

    if models.is_empty() {
        return Err(SceneError::EmptyModel { url: obj_url.to_string() });
    }

    let mut root = Object3D::group(file_stem(obj_url));
    for model in models {
        let material = model
            .mesh
            .material_id
            .and_then(|id| obj_materials.get(id))
            .and_then(|m| materials.get(&m.name))
            .cloned()
            .unwrap_or_else(|| Material::new(MaterialKind::Phong));
        let geometry = to_geometry(&model.mesh);
        root.add(Object3D::mesh(model.name, geometry, material).into_handle());
    }
    Ok(root.into_handle())
}

async fn to_material<S: AssetSource>(source: &S, mtl_url: &str, material: &tobj::Material) -> Material {
    let mut result = Material::new(MaterialKind::Phong);
    result.name = material.name.clone();
    if let Some([r, g, b]) = material.diffuse {
        result.color = Color::new(r, g, b);
    }
    if let Some(dissolve) = material.dissolve {
        result.opacity = dissolve;
        result.transparent = dissolve < 1.0;
    }
    if let Some(diffuse_texture) = &material.diffuse_texture {
        let url = resolve_relative(mtl_url, diffuse_texture);
        match load_texture(source, &url).await {
            Ok(texture) => result.map = Some(texture),
            Err(e) => log::error!("diffuse texture of `{}` ({mtl_url}) not loaded: {e}", material.name),
        }
    }
    result
}

/// Builds vertices from a single-index tobj mesh. Missing normals are
/// averaged from the faces around each vertex.
fn to_geometry(mesh: &tobj::Mesh) -> Geometry {
    let mut vertices: Vec<Vertex> = (0..mesh.positions.len() / 3)
        .map(|i| Vertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
            ],
        })
        .collect();

    if mesh.normals.is_empty() {
        let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
        for c in mesh.indices.chunks_exact(3) {
            let [a, b, d] = [c[0] as usize, c[1] as usize, c[2] as usize];
            let pos0: Vector3<f32> = vertices[a].position.into();
            let pos1: Vector3<f32> = vertices[b].position.into();
            let pos2: Vector3<f32> = vertices[d].position.into();
            // Area weighted
            let face = (pos1 - pos0).cross(pos2 - pos0);
            sums[a] += face;
            sums[b] += face;
            sums[d] += face;
        }
        for (vertex, sum) in vertices.iter_mut().zip(sums) {
            if sum.magnitude2() > 0.0 {
                vertex.normal = sum.normalize().into();
            }
        }
    }

    Geometry::from_parts(vertices, mesh.indices.clone())
}
