//! glTF import.
//!
//! The document's default scene (or its first scene) becomes a group whose
//! children mirror the glTF node tree. Node transforms are kept as local
//! transforms; a node with one primitive becomes a mesh, a node with several
//! becomes a group of meshes.

use cgmath::Quaternion;

use crate::{
    data_structures::{
        color::Color,
        geometry::{Geometry, Vertex},
        material::{Material, MaterialKind},
        object::{NodeHandle, Object3D},
        texture::Texture,
        transform::Transform,
    },
    error::SceneError,
    resources::{AssetSource, data_uri::{DataUri, subtype}, file_stem, load_texture, resolve_relative},
};

fn parse_error(url: &str, reason: impl ToString) -> SceneError {
    SceneError::Parse {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

pub async fn load_gltf<S: AssetSource>(source: &S, url: &str) -> Result<NodeHandle, SceneError> {
    let bytes = source
        .load_binary(url)
        .await
        .map_err(|e| SceneError::asset_load(url, e))?;
    let gltf = gltf::Gltf::from_slice(&bytes).map_err(|e| parse_error(url, e))?;

    // Load buffers
    let mut buffers = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| parse_error(url, "binary chunk referenced but missing"))?,
            gltf::buffer::Source::Uri(uri) => match DataUri::parse(uri) {
                Some(data) => data.decode()?,
                None => {
                    let uri = resolve_relative(url, uri);
                    source
                        .load_binary(&uri)
                        .await
                        .map_err(|e| SceneError::asset_load(&uri, e))?
                }
            },
        };
        buffers.push(data);
    }

    // Load materials
    let mut materials = Vec::new();
    for material in gltf.materials() {
        materials.push(to_material(source, url, &material, &buffers).await);
    }

    let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
        return Err(SceneError::EmptyModel { url: url.to_string() });
    };
    let mut root = Object3D::group(scene.name().unwrap_or(file_stem(url)));
    for node in scene.nodes() {
        root.add(to_object(&node, &buffers, &materials));
    }
    if root.children().is_empty() {
        return Err(SceneError::EmptyModel { url: url.to_string() });
    }
    Ok(root.into_handle())
}

async fn to_material<S: AssetSource>(
    source: &S,
    url: &str,
    material: &gltf::Material<'_>,
    buffers: &[Vec<u8>],
) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let [er, eg, eb] = material.emissive_factor();

    let mut result = Material::new(MaterialKind::Standard);
    result.name = material.name().unwrap_or_default().to_string();
    result.color = Color::new(r, g, b);
    result.emissive = Color::new(er, eg, eb);
    result.opacity = a;
    result.transparent = material.alpha_mode() == gltf::material::AlphaMode::Blend;
    result.roughness = pbr.roughness_factor();
    result.metalness = pbr.metallic_factor();

    let Some(info) = pbr.base_color_texture() else {
        return result;
    };
    let texture = match info.texture().source().source() {
        gltf::image::Source::View { view, mime_type } => {
            let start = view.offset();
            let end = start + view.length();
            match buffers.get(view.buffer().index()).and_then(|b| b.get(start..end)) {
                Some(bytes) => Texture::from_bytes(bytes, url, Some(subtype(mime_type))),
                None => Err(parse_error(url, "image buffer view out of range")),
            }
        }
        gltf::image::Source::Uri { uri, mime_type } => match DataUri::parse(uri) {
            Some(data) => data
                .decode()
                .and_then(|bytes| Texture::from_bytes(&bytes, url, Some(subtype(mime_type.unwrap_or(data.mime_type))))),
            None => load_texture(source, &resolve_relative(url, uri)).await,
        },
    };
    match texture {
        Ok(texture) => result.map = Some(texture),
        Err(e) => log::warn!("base colour texture of `{}` in {url} not loaded: {e}", result.name),
    }
    result
}

fn to_object(node: &gltf::Node, buffers: &[Vec<u8>], materials: &[Material]) -> NodeHandle {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut primitives: Vec<(Geometry, Material)> = node
        .mesh()
        .map(|mesh| {
            mesh.primitives()
                .map(|primitive| to_mesh(&primitive, buffers, materials))
                .collect()
        })
        .unwrap_or_default();
    let mut object = match (primitives.pop(), primitives.is_empty()) {
        (Some((geometry, material)), true) => Object3D::mesh(&name, geometry, material),
        (last, _) => {
            primitives.extend(last);
            let mut group = Object3D::group(&name);
            for (idx, (geometry, material)) in primitives.into_iter().enumerate() {
                group.add(Object3D::mesh(format!("{name}_{idx}"), geometry, material).into_handle());
            }
            group
        }
    };

    let (translation, rotation, scale) = node.transform().decomposed();
    object.local = Transform {
        position: translation.into(),
        // glTF stores quaternions as [x, y, z, w]
        rotation: Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
        scale: scale.into(),
    };

    for child in node.children() {
        object.add(to_object(&child, buffers, materials));
    }
    object.into_handle()
}

fn to_mesh(primitive: &gltf::Primitive, buffers: &[Vec<u8>], materials: &[Material]) -> (Geometry, Material) {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let mut vertices: Vec<Vertex> = reader
        .read_positions()
        .map(|positions| {
            positions
                .map(|position| Vertex {
                    position,
                    ..Default::default()
                })
                .collect()
        })
        .unwrap_or_default();
    if let Some(normals) = reader.read_normals() {
        for (vertex, normal) in vertices.iter_mut().zip(normals) {
            vertex.normal = normal;
        }
    }
    if let Some(tex_coords) = reader.read_tex_coords(0) {
        for (vertex, uv) in vertices.iter_mut().zip(tex_coords.into_f32()) {
            vertex.tex_coords = uv;
        }
    }
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };

    let material = primitive
        .material()
        .index()
        .and_then(|idx| materials.get(idx))
        .cloned()
        .unwrap_or_else(|| Material::new(MaterialKind::Standard));
    (Geometry::from_parts(vertices, indices), material)
}
