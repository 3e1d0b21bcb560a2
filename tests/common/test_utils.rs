#![allow(dead_code)]

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgb, RgbImage};
use orrery::{LoaderConfig, MemorySource, TickTimer, loader::Loader};

/// Encodes a solid image of the given size.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("failed to encode fixture image");
    bytes
}

pub fn loader(source: MemorySource) -> Loader<MemorySource> {
    Loader::new(source, LoaderConfig::default())
}

pub fn loader_with(source: MemorySource, config: LoaderConfig) -> Loader<MemorySource> {
    Loader::new(source, config)
}

pub fn timer() -> TickTimer {
    TickTimer::new()
}

/// Sources serving the textures referenced by `assets/entities.json`.
pub fn solar_system_source() -> MemorySource {
    MemorySource::new()
        .with_file("/static/textures/sun.jpg", encoded_image(8, 4, ImageFormat::Jpeg))
        .with_file("/static/textures/earth.jpg", encoded_image(16, 8, ImageFormat::Jpeg))
}

pub const STATION_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [{ "name": "Station", "nodes": [0] }],
    "nodes": [
        { "name": "hull", "mesh": 0, "translation": [0, 2, 0], "children": [1] },
        { "name": "antenna", "mesh": 0, "scale": [0.5, 0.5, 0.5] }
    ],
    "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }] }],
    "materials": [{
        "name": "paint",
        "pbrMetallicRoughness": { "baseColorFactor": [1, 0, 0, 1], "metallicFactor": 0.5, "roughnessFactor": 0.25 }
    }],
    "buffers": [{ "uri": "station.bin", "byteLength": 44 }],
    "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
        { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
    ],
    "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] },
        { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
    ]
}"#;

/// One triangle: three `f32` positions followed by three `u16` indices.
pub fn station_bin() -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let indices: [u16; 3] = [0, 1, 2];
    let mut bytes: Vec<u8> = positions.iter().flat_map(|p| p.to_le_bytes()).collect();
    bytes.extend(indices.iter().flat_map(|i| i.to_le_bytes()));
    bytes.resize(44, 0);
    bytes
}

/// `STATION_GLTF` with its buffer and a base colour texture inlined as `data:` URIs.
pub fn embedded_station_gltf() -> String {
    let buffer = STANDARD.encode(station_bin());
    let image = STANDARD.encode(encoded_image(2, 2, ImageFormat::Png));
    STATION_GLTF
        .replace(
            r#""uri": "station.bin""#,
            &format!(r#""uri": "data:application/octet-stream;base64,{buffer}""#),
        )
        .replace(
            r#""metallicFactor": 0.5"#,
            r#""baseColorTexture": { "index": 0 }, "metallicFactor": 0.5"#,
        )
        .replace(
            r#""buffers":"#,
            &format!(r#""textures": [{{ "source": 0 }}], "images": [{{ "uri": "data:image/png;base64,{image}" }}], "buffers":"#),
        )
}

pub const EMPTY_GLTF: &str = r#"{ "asset": { "version": "2.0" }, "scenes": [{ "nodes": [] }] }"#;

pub const ROCK_MTL: &str = "\
newmtl stone
Kd 0.5 0.4 0.3
d 1.0
map_Kd stone.png
";

pub const ROCK_OBJ: &str = "\
o rock
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
usemtl stone
f 1/1 2/2 3/3
o pebble
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";

pub fn rock_source() -> MemorySource {
    MemorySource::new()
        .with_file("/models/rock.mtl", ROCK_MTL)
        .with_file("/models/rock.obj", ROCK_OBJ)
        .with_file("/models/stone.png", encoded_image(4, 4, ImageFormat::Png))
}

pub fn station_source() -> MemorySource {
    MemorySource::new()
        .with_file("/models/station.gltf", STATION_GLTF)
        .with_file("/models/station.bin", station_bin())
}
