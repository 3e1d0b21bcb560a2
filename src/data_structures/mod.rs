//! Scene data structures: objects, geometry, materials, lights and textures.
//!
//! - `object` contains the scene graph node and its scriptable property/method surface
//! - `transform` holds decomposed local/world transforms
//! - `geometry` generates procedural meshes and wraps imported ones
//! - `material` and `light` are built from descriptor kinds and constructor arguments
//! - `texture` wraps decoded image data
//! - `value` and `color` are the loosely typed inputs read from descriptors

pub mod color;
pub mod geometry;
pub mod light;
pub mod material;
pub mod object;
pub mod texture;
pub mod transform;
pub mod value;
