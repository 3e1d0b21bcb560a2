//! orrery
//!
//! A declarative loader and animator for celestial scene objects. Entities
//! (a sun, a planet, a moon) are described as data: which models to build and
//! how (procedural geometry or lights, glTF files, OBJ + MTL files), which
//! attributes and methods to apply, which animations to run on an interval,
//! and which named callers switch behaviour on and off. This crate interprets
//! those descriptions into a CPU-side scene graph a renderer can upload.
//!
//! High-level modules
//! - `data_structures`: scene nodes, geometry, materials, lights, textures
//! - `descriptor`: entity and model descriptors read from JSON
//! - `apply`: attribute assignment and method invocation
//! - `timer` / `animation`: interval scheduling and animations on top of it
//! - `resources`: asset sources and glTF / OBJ import
//! - `construct`: the model construction strategies
//! - `loader` / `entity`: group loading and the loaded entity
//! - `caller`: switching callers between states
//! - `config`: loader configuration
//!

pub mod animation;
pub mod apply;
pub mod caller;
pub mod config;
pub mod construct;
pub mod data_structures;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod loader;
pub mod resources;
pub mod timer;

// Re-exports commonly used types for convenience in downstream code.
pub use animation::{Animation, create_animation};
pub use config::{FailurePolicy, LoaderConfig};
pub use data_structures::object::{NodeHandle, Object3D, SceneObject};
pub use data_structures::value::Value;
pub use descriptor::{EntityDescriptor, ModelDescriptor, ModelSource};
pub use entity::Entity;
pub use error::{ConfigError, SceneError};
pub use loader::Loader;
pub use resources::{AssetSource, FileSource, MemorySource};
pub use timer::{IntervalHandle, TickTimer, Timer};

/// Installs the platform logger at `level` unless `RUST_LOG` says otherwise.
///
/// Safe to call more than once; later calls only warn.
pub fn init_logger(level: &str) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let env = env_logger::Env::default().default_filter_or(level);
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            log::warn!("Could not initialize logger: {e}");
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        let level = level.parse().unwrap_or(log::Level::Info);
        if let Err(e) = console_log::init_with_level(level) {
            log::warn!("Could not initialize logger: {e}");
        }
    }
}
