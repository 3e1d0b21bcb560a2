//! Entity and model descriptors.
//!
//! Descriptors are plain data read from JSON entity files. They say how to
//! build, decorate and animate models without building anything themselves.
//!
//! Model entries keep the configuration shape authors are used to
//! (`"type": "createModel" | "loadGltf" | "loadObj"` plus optional fields) and
//! are checked into the [`ModelSource`] union while parsing. A malformed entry
//! still parses; it fails with [`SceneError::UnrecognizedShape`] when that one
//! model is constructed, so the rest of the file stays loadable.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    animation::Animation,
    apply::{Attributes, Methods},
    data_structures::value::Value,
    error::{ConfigError, SceneError},
};

/// How a model gets built.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelSource {
    Procedural {
        geometry: String,
        geometry_args: Vec<Value>,
        material: String,
        material_args: Vec<Value>,
        texture_url: Option<String>,
    },
    Light {
        light: String,
        light_args: Vec<Value>,
    },
    Gltf {
        url: String,
    },
    Obj {
        mtl_url: String,
        obj_url: String,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawModelDescriptor")]
pub struct ModelDescriptor {
    /// The construction strategy, or why the entry has none.
    source: Result<ModelSource, String>,
    pub attributes: Attributes,
    pub methods: Methods,
    pub animations: Vec<Animation>,
    /// Flag every imported mesh as a shadow caster.
    pub cast_shadow: bool,
    /// Flag every imported mesh as a shadow receiver.
    pub receive_shadow: bool,
}

impl ModelDescriptor {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source: Ok(source),
            attributes: Attributes::new(),
            methods: Methods::new(),
            animations: Vec::new(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// The construction strategy, or [`SceneError::UnrecognizedShape`] when the
    /// entry names none (or several).
    pub fn source(&self) -> Result<&ModelSource, SceneError> {
        self.source
            .as_ref()
            .map_err(|reason| SceneError::UnrecognizedShape(reason.clone()))
    }

    pub fn procedural(geometry: &str, geometry_args: Vec<Value>, material: &str, material_args: Vec<Value>) -> Self {
        Self::new(ModelSource::Procedural {
            geometry: geometry.to_string(),
            geometry_args,
            material: material.to_string(),
            material_args,
            texture_url: None,
        })
    }

    pub fn light(light: &str, light_args: Vec<Value>) -> Self {
        Self::new(ModelSource::Light {
            light: light.to_string(),
            light_args,
        })
    }

    pub fn gltf(url: &str) -> Self {
        Self::new(ModelSource::Gltf { url: url.to_string() })
    }

    pub fn obj(mtl_url: &str, obj_url: &str) -> Self {
        Self::new(ModelSource::Obj {
            mtl_url: mtl_url.to_string(),
            obj_url: obj_url.to_string(),
        })
    }

    pub fn with_texture(mut self, url: &str) -> Self {
        if let Ok(ModelSource::Procedural { texture_url, .. }) = &mut self.source {
            *texture_url = Some(url.to_string());
        }
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_method(mut self, name: &str, args: Vec<Value>) -> Self {
        self.methods.insert(name.to_string(), args);
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModelDescriptor {
    #[serde(rename = "type")]
    strategy: Option<String>,
    light: Option<String>,
    #[serde(default)]
    light_init_args: Vec<Value>,
    geometry: Option<String>,
    #[serde(default)]
    geometry_init_args: Vec<Value>,
    material: Option<String>,
    #[serde(default)]
    material_init_args: Vec<Value>,
    texture_url: Option<String>,
    gltf_url: Option<String>,
    mtl_url: Option<String>,
    obj_url: Option<String>,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    methods: Methods,
    #[serde(default)]
    animations: Vec<Animation>,
    #[serde(default)]
    cast_shadow: bool,
    #[serde(default)]
    receive_shadow: bool,
    #[serde(flatten)]
    unknown: IndexMap<String, Value>,
}

impl RawModelDescriptor {
    /// Moves the construction fields out into a [`ModelSource`].
    fn take_source(&mut self) -> Result<ModelSource, String> {
        if !self.unknown.is_empty() {
            let keys: Vec<_> = self.unknown.keys().map(String::as_str).collect();
            return Err(format!("unknown keys {keys:?}"));
        }

        let mut candidates = Vec::new();
        if let Some(light) = self.light.take() {
            candidates.push(ModelSource::Light {
                light,
                light_args: std::mem::take(&mut self.light_init_args),
            });
        }
        match (self.geometry.take(), self.material.take()) {
            (Some(geometry), Some(material)) => candidates.push(ModelSource::Procedural {
                geometry,
                geometry_args: std::mem::take(&mut self.geometry_init_args),
                material,
                material_args: std::mem::take(&mut self.material_init_args),
                texture_url: self.texture_url.take(),
            }),
            (Some(_), None) => return Err("`geometry` without `material`".into()),
            (None, Some(_)) => return Err("`material` without `geometry`".into()),
            (None, None) => {}
        }
        if let Some(url) = self.gltf_url.take() {
            candidates.push(ModelSource::Gltf { url });
        }
        match (self.mtl_url.take(), self.obj_url.take()) {
            (Some(mtl_url), Some(obj_url)) => candidates.push(ModelSource::Obj { mtl_url, obj_url }),
            (None, None) => {}
            _ => return Err("`objUrl` and `mtlUrl` go together".into()),
        }

        if candidates.len() > 1 {
            return Err("more than one of light, geometry+material, gltfUrl, objUrl+mtlUrl is set".into());
        }
        let Some(source) = candidates.pop() else {
            return Err("one of light, geometry+material, gltfUrl or objUrl+mtlUrl is required".into());
        };

        let fits = match (self.strategy.as_deref(), &source) {
            (None, _) => true,
            (Some("createModel"), ModelSource::Light { .. } | ModelSource::Procedural { .. }) => true,
            (Some("loadGltf"), ModelSource::Gltf { .. }) => true,
            (Some("loadObj"), ModelSource::Obj { .. }) => true,
            _ => false,
        };
        if !fits {
            return Err(format!(
                "type {:?} does not match the fields that are set",
                self.strategy.as_deref().unwrap_or_default()
            ));
        }
        Ok(source)
    }
}

impl From<RawModelDescriptor> for ModelDescriptor {
    fn from(mut raw: RawModelDescriptor) -> Self {
        let source = raw.take_source();
        Self {
            source,
            attributes: raw.attributes,
            methods: raw.methods,
            animations: raw.animations,
            cast_shadow: raw.cast_shadow,
            receive_shadow: raw.receive_shadow,
        }
    }
}

/// An animation bound to a model of the entity.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerAnimation {
    pub model_name: String,
    #[serde(flatten)]
    pub animation: Animation,
}

/// Attribute overrides for one model of the entity.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOverride {
    pub model_name: String,
    #[serde(flatten)]
    pub values: Attributes,
}

/// What a caller does when switched into a state.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CallerState {
    pub animations: Vec<CallerAnimation>,
    pub attributes: Option<AttributeOverride>,
}

/// A named behaviour with named states, usually `on` and `off`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Caller {
    pub states: IndexMap<String, CallerState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityDescriptor {
    pub models: IndexMap<String, ModelDescriptor>,
    pub attributes: Attributes,
    pub methods: Methods,
    pub animations: Vec<Animation>,
    pub callers: IndexMap<String, Caller>,
    /// Where a camera focusing this entity should look.
    pub target_position: Option<Point>,
    /// Where a camera focusing this entity should stand.
    pub view_position: Option<Point>,
}

/// Entity name to descriptor, in file order.
pub type Entities = IndexMap<String, EntityDescriptor>;

pub fn parse_entities(json: &str) -> Result<Entities, ConfigError> {
    serde_json::from_str(json).map_err(ConfigError::EntityError)
}

pub fn read_entities(path: impl AsRef<Path>) -> Result<Entities, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    parse_entities(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_planet_with_a_rotation_caller() {
        let entities = parse_entities(
            r#"{
                "earth": {
                    "models": {
                        "main": {
                            "type": "createModel",
                            "geometry": "SphereBufferGeometry",
                            "geometryInitArgs": [5, 32, 32],
                            "material": "MeshStandardMaterial",
                            "textureUrl": "static/textures/earth.jpg",
                            "attributes": { "castShadow": true, "receiveShadow": true },
                            "methods": { "rotateZ": [0.4014257279586958] }
                        }
                    },
                    "callers": {
                        "rotation": {
                            "on": { "animations": [
                                { "modelName": "main", "method": "rotateY", "args": [0.03490658503988659], "interval": 10 }
                            ] },
                            "off": {}
                        }
                    },
                    "targetPosition": { "x": 100, "y": 0, "z": 100 }
                }
            }"#,
        )
        .unwrap();

        let earth = &entities["earth"];
        let main = &earth.models["main"];
        assert!(matches!(
            main.source(),
            Ok(ModelSource::Procedural { geometry, texture_url: Some(url), .. }
)
                if geometry == "SphereBufferGeometry" && url == "static/textures/earth.jpg"
        ));
        assert_eq!(main.attributes.len(), 2);
        assert_eq!(main.methods.keys().collect::<Vec<_>>(), ["rotateZ"]);

        let rotation = &earth.callers["rotation"];
        assert_eq!(rotation.states.keys().collect::<Vec<_>>(), ["on", "off"]);
        let on = &rotation.states["on"].animations[0];
        assert_eq!(on.model_name, "main");
        assert_eq!(on.animation.method, "rotateY");
        assert_eq!(on.animation.interval, Some(10));
        assert!(rotation.states["off"].animations.is_empty());
        assert_eq!(earth.target_position, Some(Point { x: 100.0, y: 0.0, z: 100.0 }));
    }

    #[test]
    fn attribute_overrides_collect_the_remaining_keys() {
        let state: CallerState = serde_json::from_str(
            r#"{ "attributes": { "modelName": "light", "intensity": 0, "visible": false } }"#,
        )
        .unwrap();
        let overrides = state.attributes.unwrap();
        assert_eq!(overrides.model_name, "light");
        assert_eq!(overrides.values.keys().collect::<Vec<_>>(), ["intensity", "visible"]);
    }

    #[test]
    fn shape_is_inferred_without_type() {
        let m: ModelDescriptor = serde_json::from_str(r#"{ "light": "AmbientLight" }"#).unwrap();
        assert!(matches!(m.source(), Ok(ModelSource::Light { .. })));
        let m: ModelDescriptor = serde_json::from_str(r#"{ "mtlUrl": "a.mtl", "objUrl": "a.obj" }"#).unwrap();
        assert!(matches!(m.source(), Ok(ModelSource::Obj { .. })));
    }

    #[test]
    fn unrecognized_shapes_parse_but_have_no_source() {
        for json in [
            r#"{ "type": "createModel" }"#,
            r#"{ "type": "createModel", "geometry": "Sphere" }"#,
            r#"{ "light": "PointLight", "gltfUrl": "ship.gltf" }"#,
            r#"{ "type": "loadGltf", "light": "PointLight" }"#,
            r#"{ "type": "loadFbx", "gltfUrl": "ship.fbx" }"#,
            r#"{ "objUrl": "a.obj" }"#,
            r#"{ "light": "PointLight", "lightArgs": [1] }"#,
        ] {
            let model: ModelDescriptor = serde_json::from_str(json).unwrap();
            let err = model.source().unwrap_err();
            assert!(matches!(err, SceneError::UnrecognizedShape(_)), "{json}: {err}");
        }
    }

    #[test]
    fn one_bad_model_leaves_the_file_readable() {
        let entities = parse_entities(
            r#"{
                "sun": { "models": { "light": { "light": "PointLight" } } },
                "earth": { "models": {
                    "bad": { "type": "createModel" },
                    "main": { "geometry": "Sphere", "material": "Standard" }
                } }
            }"#,
        )
        .unwrap();
        assert!(entities["sun"].models["light"].source().is_ok());
        assert!(entities["earth"].models["bad"].source().is_err());
        assert!(entities["earth"].models["main"].source().is_ok());
    }
}
