use std::str::FromStr;

use indexmap::IndexMap;

use crate::{
    data_structures::{color::Color, texture::Texture, value::Value},
    error::SceneError,
};

/// Shading model of a material. Mirrors the `Mesh*Material` family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Basic,
    Lambert,
    Phong,
    Standard,
}

impl FromStr for MaterialKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base = s.strip_prefix("Mesh").unwrap_or(s);
        let base = base.strip_suffix("Material").unwrap_or(base);
        match base {
            "Basic" => Ok(Self::Basic),
            "Lambert" => Ok(Self::Lambert),
            "Phong" => Ok(Self::Phong),
            "Standard" => Ok(Self::Standard),
            _ => Err(SceneError::UnknownMaterial(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub kind: MaterialKind,
    pub name: String,
    pub color: Color,
    pub emissive: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    /// Colour map, usually a planet surface texture.
    pub map: Option<Texture>,
}

impl Material {
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            name: String::new(),
            color: Color::WHITE,
            emissive: Color::BLACK,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            map: None,
        }
    }

    /// Builds a material from its constructor arguments.
    ///
    /// The only argument understood is a parameter map such as
    /// `{ "color": 16711680 }`; anything else is ignored.
    pub fn build(kind: &str, args: &[Value]) -> Result<Self, SceneError> {
        let mut material = Self::new(kind.parse()?);
        if let Some(params) = args.first().and_then(Value::as_map) {
            material.set_params(params)?;
        }
        Ok(material)
    }

    pub fn set_params(&mut self, params: &IndexMap<String, Value>) -> Result<(), SceneError> {
        let invalid = |key: &str| SceneError::invalid_arguments(key, "unexpected value type");
        for (key, value) in params {
            match key.as_str() {
                "name" => self.name = value.as_str().ok_or_else(|| invalid(key))?.to_string(),
                "color" => self.color = Color::from_value(value).ok_or_else(|| invalid(key))?,
                "emissive" => self.emissive = Color::from_value(value).ok_or_else(|| invalid(key))?,
                "roughness" => self.roughness = value.as_f32().ok_or_else(|| invalid(key))?,
                "metalness" => self.metalness = value.as_f32().ok_or_else(|| invalid(key))?,
                "opacity" => self.opacity = value.as_f32().ok_or_else(|| invalid(key))?,
                "transparent" => self.transparent = value.as_bool().ok_or_else(|| invalid(key))?,
                "wireframe" => self.wireframe = value.as_bool().ok_or_else(|| invalid(key))?,
                _ => log::debug!("material parameter `{key}` is not supported and was ignored"),
            }
        }
        Ok(())
    }
}
