use std::{f32::consts::PI, str::FromStr};

use crate::{
    data_structures::{color::Color, value::Value},
    error::SceneError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Spot,
    Hemisphere,
}

impl FromStr for LightKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix("Light").unwrap_or(s) {
            "Ambient" => Ok(Self::Ambient),
            "Directional" => Ok(Self::Directional),
            "Point" => Ok(Self::Point),
            "Spot" => Ok(Self::Spot),
            "Hemisphere" => Ok(Self::Hemisphere),
            _ => Err(SceneError::UnknownLight(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    /// Only used by hemisphere lights.
    pub ground_color: Color,
    pub intensity: f32,
    /// Cut-off distance; `0.0` means no limit.
    pub distance: f32,
    pub decay: f32,
    pub angle: f32,
    pub penumbra: f32,
}

impl Light {
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            color: Color::WHITE,
            ground_color: Color::WHITE,
            intensity: 1.0,
            distance: 0.0,
            decay: 2.0,
            angle: PI / 3.0,
            penumbra: 0.0,
        }
    }

    /// Builds a light from positional constructor arguments, e.g.
    /// `PointLight(color, intensity, distance, decay)`.
    pub fn build(kind: &str, args: &[Value]) -> Result<Self, SceneError> {
        let kind: LightKind = kind.parse()?;
        let mut light = Self::new(kind);
        let color = |idx: usize| -> Result<Option<Color>, SceneError> {
            args.get(idx)
                .map(|v| {
                    Color::from_value(v)
                        .ok_or_else(|| SceneError::invalid_arguments(&format!("{kind:?}Light"), "expected a colour"))
                })
                .transpose()
        };
        let number = |idx: usize| -> Result<Option<f32>, SceneError> {
            args.get(idx)
                .map(|v| {
                    v.as_f32()
                        .ok_or_else(|| SceneError::invalid_arguments(&format!("{kind:?}Light"), "expected a number"))
                })
                .transpose()
        };

        if kind == LightKind::Hemisphere {
            if let Some(sky) = color(0)? {
                light.color = sky;
            }
            if let Some(ground) = color(1)? {
                light.ground_color = ground;
            }
            if let Some(intensity) = number(2)? {
                light.intensity = intensity;
            }
            return Ok(light);
        }

        if let Some(c) = color(0)? {
            light.color = c;
        }
        if let Some(intensity) = number(1)? {
            light.intensity = intensity;
        }
        match kind {
            LightKind::Point => {
                if let Some(distance) = number(2)? {
                    light.distance = distance;
                }
                if let Some(decay) = number(3)? {
                    light.decay = decay;
                }
            }
            LightKind::Spot => {
                if let Some(distance) = number(2)? {
                    light.distance = distance;
                }
                if let Some(angle) = number(3)? {
                    light.angle = angle;
                }
                if let Some(penumbra) = number(4)? {
                    light.penumbra = penumbra;
                }
                if let Some(decay) = number(5)? {
                    light.decay = decay;
                }
            }
            _ => {}
        }
        Ok(light)
    }
}
