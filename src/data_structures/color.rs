use serde::{Deserialize, Serialize};

use crate::data_structures::value::Value;

/// Linear RGB colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Parses `0xff0000`, `"#ff0000"`, `"0xff0000"` or `[1, 0, 0]`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if *n >= 0.0 && *n <= 0xff_ffff as f64 => Some(Self::from_hex(*n as u32)),
            Value::Text(s) => {
                let digits = s
                    .strip_prefix('#')
                    .or_else(|| s.strip_prefix("0x"))
                    .unwrap_or(s);
                u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
            }
            Value::List(items) => match items.as_slice() {
                [r, g, b] => Some(Self::new(r.as_f32()?, g.as_f32()?, b.as_f32()?)),
                [single] => Self::from_value(single),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
