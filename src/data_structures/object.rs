//! Scene objects and their scriptable surface.
//!
//! An [`Object3D`] is a node of the scene graph: a group, a mesh or a light with
//! a local transform and children. Descriptors talk to objects by name only,
//! through the [`SceneObject`] trait:
//!
//! - [`SceneObject::property_mut`] exposes a named property together with its
//!   declared [`Property`] kind, so callers know whether to set components
//!   (vector-like) or assign a value (scalar).
//! - [`SceneObject::invoke`] calls a named method with positional arguments.

use std::{cell::RefCell, rc::Rc};

use cgmath::{Euler, InnerSpace, Quaternion, Rad, Vector3};

use crate::{
    data_structures::{
        color::Color,
        geometry::Geometry,
        light::Light,
        material::Material,
        transform::Transform,
        value::{Value, numbers},
    },
    error::SceneError,
};

/// Shared handle to a scene object.
///
/// Loading and animation run on a single logical thread, so handles are
/// reference counted without locking.
pub type NodeHandle = Rc<RefCell<Object3D>>;

/// A named property of a scene object, tagged with how it is written.
pub enum Property<'a> {
    /// Set from `[x, y, z]`.
    Vector3(&'a mut Vector3<f32>),
    /// Euler angles in radians, `[x, y, z]`, stored as a quaternion.
    Euler(&'a mut Quaternion<f32>),
    /// Set from `[x, y, z, w]`.
    Quaternion(&'a mut Quaternion<f32>),
    /// Set from a hex number, a hex string or `[r, g, b]`.
    Color(&'a mut Color),
    Bool(&'a mut bool),
    Float(&'a mut f32),
}

impl Property<'_> {
    /// Whether the property is written through a component setter rather than
    /// by direct assignment.
    pub fn is_vector_like(&self) -> bool {
        matches!(
            self,
            Self::Vector3(_) | Self::Euler(_) | Self::Quaternion(_) | Self::Color(_)
        )
    }

    /// Writes `value` into the property. `name` is only used for error reporting.
    pub fn assign(self, name: &str, value: &Value) -> Result<(), SceneError> {
        let mismatch = |expected: &str| SceneError::invalid_arguments(name, format!("expected {expected}"));
        match self {
            Self::Vector3(v) => match value.components().as_deref() {
                Some(&[x, y, z]) => *v = Vector3::new(x, y, z),
                _ => return Err(mismatch("[x, y, z]")),
            },
            Self::Euler(q) => match value.components().as_deref() {
                Some(&[x, y, z]) => *q = Quaternion::from(Euler::new(Rad(x), Rad(y), Rad(z))),
                _ => return Err(mismatch("[x, y, z] in radians")),
            },
            Self::Quaternion(q) => match value.components().as_deref() {
                Some(&[x, y, z, w]) => *q = Quaternion::new(w, x, y, z),
                _ => return Err(mismatch("[x, y, z, w]")),
            },
            Self::Color(c) => *c = Color::from_value(value).ok_or_else(|| mismatch("a colour"))?,
            Self::Bool(b) => *b = value.as_bool().ok_or_else(|| mismatch("a boolean"))?,
            Self::Float(f) => {
                let n = match value {
                    Value::List(items) if items.len() == 1 => items[0].as_f32(),
                    other => other.as_f32(),
                };
                *f = n.ok_or_else(|| mismatch("a number"))?;
            }
        }
        Ok(())
    }
}

/// Anything that attributes, methods and animations can be applied to.
pub trait SceneObject {
    /// Human readable name used in logs and errors.
    fn label(&self) -> &str;

    /// Looks up a property by name; `None` if the object has no such property.
    fn property_mut(&mut self, name: &str) -> Option<Property<'_>>;

    fn has_method(&self, name: &str) -> bool;

    /// Invokes a method with positional arguments.
    ///
    /// Fails with [`SceneError::UnknownMethod`] if the object has no such method.
    fn invoke(&mut self, method: &str, args: &[Value]) -> Result<(), SceneError>;
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
}

const METHODS: &[&str] = &[
    "rotateX",
    "rotateY",
    "rotateZ",
    "rotateOnAxis",
    "translateX",
    "translateY",
    "translateZ",
    "translateOnAxis",
    "lookAt",
    "updateMatrixWorld",
];

#[derive(Debug)]
pub struct Object3D {
    pub name: String,
    pub kind: NodeKind,
    pub local: Transform,
    world: Transform,
    pub up: Vector3<f32>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub frustum_culled: bool,
    pub render_order: f32,
    children: Vec<NodeHandle>,
}

impl Object3D {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            local: Transform::new(),
            world: Transform::new(),
            up: Vector3::unit_y(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            frustum_culled: true,
            render_order: 0.0,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh(Mesh { geometry, material }))
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn into_handle(self) -> NodeHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn add(&mut self, child: NodeHandle) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    pub fn world_transform(&self) -> &Transform {
        &self.world
    }

    /// Recomputes world transforms of `self` and all descendants from `parent`.
    pub fn update_world_transforms(&mut self, parent: &Transform) {
        self.world = parent * &self.local;
        let world = self.world;
        for child in &self.children {
            child.borrow_mut().update_world_transforms(&world);
        }
    }

    fn axis_args(name: &str, args: &[Value], len: usize) -> Result<Vec<f32>, SceneError> {
        let values = numbers(args).ok_or_else(|| SceneError::invalid_arguments(name, "expected numbers"))?;
        if values.len() < len {
            return Err(SceneError::invalid_arguments(
                name,
                format!("expected {len} arguments, got {}", values.len()),
            ));
        }
        Ok(values)
    }
}

impl SceneObject for Object3D {
    fn label(&self) -> &str {
        &self.name
    }

    fn property_mut(&mut self, name: &str) -> Option<Property<'_>> {
        let property = match name {
            "position" => Property::Vector3(&mut self.local.position),
            "scale" => Property::Vector3(&mut self.local.scale),
            "rotation" => Property::Euler(&mut self.local.rotation),
            "quaternion" => Property::Quaternion(&mut self.local.rotation),
            "up" => Property::Vector3(&mut self.up),
            "visible" => Property::Bool(&mut self.visible),
            "castShadow" => Property::Bool(&mut self.cast_shadow),
            "receiveShadow" => Property::Bool(&mut self.receive_shadow),
            "frustumCulled" => Property::Bool(&mut self.frustum_culled),
            "renderOrder" => Property::Float(&mut self.render_order),
            _ => match &mut self.kind {
                NodeKind::Light(light) => match name {
                    "color" => Property::Color(&mut light.color),
                    "groundColor" => Property::Color(&mut light.ground_color),
                    "intensity" => Property::Float(&mut light.intensity),
                    "distance" => Property::Float(&mut light.distance),
                    "decay" => Property::Float(&mut light.decay),
                    "angle" => Property::Float(&mut light.angle),
                    "penumbra" => Property::Float(&mut light.penumbra),
                    _ => return None,
                },
                _ => return None,
            },
        };
        Some(property)
    }

    fn has_method(&self, name: &str) -> bool {
        METHODS.contains(&name)
    }

    fn invoke(&mut self, method: &str, args: &[Value]) -> Result<(), SceneError> {
        match method {
            "rotateX" | "rotateY" | "rotateZ" => {
                let angle = Self::axis_args(method, args, 1)?[0];
                let axis = match method {
                    "rotateX" => Vector3::unit_x(),
                    "rotateY" => Vector3::unit_y(),
                    _ => Vector3::unit_z(),
                };
                self.local.rotate_on_axis(axis, angle);
            }
            "translateX" | "translateY" | "translateZ" => {
                let distance = Self::axis_args(method, args, 1)?[0];
                let axis = match method {
                    "translateX" => Vector3::unit_x(),
                    "translateY" => Vector3::unit_y(),
                    _ => Vector3::unit_z(),
                };
                self.local.translate_on_axis(axis, distance);
            }
            "rotateOnAxis" | "translateOnAxis" => {
                let a = Self::axis_args(method, args, 4)?;
                let axis = Vector3::new(a[0], a[1], a[2]);
                if axis.magnitude2() == 0.0 {
                    return Err(SceneError::invalid_arguments(method, "axis must not be zero"));
                }
                if method == "rotateOnAxis" {
                    self.local.rotate_on_axis(axis, a[3]);
                } else {
                    self.local.translate_on_axis(axis, a[3]);
                }
            }
            "lookAt" => {
                let a = Self::axis_args(method, args, 3)?;
                self.local.look_at(Vector3::new(a[0], a[1], a[2]), self.up);
            }
            "updateMatrixWorld" => self.update_world_transforms(&Transform::new()),
            _ => {
                return Err(SceneError::UnknownMethod {
                    target: self.name.clone(),
                    method: method.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Visits `node` and every descendant, parents before children.
pub fn traverse(node: &NodeHandle, visit: &mut dyn FnMut(&mut Object3D)) {
    let children = {
        let mut object = node.borrow_mut();
        visit(&mut object);
        object.children.clone()
    };
    for child in &children {
        traverse(child, visit);
    }
}
