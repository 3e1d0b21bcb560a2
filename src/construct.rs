//! Model construction strategies.
//!
//! A [`ModelDescriptor`] is turned into a scene node in one of three ways:
//! procedurally (a light, or a geometry and material), by importing a glTF file,
//! or by importing an OBJ file with its MTL library. The node is then decorated
//! with the descriptor's attributes, methods and animations in a fixed order per
//! strategy ([`APPLY_LIGHT`], [`APPLY_MESH`]).

use std::{cell::RefCell, rc::Rc};

use crate::{
    animation::{Animation, create_animation},
    apply::{Attributes, Methods, apply_attributes, invoke_methods},
    config::LoaderConfig,
    data_structures::{
        geometry::Geometry,
        light::Light,
        material::Material,
        object::{NodeHandle, Object3D, SceneObject, traverse},
    },
    descriptor::{EntityDescriptor, ModelDescriptor, ModelSource},
    error::SceneError,
    resources::{AssetSource, gltf::load_gltf, load_texture, obj::load_obj},
    timer::{IntervalHandle, Timer},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Attributes,
    Methods,
    Animations,
}

/// Lights are configured before they start moving.
pub const APPLY_LIGHT: [Step; 3] = [Step::Attributes, Step::Methods, Step::Animations];

/// Meshes and imported models: one-shot animations run first, so attributes
/// and methods have the last word on the initial pose.
pub const APPLY_MESH: [Step; 3] = [Step::Animations, Step::Attributes, Step::Methods];

/// Group-level decoration of an entity.
pub const APPLY_GROUP: [Step; 3] = APPLY_LIGHT;

/// The decorating parts of a descriptor.
#[derive(Clone, Copy)]
pub struct Decoration<'a> {
    pub attributes: &'a Attributes,
    pub methods: &'a Methods,
    pub animations: &'a [Animation],
}

impl<'a> From<&'a ModelDescriptor> for Decoration<'a> {
    fn from(descriptor: &'a ModelDescriptor) -> Self {
        Self {
            attributes: &descriptor.attributes,
            methods: &descriptor.methods,
            animations: &descriptor.animations,
        }
    }
}

impl<'a> From<&'a EntityDescriptor> for Decoration<'a> {
    fn from(descriptor: &'a EntityDescriptor) -> Self {
        Self {
            attributes: &descriptor.attributes,
            methods: &descriptor.methods,
            animations: &descriptor.animations,
        }
    }
}

/// Applies `decoration` to `target` in the order given by `steps`.
///
/// Interval handles are pushed to `intervals` as soon as they exist, so a
/// failing method step leaves the caller able to cancel them.
pub fn decorate<T: SceneObject + 'static>(
    timer: &mut dyn Timer,
    target: &Rc<RefCell<T>>,
    decoration: Decoration<'_>,
    steps: &[Step],
    intervals: &mut Vec<IntervalHandle>,
) -> Result<(), SceneError> {
    for step in steps {
        match step {
            Step::Attributes => apply_attributes(&mut *target.borrow_mut(), decoration.attributes),
            Step::Methods => invoke_methods(&mut *target.borrow_mut(), decoration.methods)?,
            Step::Animations => {
                for animation in decoration.animations {
                    intervals.extend(create_animation(timer, Some(target), Some(animation)));
                }
            }
        }
    }
    Ok(())
}

/// Flags every mesh below `root` (inclusive) as a shadow caster and/or receiver.
pub fn propagate_shadows(root: &NodeHandle, cast: bool, receive: bool) {
    if !cast && !receive {
        return;
    }
    traverse(root, &mut |node| {
        if !node.is_mesh() {
            return;
        }
        if cast {
            node.cast_shadow = true;
        }
        if receive {
            node.receive_shadow = true;
        }
    });
}

/// Builds the model `name` described by `descriptor`.
///
/// URLs are resolved through `config`. Intervals registered while decorating
/// are appended to `intervals`, also when construction fails afterwards.
pub async fn construct<S: AssetSource>(
    source: &S,
    config: &LoaderConfig,
    timer: &mut dyn Timer,
    name: &str,
    descriptor: &ModelDescriptor,
    intervals: &mut Vec<IntervalHandle>,
) -> Result<NodeHandle, SceneError> {
    match descriptor.source()? {
        ModelSource::Light { light, light_args } => {
            let node = Object3D::light(name, Light::build(light, light_args)?).into_handle();
            decorate(timer, &node, descriptor.into(), &APPLY_LIGHT, intervals)?;
            Ok(node)
        }
        ModelSource::Procedural {
            geometry,
            geometry_args,
            material,
            material_args,
            texture_url,
        } => {
            let geometry = Geometry::build(geometry, geometry_args)?;
            let mut material = Material::build(material, material_args)?;
            if let Some(url) = texture_url {
                material.map = Some(load_texture(source, &config.resolve(url)).await?);
            }
            let node = Object3D::mesh(name, geometry, material).into_handle();
            decorate(timer, &node, descriptor.into(), &APPLY_MESH, intervals)?;
            Ok(node)
        }
        ModelSource::Gltf { url } => {
            let root = load_gltf(source, &config.resolve(url)).await?;
            finish_import(timer, name, root, descriptor, intervals)
        }
        ModelSource::Obj { mtl_url, obj_url } => {
            let root = load_obj(source, &config.resolve(mtl_url), &config.resolve(obj_url)).await?;
            finish_import(timer, name, root, descriptor, intervals)
        }
    }
}

fn finish_import(
    timer: &mut dyn Timer,
    name: &str,
    root: NodeHandle,
    descriptor: &ModelDescriptor,
    intervals: &mut Vec<IntervalHandle>,
) -> Result<NodeHandle, SceneError> {
    root.borrow_mut().name = name.to_string();
    decorate(timer, &root, descriptor.into(), &APPLY_MESH, intervals)?;
    propagate_shadows(&root, descriptor.cast_shadow, descriptor.receive_shadow);
    Ok(root)
}
