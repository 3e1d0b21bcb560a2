//! Attribute assignment and method invocation driven by descriptors.

use indexmap::IndexMap;

use crate::{
    data_structures::{object::SceneObject, value::Value},
    error::SceneError,
};

/// Property name to value, in declaration order.
pub type Attributes = IndexMap<String, Value>;

/// Method name to positional arguments, in declaration order.
pub type Methods = IndexMap<String, Vec<Value>>;

/// Writes every attribute the target already has.
///
/// Vector-like properties are set component-wise, scalars are assigned.
/// Properties the target does not have are skipped, and so are values of the
/// wrong shape; neither creates anything on the target.
pub fn apply_attributes<T: SceneObject + ?Sized>(target: &mut T, attributes: &Attributes) {
    for (name, value) in attributes {
        let label = target.label().to_string();
        let Some(property) = target.property_mut(name) else {
            log::debug!("`{label}` has no property `{name}`, skipping");
            continue;
        };
        if let Err(e) = property.assign(name, value) {
            log::warn!("could not set `{name}` on `{label}`: {e}");
        }
    }
}

/// Invokes every method in order, stopping at the first failure.
pub fn invoke_methods<T: SceneObject + ?Sized>(target: &mut T, methods: &Methods) -> Result<(), SceneError> {
    for (name, args) in methods {
        target.invoke(name, args)?;
    }
    Ok(())
}
