//! One-shot and interval animations.
//!
//! An [`Animation`] names a method, its arguments and an optional interval.
//! Without an interval the method runs once, right away; with one it is handed
//! to a [`Timer`] and keeps running until its handle is cancelled.
//!
//! Animations are optional decoration, so everything here is lenient: a missing
//! target, a missing descriptor or an unknown method is silently skipped.

use std::{cell::RefCell, rc::Rc};

use instant::Duration;
use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{object::SceneObject, value::Value},
    timer::{IntervalHandle, Timer},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
    /// Repeat period in milliseconds.
    #[serde(default)]
    pub interval: Option<u64>,
}

impl Animation {
    pub fn once(method: &str, args: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            args,
            interval: None,
        }
    }

    pub fn every(method: &str, args: Vec<Value>, interval_ms: u64) -> Self {
        Self {
            method: method.to_string(),
            args,
            interval: Some(interval_ms),
        }
    }
}

/// Runs or schedules `animation` on `target`.
///
/// An interval of `0` counts as no interval: the method runs once, right away.
/// Returns the interval handle when the animation repeats, `None` otherwise.
pub fn create_animation<T: SceneObject + 'static>(
    timer: &mut dyn Timer,
    target: Option<&Rc<RefCell<T>>>,
    animation: Option<&Animation>,
) -> Option<IntervalHandle> {
    let (target, animation) = (target?, animation?);
    if !target.borrow().has_method(&animation.method) {
        log::debug!(
            "`{}` has no method `{}`, animation skipped",
            target.borrow().label(),
            animation.method
        );
        return None;
    }

    let Some(interval) = animation.interval.filter(|&ms| ms > 0) else {
        let mut object = target.borrow_mut();
        if let Err(e) = object.invoke(&animation.method, &animation.args) {
            log::warn!("animation `{}` on `{}` failed: {e}", animation.method, object.label());
        }
        return None;
    };

    // The timer must not keep nodes alive that the renderer already dropped.
    let target = Rc::downgrade(target);
    let method = animation.method.clone();
    let args = animation.args.clone();
    let handle = timer.schedule(
        Duration::from_millis(interval),
        Box::new(move || {
            let Some(target) = target.upgrade() else {
                return;
            };
            let Ok(mut object) = target.try_borrow_mut() else {
                log::warn!("`{method}` skipped a tick, target is borrowed");
                return;
            };
            if let Err(e) = object.invoke(&method, &args) {
                log::warn!("interval `{method}` on `{}` failed: {e}", object.label());
            }
        }),
    );
    Some(handle)
}
