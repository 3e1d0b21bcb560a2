//! Switching callers between states.
//!
//! A caller is a named behaviour of an entity (e.g. `rotation`) with named
//! states (usually `on` and `off`). Switching a caller cancels whatever its
//! previous state started, then starts the animations and applies the
//! attribute overrides of the new state.

use crate::{
    animation::create_animation,
    apply::apply_attributes,
    entity::Entity,
    timer::Timer,
};

impl Entity {
    /// Puts `caller` into `state`.
    ///
    /// Returns `false` and changes nothing if the entity has no such caller or
    /// the caller no such state. Models referenced by the state but missing
    /// from the entity are skipped.
    pub fn call(&mut self, timer: &mut dyn Timer, caller: &str, state: &str) -> bool {
        let Some(next) = self
            .descriptor
            .callers
            .get(caller)
            .and_then(|c| c.states.get(state))
        else {
            log::debug!("`{}` has no caller state `{caller}.{state}`", self.name);
            return false;
        };

        let running = self.active.entry(caller.to_string()).or_default();
        for handle in running.drain(..) {
            timer.cancel(handle);
        }

        for entry in &next.animations {
            let target = self.models.get(&entry.model_name);
            if target.is_none() {
                log::debug!("`{}` has no model `{}`", self.name, entry.model_name);
            }
            running.extend(create_animation(timer, target, Some(&entry.animation)));
        }

        if let Some(overrides) = &next.attributes {
            match self.models.get(&overrides.model_name) {
                Some(model) => apply_attributes(&mut *model.borrow_mut(), &overrides.values),
                None => log::debug!("`{}` has no model `{}`", self.name, overrides.model_name),
            }
        }

        log::debug!("`{}` {caller} -> {state}: {} intervals", self.name, running.len());
        true
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use instant::Duration;

    use crate::{
        config::LoaderConfig,
        descriptor::parse_entities,
        loader::Loader,
        resources::MemorySource,
        timer::{TickTimer, Timer},
    };

    const EARTH: &str = r#"{
        "earth": {
            "models": {
                "main": {
                    "type": "createModel",
                    "geometry": "SphereBufferGeometry",
                    "geometryInitArgs": [5, 32, 32],
                    "material": "MeshStandardMaterial"
                },
                "light": { "type": "createModel", "light": "PointLight", "lightInitArgs": [16777215, 1] }
            },
            "callers": {
                "rotation": {
                    "on": {
                        "animations": [
                            { "modelName": "main", "method": "rotateY", "args": [0.03490658503988659], "interval": 10 },
                            { "modelName": "moon", "method": "rotateY", "args": [0.1], "interval": 10 }
                        ],
                        "attributes": { "modelName": "light", "intensity": 3 }
                    },
                    "off": { "attributes": { "modelName": "light", "intensity": 1 } }
                }
            }
        }
    }"#;

    fn earth(timer: &mut TickTimer) -> crate::entity::Entity {
        let entities = parse_entities(EARTH).unwrap();
        let loader = Loader::new(MemorySource::new(), LoaderConfig::default());
        let mut loaded: IndexMap<_, _> = futures::executor::block_on(loader.load_entities(&entities, timer)).unwrap();
        loaded.shift_remove("earth").unwrap()
    }

    #[test]
    fn on_off_on_keeps_one_interval_set() {
        let mut timer = TickTimer::new();
        let mut earth = earth(&mut timer);

        assert!(earth.call(&mut timer, "rotation", "on"));
        assert_eq!(earth.active_intervals("rotation").len(), 1);
        assert!(earth.call(&mut timer, "rotation", "on"));
        assert_eq!(earth.active_intervals("rotation").len(), 1);
        assert_eq!(timer.active(), 1);

        let intensity = |e: &crate::entity::Entity| e.model("light").unwrap().borrow().as_light().unwrap().intensity;
        assert_eq!(intensity(&earth), 3.0);

        assert!(earth.call(&mut timer, "rotation", "off"));
        assert!(earth.active_intervals("rotation").is_empty());
        assert_eq!(timer.active(), 0);
        assert_eq!(intensity(&earth), 1.0);
    }

    #[test]
    fn unknown_caller_or_state_changes_nothing() {
        let mut timer = TickTimer::new();
        let mut earth = earth(&mut timer);
        assert!(earth.call(&mut timer, "rotation", "on"));
        assert!(!earth.call(&mut timer, "rotation", "sideways"));
        assert!(!earth.call(&mut timer, "orbit", "on"));
        assert_eq!(earth.active_intervals("rotation").len(), 1);
    }

    #[test]
    fn stop_all_cancels_everything() {
        let mut timer = TickTimer::new();
        let mut earth = earth(&mut timer);
        earth.call(&mut timer, "rotation", "on");
        timer.advance(Duration::from_millis(30));
        earth.stop_all(&mut timer);
        assert_eq!(timer.active(), 0);
        assert!(earth.active_intervals("rotation").is_empty());
    }
}
