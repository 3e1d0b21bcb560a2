//! Group loading: builds every model of an entity into one scene group.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    config::{FailurePolicy, LoaderConfig},
    construct::{APPLY_GROUP, construct, decorate},
    data_structures::{
        object::{NodeHandle, Object3D},
        texture::Texture,
    },
    descriptor::{Entities, EntityDescriptor, ModelDescriptor},
    entity::Entity,
    error::SceneError,
    resources::{AssetSource, FileSource, load_texture},
    timer::{IntervalHandle, Timer},
};

pub struct Loader<S> {
    source: S,
    config: LoaderConfig,
}

impl Loader<FileSource> {
    /// A loader reading from `config.asset_root`.
    pub fn from_config(config: LoaderConfig) -> Self {
        Self::new(FileSource::from_config(&config), config)
    }
}

impl<S: AssetSource> Loader<S> {
    pub fn new(source: S, config: LoaderConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads and decodes the texture at the descriptor URL `url`.
    pub async fn load_texture(&self, url: &str) -> Result<Texture, SceneError> {
        load_texture(&self.source, &self.config.resolve(url)).await
    }

    /// Builds a single model. Intervals it registers are appended to
    /// `intervals` even if construction fails.
    pub async fn construct(
        &self,
        timer: &mut dyn Timer,
        name: &str,
        descriptor: &ModelDescriptor,
        intervals: &mut Vec<IntervalHandle>,
    ) -> Result<NodeHandle, SceneError> {
        construct(&self.source, &self.config, timer, name, descriptor, intervals).await
    }

    /// Builds every model of `descriptor`, one after another in declaration
    /// order, and collects them under a group named `name`.
    ///
    /// With [`FailurePolicy::Abort`] the first failure cancels every interval
    /// this call registered and is returned. With [`FailurePolicy::Skip`] the
    /// failing model is left out and loading continues.
    pub async fn load_models(
        &self,
        name: &str,
        descriptor: &EntityDescriptor,
        timer: &mut dyn Timer,
    ) -> Result<Entity, SceneError> {
        let group = Object3D::group(name).into_handle();
        let mut models = IndexMap::new();
        let mut intervals = Vec::new();

        for (key, model) in &descriptor.models {
            match self.construct(timer, key, model, &mut intervals).await {
                Ok(node) => {
                    group.borrow_mut().add(node.clone());
                    models.insert(key.clone(), node);
                }
                Err(e) => self.on_failure(timer, &mut intervals, &format!("{name}.{key}"), e)?,
            }
        }

        if let Err(e) = decorate(timer, &group, descriptor.into(), &APPLY_GROUP, &mut intervals) {
            self.on_failure(timer, &mut intervals, name, e)?;
        }

        log::info!(
            "loaded `{name}`: {} of {} models, {} intervals",
            models.len(),
            descriptor.models.len(),
            intervals.len()
        );
        Ok(Entity {
            name: name.to_string(),
            descriptor: descriptor.clone(),
            group,
            models,
            construction_intervals: intervals,
            active: HashMap::new(),
        })
    }

    /// Loads every entity in file order. Each entity follows the configured
    /// failure policy; an aborted entity aborts the whole call and stops the
    /// entities loaded before it.
    pub async fn load_entities(
        &self,
        entities: &Entities,
        timer: &mut dyn Timer,
    ) -> Result<IndexMap<String, Entity>, SceneError> {
        let mut loaded = IndexMap::new();
        for (name, descriptor) in entities {
            match self.load_models(name, descriptor, timer).await {
                Ok(entity) => {
                    loaded.insert(name.clone(), entity);
                }
                Err(e) => {
                    for entity in loaded.values_mut() {
                        entity.stop_all(timer);
                    }
                    return Err(e);
                }
            }
        }
        Ok(loaded)
    }

    fn on_failure(
        &self,
        timer: &mut dyn Timer,
        intervals: &mut Vec<IntervalHandle>,
        what: &str,
        error: SceneError,
    ) -> Result<(), SceneError> {
        match self.config.failure_policy {
            FailurePolicy::Skip => {
                log::warn!("skipping `{what}`: {error}");
                Ok(())
            }
            FailurePolicy::Abort => {
                for handle in intervals.drain(..) {
                    timer.cancel(handle);
                }
                log::error!("loading `{what}` failed: {error}");
                Err(error)
            }
        }
    }
}
