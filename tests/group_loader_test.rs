use cgmath::Vector3;
use orrery::{
    Animation, FailurePolicy, LoaderConfig, MemorySource, ModelDescriptor, SceneError, Timer, Value,
    descriptor::{EntityDescriptor, read_entities},
};

use crate::common::test_utils::{encoded_image, loader, loader_with, solar_system_source, timer};

mod common;

#[tokio::test]
async fn loads_the_solar_system_asset_file() {
    let entities = read_entities("assets/entities.json").unwrap();
    let loader = loader(solar_system_source());
    let mut timer = timer();
    let loaded = loader.load_entities(&entities, &mut timer).await.unwrap();

    assert_eq!(loaded.keys().collect::<Vec<_>>(), ["sun", "earth"]);
    let sun = &loaded["sun"];
    assert_eq!(sun.group().borrow().children().len(), 2);
    let main = sun.model("main").unwrap().borrow();
    let texture = main.as_mesh().unwrap().material.map.as_ref().unwrap();
    assert_eq!(texture.dimensions(), (8, 4));
    let light = sun.model("light").unwrap().borrow();
    assert!(light.cast_shadow);
    assert_eq!(light.as_light().unwrap().intensity, 10.0);

    let earth = &loaded["earth"];
    assert_eq!(earth.group().borrow().local.position, Vector3::new(100.0, 0.0, 100.0));
    assert!(earth.model("main").unwrap().borrow().receive_shadow);

    // Nothing animates until a caller is switched on.
    assert_eq!(timer.active(), 0);
    assert_eq!(
        loader.source().requests(),
        ["/static/textures/sun.jpg", "/static/textures/earth.jpg"]
    );
}

#[tokio::test]
async fn bundled_assets_load_with_their_config() {
    // build.rs copies assets/ next to the build output
    let bundle = concat!(env!("OUT_DIR"), "/assets");
    let config = LoaderConfig::load_or_default(format!("{bundle}/orrery.ron")).unwrap();
    assert_eq!(config.failure_policy, FailurePolicy::Abort);
    let entities = read_entities(format!("{bundle}/entities.json")).unwrap();
    let loader = loader_with(solar_system_source(), config);
    let mut timer = timer();
    let loaded = loader.load_entities(&entities, &mut timer).await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loader.source().requests().len(), 2);
}

#[tokio::test]
async fn untextured_sphere_never_touches_the_source() {
    let mut entity = EntityDescriptor::default();
    entity.models.insert(
        "main".into(),
        ModelDescriptor::procedural("Sphere", vec![Value::from(5), Value::from(32), Value::from(32)], "Standard", vec![]),
    );
    let loader = loader(MemorySource::new());
    let mut timer = timer();
    let loaded = loader.load_models("moon", &entity, &mut timer).await.unwrap();

    assert_eq!(loaded.group().borrow().children().len(), 1);
    assert!(loader.source().requests().is_empty());
}

fn entity_with_broken_model() -> EntityDescriptor {
    let mut entity = EntityDescriptor::default();
    entity.models.insert(
        "spinning".into(),
        ModelDescriptor::procedural("Box", vec![], "Basic", vec![])
            .with_animation(Animation::every("rotateY", vec![Value::from(0.1)], 10)),
    );
    entity.models.insert(
        "broken".into(),
        ModelDescriptor::procedural("Sphere", vec![], "Standard", vec![]).with_texture("static/missing.png"),
    );
    entity
        .models
        .insert("lamp".into(), ModelDescriptor::light("AmbientLight", vec![]));
    entity
}

#[tokio::test]
async fn abort_cancels_intervals_of_the_failed_load() {
    let loader = loader(MemorySource::new());
    let mut timer = timer();
    let result = loader.load_models("planet", &entity_with_broken_model(), &mut timer).await;

    assert!(matches!(result, Err(SceneError::AssetLoad { ref url, .. }) if url == "/static/missing.png"));
    assert_eq!(timer.active(), 0);
}

#[tokio::test]
async fn skip_leaves_failed_models_out() {
    let config = LoaderConfig {
        failure_policy: FailurePolicy::Skip,
        ..Default::default()
    };
    let loader = loader_with(MemorySource::new(), config);
    let mut timer = timer();
    let entity = entity_with_broken_model();
    let loaded = loader.load_models("planet", &entity, &mut timer).await.unwrap();

    assert!(loaded.group().borrow().children().len() <= entity.models.len());
    assert_eq!(loaded.group().borrow().children().len(), 2);
    assert!(loaded.model("broken").is_none());
    assert!(loaded.model("lamp").is_some());
    assert_eq!(loaded.construction_intervals().len(), 1);
    assert_eq!(timer.active(), 1);
}

#[tokio::test]
async fn group_level_decoration_applies_to_the_group() {
    let mut entity = EntityDescriptor::default();
    entity
        .models
        .insert("main".into(), ModelDescriptor::procedural("Sphere", vec![], "Phong", vec![]));
    entity.attributes.insert("position".into(), Value::from(vec![10, 0, 0]));
    entity.methods.insert("translateY".into(), vec![Value::from(2)]);
    entity.animations.push(Animation::every("rotateY", vec![Value::from(0.01)], 20));

    let loader = loader(MemorySource::new());
    let mut timer = timer();
    let mut loaded = loader.load_models("planet", &entity, &mut timer).await.unwrap();

    assert_eq!(loaded.group().borrow().local.position, Vector3::new(10.0, 2.0, 0.0));
    assert_eq!(loaded.construction_intervals().len(), 1);
    loaded.stop_all(&mut timer);
    assert_eq!(timer.active(), 0);
}

#[tokio::test]
async fn textures_load_through_the_public_path() {
    let config = LoaderConfig {
        public_path: "/hello-earth".into(),
        ..Default::default()
    };
    let source = MemorySource::new().with_file(
        "/hello-earth/static/textures/earth.png",
        encoded_image(2, 2, image::ImageFormat::Png),
    );
    let loader = loader_with(source, config);
    let texture = loader.load_texture("static/textures/earth.png").await.unwrap();
    assert_eq!(texture.dimensions(), (2, 2));
}

#[tokio::test]
async fn skip_builds_the_siblings_of_a_shapeless_model() {
    let entities = orrery::descriptor::parse_entities(
        r#"{
            "earth": { "models": {
                "main": { "type": "createModel", "geometry": "Sphere", "material": "Standard" },
                "bad": { "type": "createModel" },
                "light": { "type": "createModel", "light": "PointLight" }
            } }
        }"#,
    )
    .unwrap();
    let config = LoaderConfig {
        failure_policy: FailurePolicy::Skip,
        ..Default::default()
    };
    let loader = loader_with(MemorySource::new(), config);
    let mut timer = timer();
    let loaded = loader.load_entities(&entities, &mut timer).await.unwrap();

    let earth = &loaded["earth"];
    assert_eq!(earth.models().map(|(key, _)| key).collect::<Vec<_>>(), ["main", "light"]);
    assert_eq!(earth.group().borrow().children().len(), 2);
}

#[tokio::test]
async fn abort_reports_a_shapeless_model() {
    let entities = orrery::descriptor::parse_entities(
        r#"{ "earth": { "models": { "bad": { "type": "createModel" } } } }"#,
    )
    .unwrap();
    let loader = loader(MemorySource::new());
    let mut timer = timer();
    let result = loader.load_entities(&entities, &mut timer).await;
    assert!(matches!(result, Err(SceneError::UnrecognizedShape(_))));
}
