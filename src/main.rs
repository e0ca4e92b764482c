//! Example scene demonstrating transform propagation and components

use scene_core::math::scalar::HALF_PI;
use scene_core::prelude::*;

/// Logs its owner whenever the owner's pose changes
#[derive(Default)]
struct Tracker {
    moves: u32,
}

impl Component for Tracker {
    fn on_attached(&mut self, object: SceneObject) {
        log::info!("Tracker attached to {object}");
    }

    fn on_detached(&mut self, object: SceneObject) {
        log::info!("Tracker detached from {object} after {} moves", self.moves);
    }

    fn on_transform_changed(&mut self, object: SceneObject) {
        self.moves += 1;
        log::debug!("{object} moved");
    }
}

/// Marker for objects that would be drawn
#[derive(Default)]
struct MeshRenderer;

impl Component for MeshRenderer {}

fn run() -> Result<(), SceneError> {
    let config = SceneConfig::default()
        .with_name("Demo Scene")
        .with_capacity(16);
    let mut world = SceneWorld::with_config(config);
    world
        .registry_mut()
        .register::<Tracker>()
        .register::<MeshRenderer>();

    let base = world.spawn("Base");
    let arm = world.spawn_child(base, "Arm")?;
    let hand = world.spawn_child(arm, "Hand")?;

    world.set_local_position(arm, Vec3::new(0.0, 2.0, 0.0))?;
    world.set_local_position(hand, Vec3::new(1.0, 0.0, 0.0))?;
    world.add_component_by(hand, "Tracker")?;
    world.add_component_by(hand, "MeshRenderer")?;
    world.add_component_by(hand, "Missing")?;

    log::info!("Hand starts at {:?}", world.world_position(hand)?);

    world.set_local_position(base, Vec3::new(5.0, 0.0, 0.0))?;
    world.set_local_orientation(arm, Quat::from_angle_axis(HALF_PI, Vec3::UNIT_Y))?;
    log::info!("Hand after moving the base: {:?}", world.world_position(hand)?);

    world.set_world_position(hand, Vec3::ZERO)?;
    log::info!(
        "Hand pinned to the origin, local position {:?}",
        world.transform(hand)?.position()
    );

    let snapshot = SceneSnapshot::capture(&world)?;
    log::info!("Snapshot:\n{}", snapshot.to_ron()?);

    world.despawn(base)?;
    log::info!("Objects left: {}", world.len());
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Scene error: {e}");
    }
}
