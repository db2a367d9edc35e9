//! Door system - advances door swings and pushes pivot yaw to the host

use hecs::World;

use crate::components::Interactable;
use crate::host::Host;

/// Advance every swinging door by `dt` seconds. Returns how many moved.
pub fn door_system(world: &mut World, host: &mut impl Host, dt: f32) -> usize {
    let mut moved = 0;
    for (entity, interactable) in world.query_mut::<&mut Interactable>() {
        if let Interactable::Door(door) = interactable {
            if let Some(yaw) = door.advance(dt) {
                host.set_yaw(entity, yaw);
                moved += 1;
            }
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use hearth_logic::constants::doors::SWING_SECONDS;
    use hearth_logic::interact::Door;
    use hearth_logic::primitives::Vec3;

    fn setup() -> (World, HeadlessHost, hecs::Entity) {
        let mut world = World::new();
        let mut host = HeadlessHost::new();
        let door = world.spawn((Interactable::Door(Door::new(-90.0)),));
        host.spawn_node(door, None, Vec3::ZERO, 0.0);
        (world, host, door)
    }

    fn toggle(world: &mut World, door: hecs::Entity) {
        if let Ok(mut item) = world.get::<&mut Interactable>(door) {
            item.interact();
        }
    }

    #[test]
    fn test_idle_door_not_pushed() {
        let (mut world, mut host, _) = setup();
        assert_eq!(door_system(&mut world, &mut host, 0.1), 0);
    }

    #[test]
    fn test_swing_reaches_target() {
        let (mut world, mut host, door) = setup();
        toggle(&mut world, door);

        door_system(&mut world, &mut host, SWING_SECONDS / 2.0);
        let half = host.node(door).unwrap().yaw;
        assert!((half + 45.0).abs() < 1e-3, "{half}");

        door_system(&mut world, &mut host, SWING_SECONDS);
        assert!((host.node(door).unwrap().yaw + 90.0).abs() < 1e-4);
        assert_eq!(door_system(&mut world, &mut host, 0.1), 0);
    }

    #[test]
    fn test_retarget_mid_swing() {
        let (mut world, mut host, door) = setup();
        toggle(&mut world, door);
        door_system(&mut world, &mut host, SWING_SECONDS / 2.0);
        toggle(&mut world, door);
        for _ in 0..20 {
            door_system(&mut world, &mut host, 0.05);
        }
        assert!(host.node(door).unwrap().yaw.abs() < 1e-4);
    }
}
