//! Lighting system - flicker updates and switch wiring

use hecs::{Entity, World};
use log::{debug, info};
use rand::Rng;

use hearth_logic::flicker::FlickerController;
use hearth_logic::interact::SwitchToggle;
use hearth_logic::plan::ScriptedEvent;

use crate::components::{indicator, Hidden, PointLight, SwitchWiring};
use crate::host::Host;
use crate::spawn::sync_light;

/// Advance every flicker controller. Controllers keep running while their
/// light is off; the color only reaches the host while it is on.
pub fn flicker_system(
    world: &mut World,
    host: &mut impl Host,
    flickers: &mut [(Entity, FlickerController)],
    dt: f32,
    rng: &mut impl Rng,
) {
    for (light, controller) in flickers.iter_mut() {
        let color = controller.update(dt, rng);
        if let Ok(mut state) = world.get::<&mut PointLight>(*light) {
            state.color = color;
            if state.enabled {
                host.set_light(*light, true, color);
            }
        }
    }
}

/// Apply a switch toggle to everything the switch is wired to: its light,
/// its indicator and, on first activation, its hidden prop.
pub fn apply_switch_toggle(world: &mut World, host: &mut impl Host, switch: Entity, toggle: SwitchToggle) {
    let Ok(wiring) = world.get::<&SwitchWiring>(switch).map(|w| *w) else {
        return;
    };

    if let Some(light) = wiring.light {
        sync_light(world, host, light, toggle.is_on);
    }
    if let Some(lamp) = wiring.indicator {
        host.set_color(lamp, indicator::color(toggle.is_on));
    }

    match toggle.fired {
        Some(ScriptedEvent::Reveal(_)) => {
            if let Some(prop) = wiring.reveal {
                reveal(world, host, prop);
            }
        }
        None => {}
    }
}

/// Make a hidden prop visible. Nothing hides it again.
pub fn reveal(world: &mut World, host: &mut impl Host, prop: Entity) {
    if world.remove_one::<Hidden>(prop).is_ok() {
        info!("revealed {:?}", prop);
    } else {
        debug!("reveal of {:?}: already visible", prop);
    }
    host.set_visible(prop, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use hearth_logic::flicker::FlickerProfile;
    use hearth_logic::plan::PropId;
    use hearth_logic::primitives::{Color, Primitive, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn light(world: &mut World, host: &mut HeadlessHost, enabled: bool) -> Entity {
        let entity = world.spawn((PointLight {
            enabled,
            color: Color::WHITE,
        },));
        host.spawn_light(entity, Vec3::ZERO, Color::WHITE, enabled);
        entity
    }

    #[test]
    fn test_flicker_pushes_only_enabled_lights() {
        let mut world = World::new();
        let mut host = HeadlessHost::new();
        let on = light(&mut world, &mut host, true);
        let off = light(&mut world, &mut host, false);
        let mut flickers = vec![
            (on, FlickerController::new(Color::WHITE, FlickerProfile::strobe()).unwrap()),
            (off, FlickerController::new(Color::WHITE, FlickerProfile::strobe()).unwrap()),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..60 {
            flicker_system(&mut world, &mut host, &mut flickers, 1.0 / 60.0, &mut rng);
        }
        assert_eq!(host.light(on).unwrap().color, flickers[0].1.color());
        assert_eq!(host.light(off).unwrap().color, Color::WHITE);
        assert!(!host.light(off).unwrap().enabled);
        // The component still tracks the dimmed color for when it comes on.
        assert_eq!(world.get::<&PointLight>(off).unwrap().color, flickers[1].1.color());
    }

    #[test]
    fn test_toggle_syncs_light_and_indicator() {
        let mut world = World::new();
        let mut host = HeadlessHost::new();
        let lamp_light = light(&mut world, &mut host, true);
        let switch = world.spawn(());
        let lamp = world.spawn(());
        host.spawn_primitive(lamp, None, &Primitive::cube("lamp", Vec3::ZERO, Vec3::ONE, indicator::ON))
            .unwrap();
        world
            .insert_one(
                switch,
                SwitchWiring {
                    light: Some(lamp_light),
                    indicator: Some(lamp),
                    reveal: None,
                },
            )
            .unwrap();

        apply_switch_toggle(&mut world, &mut host, switch, SwitchToggle { is_on: false, fired: None });
        assert!(!host.light(lamp_light).unwrap().enabled);
        assert!(!world.get::<&PointLight>(lamp_light).unwrap().enabled);
        assert_eq!(host.color(lamp), Some(indicator::OFF));

        apply_switch_toggle(&mut world, &mut host, switch, SwitchToggle { is_on: true, fired: None });
        assert!(host.light(lamp_light).unwrap().enabled);
        assert_eq!(host.color(lamp), Some(indicator::ON));
    }

    #[test]
    fn test_first_activation_reveals_prop() {
        let mut world = World::new();
        let mut host = HeadlessHost::new();
        let prop = world.spawn((Hidden,));
        host.spawn_primitive(prop, None, &Primitive::cube("figure", Vec3::ZERO, Vec3::ONE, Color::BLACK))
            .unwrap();
        host.set_visible(prop, false);
        let switch = world.spawn((SwitchWiring {
            light: None,
            indicator: None,
            reveal: Some(prop),
        },));

        apply_switch_toggle(&mut world, &mut host, switch, SwitchToggle { is_on: true, fired: None });
        assert!(!host.is_visible(prop));

        let fired = Some(ScriptedEvent::Reveal(PropId(0)));
        apply_switch_toggle(&mut world, &mut host, switch, SwitchToggle { is_on: true, fired });
        assert!(host.is_visible(prop));
        assert!(world.get::<&Hidden>(prop).is_err());

        apply_switch_toggle(&mut world, &mut host, switch, SwitchToggle { is_on: false, fired: None });
        assert!(host.is_visible(prop));
    }
}
