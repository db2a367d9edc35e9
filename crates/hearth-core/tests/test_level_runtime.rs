//! Integration tests for the runtime against the default house.
//!
//! Exercises: HouseConfig → build_house → spawn_level → LevelRuntime
//! → update / handle_input, with the headless host standing in for the engine.

use hearth_core::prelude::*;
use hearth_core::interaction::resolve_interactable;
use hearth_core::overlay::PhotoOverlay;
use hearth_logic::interact::{Interaction, PHOTO_DISMISS_PROMPT};
use hearth_logic::level::{build_house, HouseConfig};
use hearth_logic::primitives::{AssetRef, Vec3};
use hecs::{Entity, World};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn house(host: &mut HeadlessHost) -> LevelRuntime {
    LevelRuntime::from_config(&HouseConfig::default(), host).unwrap()
}

fn run(runtime: &mut LevelRuntime, host: &mut HeadlessHost, seconds: f32) {
    let frames = (seconds * 60.0).ceil() as usize;
    for _ in 0..frames {
        runtime.update(1.0 / 60.0, host);
    }
}

fn switch_state(runtime: &LevelRuntime, switch: Entity) -> bool {
    match *runtime.world.get::<&Interactable>(switch).unwrap() {
        Interactable::Switch(ref s) => s.is_on(),
        ref other => panic!("not a switch: {other:?}"),
    }
}

fn light_enabled(runtime: &LevelRuntime, light: Entity) -> bool {
    runtime.world.get::<&PointLight>(light).unwrap().enabled
}

/// Stand at `from` relative to a switch and look at it.
fn face_switch(host: &mut HeadlessHost, switch: Entity, from: Vec3) {
    let (target, _) = host.world_transform(switch).unwrap();
    host.look_at(target + from, target);
}

// ── Spawning ───────────────────────────────────────────────────────────

#[test]
fn spawned_counts_match_plan() {
    let plan = build_house(&HouseConfig::default()).unwrap();
    let summary = plan.summary();
    let mut host = HeadlessHost::new();
    let runtime = house(&mut host);
    let level = runtime.level();

    assert_eq!(level.doors.len(), summary.doors);
    assert_eq!(level.switches.len(), summary.switches);
    assert_eq!(level.lights.len(), summary.lights);
    assert_eq!(level.photos.len(), summary.photos);
    assert_eq!(runtime.flickers().len(), summary.flickering_lights);
    assert_eq!(level.fallbacks, 0);
    assert_eq!(host.ambient, plan.ambient);
    assert_eq!(host.lights.len(), summary.lights);
}

#[test]
fn every_light_matches_its_switch_at_start() {
    let mut host = HeadlessHost::new();
    let runtime = house(&mut host);
    for &switch in &runtime.level().switches {
        let wiring = *runtime.world.get::<&SwitchWiring>(switch).unwrap();
        let light = wiring.light.unwrap();
        assert_eq!(light_enabled(&runtime, light), switch_state(&runtime, switch));
        assert_eq!(host.light(light).unwrap().enabled, switch_state(&runtime, switch));
    }
}

#[test]
fn every_switch_has_its_indicator_wired() {
    let mut host = HeadlessHost::new();
    let runtime = house(&mut host);
    for &switch in &runtime.level().switches {
        let wiring = *runtime.world.get::<&SwitchWiring>(switch).unwrap();
        let lamp = wiring.indicator.unwrap();
        assert_eq!(runtime.world.get::<&Parent>(lamp).unwrap().0, switch);
        assert_eq!(host.color(lamp), Some(indicator::color(switch_state(&runtime, switch))));
    }
}

#[test]
fn hidden_props_start_invisible() {
    let mut host = HeadlessHost::new();
    let runtime = house(&mut host);
    assert_eq!(runtime.level().props.len(), 1);
    let figure = runtime.level().props[0];
    assert!(!host.is_visible(figure));
    assert!(runtime.world.get::<&Hidden>(figure).is_ok());
}

#[test]
fn missing_photo_falls_back_to_placeholder() {
    let mut host = HeadlessHost::new().with_missing_asset("photos/family.png");
    let runtime = house(&mut host);
    assert_eq!(runtime.level().fallbacks, 1);
    let photos: Vec<_> = host
        .nodes
        .values()
        .filter_map(|n| n.primitive.as_ref())
        .filter(|p| p.label == "photo")
        .collect();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos.iter().filter(|p| p.texture.is_none()).count(), 1);
    assert!(photos
        .iter()
        .any(|p| p.texture == Some(AssetRef::new("photos/nursery.png"))));
}

// ── Doors ──────────────────────────────────────────────────────────────

#[test]
fn door_opens_and_focus_clears() {
    let mut host = HeadlessHost::new();
    let mut runtime = house(&mut host);
    let door = runtime.find("Living Room door").unwrap();

    // Middle of the corridor, looking at the living room door.
    host.look_at(Vec3::new(0.0, 1.75, 0.0), Vec3::new(-2.0, 1.75, 0.0));
    runtime.update(1.0 / 60.0, &mut host);
    assert_eq!(runtime.focus(), Some(door));
    assert_eq!(host.prompt.as_deref(), Some("[E] Open door"));
    assert_eq!(host.crosshair, Crosshair::Interactable);

    let result = runtime.handle_input(InputEvent::Interact, &mut host);
    assert_eq!(result, Some(Interaction::Door { open: true }));
    assert_eq!(host.prompt.as_deref(), Some("[E] Close door"));

    run(&mut runtime, &mut host, 1.0);
    let open_yaw = match *runtime.world.get::<&Interactable>(door).unwrap() {
        Interactable::Door(ref d) => d.target_yaw(),
        _ => unreachable!(),
    };
    assert!((host.node(door).unwrap().yaw - open_yaw).abs() < 1e-4);
    // The leaf has swung out of the way.
    assert_eq!(runtime.focus(), None);
    assert_eq!(host.prompt, None);
    assert_eq!(host.crosshair, Crosshair::Idle);
}

#[test]
fn door_leaf_resolves_to_pivot() {
    let mut host = HeadlessHost::new();
    let runtime = house(&mut host);
    let door = runtime.find("Kitchen door").unwrap();
    let hit = host
        .raycast(Ray::towards(Vec3::new(0.0, 1.75, 0.0), Vec3::new(2.0, 1.75, 0.0)), 5.0)
        .unwrap();
    assert_ne!(hit, door);
    assert_eq!(resolve_interactable(&runtime.world, hit), Some(door));
}

// ── Switches ───────────────────────────────────────────────────────────

#[test]
fn study_switch_reveals_figure_once() {
    let mut host = HeadlessHost::new();
    let mut runtime = house(&mut host);
    let switch = runtime.find("Study switch").unwrap();
    let light = runtime.world.get::<&SwitchWiring>(switch).unwrap().light.unwrap();
    let figure = runtime.level().props[0];
    assert!(!switch_state(&runtime, switch));

    face_switch(&mut host, switch, Vec3::new(-1.5, 0.0, 0.0));
    runtime.update(1.0 / 60.0, &mut host);
    assert_eq!(runtime.focus(), Some(switch));
    assert_eq!(host.prompt.as_deref(), Some("[E] Turn on the study light"));

    let first = runtime.handle_input(InputEvent::Interact, &mut host);
    assert!(matches!(first, Some(Interaction::Switch(t)) if t.is_on && t.fired.is_some()));
    assert!(light_enabled(&runtime, light));
    assert!(host.is_visible(figure));
    assert_eq!(host.prompt.as_deref(), Some("[E] Turn off the study light"));

    for _ in 0..4 {
        let toggle = runtime.handle_input(InputEvent::Interact, &mut host);
        assert!(matches!(toggle, Some(Interaction::Switch(t)) if t.fired.is_none()));
        assert_eq!(light_enabled(&runtime, light), switch_state(&runtime, switch));
        assert_eq!(host.light(light).unwrap().enabled, switch_state(&runtime, switch));
        assert!(host.is_visible(figure));
    }
}

#[test]
fn unchanged_focus_writes_prompt_once() {
    let mut host = HeadlessHost::new();
    let mut runtime = house(&mut host);
    let switch = runtime.find("Kitchen switch").unwrap();
    face_switch(&mut host, switch, Vec3::new(-1.5, 0.0, 0.0));

    run(&mut runtime, &mut host, 2.0);
    assert_eq!(runtime.focus(), Some(switch));
    assert_eq!(host.prompt_writes, 1);
    assert_eq!(host.crosshair_writes, 1);

    host.look_at(Vec3::new(0.0, 1.75, 0.0), Vec3::new(0.0, -5.0, 0.0));
    run(&mut runtime, &mut host, 1.0);
    assert_eq!(runtime.focus(), None);
    assert_eq!(host.prompt_writes, 2);
    assert_eq!(host.crosshair_writes, 2);
}

// ── Photos ─────────────────────────────────────────────────────────────

#[test]
fn photo_overlay_freezes_and_restores_controls() {
    let mut host = HeadlessHost::new();
    let before = PlayerControls {
        speed: 2.5,
        mouse_sensitivity: (0.0, 55.0),
    };
    host.controls = before;
    let mut runtime = house(&mut host);
    let photo = runtime.find("Master Bedroom photo table").unwrap();

    let (table, _) = host.world_transform(photo).unwrap();
    host.look_at(table + Vec3::new(0.0, 2.5, 0.0), table);
    runtime.update(1.0 / 60.0, &mut host);
    assert_eq!(runtime.focus(), Some(photo));

    let opened = runtime.handle_input(InputEvent::Interact, &mut host);
    assert_eq!(
        opened,
        Some(Interaction::Photo {
            texture: AssetRef::new("photos/family.png")
        })
    );
    assert_eq!(host.controls, PlayerControls::FROZEN);
    assert_eq!(host.photo, Some(AssetRef::new("photos/family.png")));
    assert_eq!(host.prompt.as_deref(), Some(PHOTO_DISMISS_PROMPT));

    // Frames while open leave the overlay prompt alone.
    run(&mut runtime, &mut host, 0.5);
    assert_eq!(host.prompt.as_deref(), Some(PHOTO_DISMISS_PROMPT));

    assert_eq!(runtime.handle_input(InputEvent::Interact, &mut host), None);
    assert!(!runtime.overlay().is_open());
    assert_eq!(host.controls, before);
    assert_eq!(host.photo, None);
    // Focus is back on the table.
    assert_eq!(host.prompt.as_deref(), Some("[E] Look at photo"));
}

#[test]
fn cancel_without_overlay_does_nothing() {
    let mut host = HeadlessHost::new();
    let mut runtime = house(&mut host);
    let switch = runtime.find("Kitchen switch").unwrap();
    face_switch(&mut host, switch, Vec3::new(-1.5, 0.0, 0.0));
    runtime.update(1.0 / 60.0, &mut host);
    let was_on = switch_state(&runtime, switch);
    assert_eq!(runtime.handle_input(InputEvent::Cancel, &mut host), None);
    assert_eq!(switch_state(&runtime, switch), was_on);
}

// ── Properties ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ancestor_walk_finds_interactable(depth in 0usize..200) {
        let mut world = World::new();
        let photo = world.spawn((
            Interactable::Photo(hearth_logic::interact::PhotoViewer::new(AssetRef::new("p.png"))),
        ));
        let mut hit = photo;
        for i in 0..depth {
            hit = world.spawn((Label(format!("part {i}")), Parent(hit)));
        }
        prop_assert_eq!(resolve_interactable(&world, hit), Some(photo));
    }

    #[test]
    fn overlay_restores_any_controls(
        speed in prop_oneof![Just(0.0f32), 0.0f32..20.0],
        sx in prop_oneof![Just(0.0f32), 0.0f32..200.0],
        sy in prop_oneof![Just(0.0f32), 0.0f32..200.0],
    ) {
        let mut host = HeadlessHost::new();
        let before = PlayerControls { speed, mouse_sensitivity: (sx, sy) };
        host.controls = before;
        let mut overlay = PhotoOverlay::new();
        prop_assert!(overlay.open(&mut host, &AssetRef::new("p.png")));
        prop_assert!(!overlay.open(&mut host, &AssetRef::new("q.png")));
        prop_assert!(overlay.close(&mut host));
        prop_assert_eq!(host.controls, before);
    }
}
