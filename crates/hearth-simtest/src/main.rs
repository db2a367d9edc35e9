//! Hearth Headless Harness
//!
//! Builds the house, spawns it into the headless host and plays scripted
//! frames and interactions. Runs entirely in-process: no engine, no window.
//!
//! Usage:
//!   cargo run -p hearth-simtest
//!   cargo run -p hearth-simtest -- --verbose
//!   cargo run -p hearth-simtest -- --config house.json --dump

use std::path::PathBuf;

use hearth_core::interaction::resolve_interactable;
use hearth_core::prelude::*;
use hearth_logic::flicker::{FlickerController, FlickerProfile};
use hearth_logic::geometry::{validate_all, Severity};
use hearth_logic::interact::{Interaction, LightSwitch, PHOTO_DISMISS_PROMPT};
use hearth_logic::level::{build_house, HouseConfig};
use hearth_logic::plan::{LevelPlan, PlanSummary, PropId, ScriptedEvent};
use hearth_logic::primitives::{Color, Vec3};
use hearth_logic::room::{build_room, Direction, Point2, RoomSpec};
use hearth_logic::segments::{compute_segments, GapSpec};
use hecs::Entity;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

struct Args {
    verbose: bool,
    dump: bool,
    config: Option<PathBuf>,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        verbose: false,
        dump: false,
        config: None,
    };
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--dump" => args.dump = true,
            "--config" => match iter.next() {
                Some(path) if !path.starts_with("--") => args.config = Some(PathBuf::from(path)),
                _ => return Err("--config needs a path".to_string()),
            },
            other => eprintln!("ignoring unknown argument '{other}'"),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&PathBuf>) -> Result<HouseConfig, String> {
    let Some(path) = path else {
        return Ok(HouseConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

#[derive(Serialize)]
struct Dump<'a> {
    config: &'a HouseConfig,
    summary: PlanSummary,
    errors: usize,
    warnings: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    println!("=== Hearth Headless Harness ===\n");

    let config = match load_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("could not load config: {e}");
            std::process::exit(2);
        }
    };
    info!("config: {} floors, seed {}", config.floors.len(), config.seed);

    let mut results = Vec::new();

    // 1. Wall segmentation
    results.extend(validate_segments(args.verbose));

    // 2. Single room construction
    results.extend(validate_room(args.verbose));

    // 3. Interactive state machines
    results.extend(validate_state_machines(args.verbose));

    // 4. Whole-house layout
    let plan = match build_house(&config) {
        Ok(plan) => plan,
        Err(e) => {
            results.push(TestResult::new("house_build", false, e.to_string()));
            report(&results, args.verbose);
            std::process::exit(1);
        }
    };
    results.extend(validate_house(&plan, args.verbose));

    // 5. Runtime frames and interactions
    results.extend(validate_runtime(&config, args.verbose));

    // 6. Asset fallback
    results.extend(validate_asset_fallback(&config, args.verbose));

    if args.dump {
        let diagnostics = validate_all(&plan);
        let dump = Dump {
            config: &config,
            summary: plan.summary(),
            errors: diagnostics.iter().filter(|d| d.severity == Severity::Error).count(),
            warnings: diagnostics.iter().filter(|d| d.severity == Severity::Warning).count(),
        };
        match serde_json::to_string_pretty(&dump) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("dump failed: {e}"),
        }
    }

    if !report(&results, args.verbose) {
        std::process::exit(1);
    }
}

/// Print the summary. Returns whether everything passed.
fn report(results: &[TestResult], verbose: bool) -> bool {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, results.len(), failed);
    failed == 0
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── 1. Segments ─────────────────────────────────────────────────────────

fn validate_segments(verbose: bool) -> Vec<TestResult> {
    println!("--- Wall Segmentation ---");
    let mut results = Vec::new();

    match compute_segments(-15.0, 15.0, &[GapSpec::new(0.0, 6.0)]) {
        Ok(segments) => {
            let ok = segments.len() == 2
                && close(segments[0].center, -9.0)
                && close(segments[0].length, 12.0)
                && close(segments[1].center, 9.0)
                && close(segments[1].length, 12.0);
            results.push(TestResult::new(
                "segments_symmetric_gap",
                ok,
                format!("{} segments: {:?}", segments.len(), segments),
            ));
        }
        Err(e) => results.push(TestResult::new("segments_symmetric_gap", false, e.to_string())),
    }

    let gaps = [GapSpec::door(-10.0), GapSpec::door(0.0), GapSpec::door(10.0)];
    match compute_segments(-15.0, 15.0, &gaps) {
        Ok(segments) => {
            let total: f32 = segments.iter().map(|s| s.length).sum();
            results.push(TestResult::new(
                "segments_total_length",
                close(total, 30.0 - 6.0),
                format!("{} segments, {:.2} units of wall", segments.len(), total),
            ));
        }
        Err(e) => results.push(TestResult::new("segments_total_length", false, e.to_string())),
    }

    let unsorted = compute_segments(-15.0, 15.0, &[GapSpec::door(5.0), GapSpec::door(-5.0)]);
    results.push(TestResult::new(
        "segments_reject_unsorted",
        unsorted.is_err(),
        match unsorted {
            Ok(_) => "accepted unsorted gaps".to_string(),
            Err(e) => e.to_string(),
        },
    ));

    let overlapping = compute_segments(-15.0, 15.0, &[GapSpec::new(0.0, 4.0), GapSpec::new(1.0, 4.0)]);
    results.push(TestResult::new(
        "segments_reject_overlap",
        overlapping.is_err(),
        match overlapping {
            Ok(_) => "accepted overlapping gaps".to_string(),
            Err(e) => e.to_string(),
        },
    ));

    if verbose {
        println!("  {} segmentation checks", results.len());
    }
    results
}

// ── 2. Room ─────────────────────────────────────────────────────────────

fn validate_room(verbose: bool) -> Vec<TestResult> {
    println!("--- Room Construction ---");
    let mut results = Vec::new();

    let mut plan = LevelPlan::new();
    let spec = RoomSpec::new("Living Room", Point2::new(-9.0, 0.0), (8.0, 8.0), Direction::West);
    if let Err(e) = build_room(&spec, &mut plan) {
        results.push(TestResult::new("room_build", false, e.to_string()));
        return results;
    }

    let door_x = plan.doors.first().map(|d| d.position.x);
    results.push(TestResult::new(
        "room_door_on_east_wall",
        door_x.is_some_and(|x| close(x, -5.0)),
        format!("door at x={door_x:?}"),
    ));

    let switch_on = plan.switches.first().map(|s| s.start_on);
    let light_on = plan.lights.first().map(|l| l.enabled);
    results.push(TestResult::new(
        "room_switch_starts_on",
        switch_on == Some(true) && light_on == Some(true),
        format!("switch {switch_on:?}, light {light_on:?}"),
    ));

    for dir in Direction::ALL {
        let mut plan = LevelPlan::new();
        let spec = RoomSpec::new("Probe", Point2::new(0.0, 0.0), (6.0, 7.0), dir);
        let openings = build_room(&spec, &mut plan).map(|_| plan.rooms[0].openings().count());
        results.push(TestResult::new(
            &format!("room_single_opening_{dir:?}").to_lowercase(),
            matches!(openings, Ok(1)),
            format!("{openings:?} openings"),
        ));
    }

    let bad = build_room(
        &RoomSpec::new("Broken", Point2::new(0.0, 0.0), (0.0, 5.0), Direction::North),
        &mut LevelPlan::new(),
    );
    results.push(TestResult::new(
        "room_rejects_zero_width",
        bad.is_err(),
        format!("{bad:?}"),
    ));

    if verbose {
        println!("  {} primitives in the probe room", plan.primitives.len());
    }
    results
}

// ── 3. State machines ───────────────────────────────────────────────────

fn validate_state_machines(verbose: bool) -> Vec<TestResult> {
    println!("--- State Machines ---");
    let mut results = Vec::new();

    // First activation, both interpretations of the starting state.
    let event = ScriptedEvent::Reveal(PropId(0));
    for start_on in [false, true] {
        let mut switch = LightSwitch::new(start_on).with_first_activate(event);
        let fired = (0..6).filter(|_| switch.toggle().fired.is_some()).count();
        let expected = usize::from(!start_on);
        results.push(TestResult::new(
            &format!("switch_first_activate_start_{}", if start_on { "on" } else { "off" }),
            fired == expected,
            format!("fired {fired} times over 6 toggles (expected {expected})"),
        ));
    }

    // Flicker stays within [0, 1] for every preset, including huge and zero dt.
    let mut rng = StdRng::seed_from_u64(42);
    for (name, profile) in [
        ("steady_dim", FlickerProfile::steady_dim()),
        ("unstable", FlickerProfile::unstable()),
        ("strobe", FlickerProfile::strobe()),
    ] {
        let mut controller = match FlickerController::new(Color::WHITE, profile) {
            Ok(c) => c,
            Err(e) => {
                results.push(TestResult::new(&format!("flicker_{name}"), false, e.to_string()));
                continue;
            }
        };
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for i in 0..2000 {
            let dt = match i % 4 {
                0 => 0.0,
                1 => 1.0 / 60.0,
                2 => 0.25,
                _ => 3.0,
            };
            controller.update(dt, &mut rng);
            lo = lo.min(controller.intensity());
            hi = hi.max(controller.intensity());
        }
        results.push(TestResult::new(
            &format!("flicker_{name}_bounded"),
            (0.0..=1.0).contains(&lo) && (0.0..=1.0).contains(&hi),
            format!("intensity in [{lo:.3}, {hi:.3}]"),
        ));
    }

    if verbose {
        println!("  {} state machine checks", results.len());
    }
    results
}

// ── 4. House layout ─────────────────────────────────────────────────────

fn validate_house(plan: &LevelPlan, verbose: bool) -> Vec<TestResult> {
    println!("--- House Layout ---");
    let mut results = Vec::new();
    let summary = plan.summary();

    results.push(TestResult::new(
        "house_every_room_has_switch",
        summary.switches == summary.rooms && summary.doors == summary.rooms,
        format!(
            "{} rooms, {} doors, {} switches",
            summary.rooms, summary.doors, summary.switches
        ),
    ));

    let diagnostics = validate_all(plan);
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.severity == Severity::Error).collect();
    let warnings = diagnostics.len() - errors.len();
    results.push(TestResult::new(
        "house_geometry_valid",
        errors.is_empty(),
        if errors.is_empty() {
            format!("no errors, {warnings} warnings")
        } else {
            errors
                .iter()
                .map(|e| format!("[{}] {}", e.category, e.message))
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    if verbose {
        for d in diagnostics.iter().filter(|d| d.severity == Severity::Warning) {
            println!("  warning [{}] {}", d.category, d.message);
        }
        println!(
            "  {} primitives, {} lights ({} flickering), {} photos, {} props",
            summary.primitives, summary.lights, summary.flickering_lights, summary.photos, summary.props
        );
    }
    results
}

// ── 5. Runtime ──────────────────────────────────────────────────────────

fn switch_is_on(runtime: &LevelRuntime, switch: Entity) -> Option<bool> {
    match *runtime.world.get::<&Interactable>(switch).ok()? {
        Interactable::Switch(ref s) => Some(s.is_on()),
        _ => None,
    }
}

fn lights_match_switches(runtime: &LevelRuntime, host: &HeadlessHost) -> Vec<String> {
    let mut mismatches = Vec::new();
    for &switch in &runtime.level().switches {
        let Some(light) = runtime.world.get::<&SwitchWiring>(switch).ok().and_then(|w| w.light) else {
            continue;
        };
        let world_on = runtime.world.get::<&PointLight>(light).map(|l| l.enabled).ok();
        let host_on = host.light(light).map(|l| l.enabled);
        let is_on = switch_is_on(runtime, switch);
        if world_on != is_on || host_on != is_on {
            mismatches.push(format!("{switch:?}: switch {is_on:?}, light {world_on:?}/{host_on:?}"));
        }
    }
    mismatches
}

fn validate_runtime(config: &HouseConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Runtime ---");
    let mut results = Vec::new();
    let mut host = HeadlessHost::new();
    let mut runtime = match LevelRuntime::from_config(config, &mut host) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult::new("runtime_spawn", false, e.to_string()));
            return results;
        }
    };

    let mismatches = lights_match_switches(&runtime, &host);
    results.push(TestResult::new(
        "runtime_lights_follow_switches_at_spawn",
        mismatches.is_empty(),
        if mismatches.is_empty() {
            format!("{} switches in sync", runtime.level().switches.len())
        } else {
            mismatches.join("; ")
        },
    ));

    // Ten seconds of frames with nothing focused.
    for _ in 0..600 {
        runtime.update(1.0 / 60.0, &mut host);
    }
    let out_of_range = runtime
        .flickers()
        .iter()
        .filter(|(_, c)| !(0.0..=1.0).contains(&c.intensity()))
        .count();
    results.push(TestResult::new(
        "runtime_flicker_bounded",
        out_of_range == 0,
        format!("{} flickering lights, {} out of range", runtime.flickers().len(), out_of_range),
    ));

    // Flip every switch from the corridor side, twice.
    let switches = runtime.level().switches.clone();
    let mut focused = 0;
    for round in 0..2 {
        for &switch in &switches {
            let Some((target, yaw)) = host.world_transform(switch) else {
                continue;
            };
            // Stand in front of the plate's face (its local -Z).
            let front = Vec3::new(0.0, 0.0, -1.5).rotate_y(yaw);
            host.look_at(target + front, target);
            runtime.update(1.0 / 60.0, &mut host);
            if runtime.focus() != Some(switch) {
                continue;
            }
            if round == 0 {
                focused += 1;
            }
            runtime.handle_input(InputEvent::Interact, &mut host);
        }
    }
    let mismatches = lights_match_switches(&runtime, &host);
    results.push(TestResult::new(
        "runtime_switches_reachable",
        focused == switches.len(),
        format!("{}/{} switches focused from their front", focused, switches.len()),
    ));
    results.push(TestResult::new(
        "runtime_lights_follow_switches_after_toggles",
        mismatches.is_empty(),
        if mismatches.is_empty() {
            "all in sync after two rounds".to_string()
        } else {
            mismatches.join("; ")
        },
    ));

    let revealed = runtime
        .level()
        .props
        .iter()
        .filter(|&&p| host.is_visible(p))
        .count();
    results.push(TestResult::new(
        "runtime_scares_revealed",
        revealed == runtime.level().props.len(),
        format!("{}/{} hidden props revealed", revealed, runtime.level().props.len()),
    ));

    results.extend(validate_doors(&mut runtime, &mut host));
    results.extend(validate_photo(&mut runtime, &mut host));

    if verbose {
        println!(
            "  {:.1}s simulated, {} prompt writes, {} crosshair writes",
            runtime.elapsed(),
            host.prompt_writes,
            host.crosshair_writes
        );
    }
    results
}

fn validate_doors(runtime: &mut LevelRuntime, host: &mut HeadlessHost) -> Vec<TestResult> {
    let mut results = Vec::new();
    let doors = runtime.level().doors.clone();
    let mut resolved = 0;
    let mut swung = 0;

    for &door in &doors {
        let Some(leaf) = host.nodes.iter().find(|(_, n)| n.parent == Some(door)).map(|(e, _)| *e) else {
            continue;
        };
        let (Some((target, _)), Some((hinge, _))) = (host.world_transform(leaf), host.world_transform(door)) else {
            continue;
        };
        let open_yaw = match runtime.world.get::<&Interactable>(door).as_deref() {
            Ok(Interactable::Door(d)) => d.open_yaw(),
            _ => continue,
        };

        // Approach square-on from the side the leaf does not swing into.
        let inward = (target - hinge).rotate_y(open_yaw).normalize();
        host.look_at(target - inward * 1.5, target);
        let hit = host.raycast(host.view_ray(), 5.0);
        if hit == Some(leaf) && resolve_interactable(&runtime.world, leaf) == Some(door) {
            resolved += 1;
        }

        runtime.update(1.0 / 60.0, host);
        if runtime.focus() != Some(door) {
            continue;
        }
        let opened = runtime.handle_input(InputEvent::Interact, host);
        for _ in 0..45 {
            runtime.update(1.0 / 60.0, host);
        }
        let yaw = host.node(door).map(|n| n.yaw);
        if opened == Some(Interaction::Door { open: true }) && yaw.is_some_and(|y| close(y, open_yaw)) {
            swung += 1;
        }
    }

    results.push(TestResult::new(
        "runtime_door_leaves_resolve_to_pivots",
        resolved == doors.len(),
        format!("{}/{} leaves resolved", resolved, doors.len()),
    ));
    results.push(TestResult::new(
        "runtime_doors_swing_open",
        swung == doors.len(),
        format!("{}/{} doors reached their open angle", swung, doors.len()),
    ));
    results
}

fn validate_photo(runtime: &mut LevelRuntime, host: &mut HeadlessHost) -> Vec<TestResult> {
    let mut results = Vec::new();
    let Some(&photo) = runtime.level().photos.first() else {
        return results;
    };
    let Some((table, _)) = host.world_transform(photo) else {
        return results;
    };

    let before = PlayerControls {
        speed: 3.0,
        mouse_sensitivity: (0.0, 17.5),
    };
    host.controls = before;
    host.look_at(table + Vec3::new(0.0, 2.5, 0.0), table);
    runtime.update(1.0 / 60.0, host);
    let opened = matches!(
        runtime.handle_input(InputEvent::Interact, host),
        Some(Interaction::Photo { .. })
    );
    let frozen = host.controls == PlayerControls::FROZEN && host.prompt.as_deref() == Some(PHOTO_DISMISS_PROMPT);
    runtime.handle_input(InputEvent::Cancel, host);
    let restored = host.controls == before && host.photo.is_none();

    results.push(TestResult::new(
        "runtime_photo_overlay",
        opened && frozen && restored,
        format!("opened {opened}, frozen {frozen}, restored {restored}"),
    ));
    results
}

// ── 6. Asset fallback ───────────────────────────────────────────────────

fn validate_asset_fallback(config: &HouseConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Asset Fallback ---");
    let mut host = HeadlessHost::new();
    for path in ["photos/family.png", "photos/nursery.png", "photos/wedding.png"] {
        host = host.with_missing_asset(path);
    }
    let result = LevelRuntime::from_config(config, &mut host);
    if verbose {
        if let Ok(runtime) = &result {
            println!("  {} placeholder materials", runtime.level().fallbacks);
        }
    }
    vec![TestResult::new(
        "assets_missing_textures_tolerated",
        result.is_ok(),
        match result {
            Ok(runtime) => format!("{} fallbacks", runtime.level().fallbacks),
            Err(e) => e.to_string(),
        },
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_flags_and_config() {
        let parsed = args(&["--verbose", "--config", "house.json"]).unwrap();
        assert!(parsed.verbose);
        assert!(!parsed.dump);
        assert_eq!(parsed.config, Some(PathBuf::from("house.json")));
    }

    #[test]
    fn test_config_without_path_is_an_error() {
        assert!(args(&["--config"]).is_err());
        assert!(args(&["--config", "--dump"]).is_err());
    }
}
