//! Geometry validation for assembled level plans.
//!
//! Pure functions over a `LevelPlan` that return validation errors instead
//! of failing. Construction already rejects malformed input; these checks
//! catch layouts that are well-formed but wrong.

use std::collections::HashMap;

use crate::constants::{doors, switches};
use crate::plan::{DoorPlacement, LevelPlan, RoomId, ScriptedEvent};
use crate::primitives::{Aabb, Vec3};

/// A geometry validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

const TOLERANCE: f32 = 0.01;

// ── A. Room geometry (per-room) ─────────────────────────────────────────

/// Check that no room has zero or negative dimensions.
pub fn check_room_dimensions(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in &plan.rooms {
        let f = &r.footprint;
        if f.width <= 0.0 || f.depth <= 0.0 {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!("Room '{}' has non-positive dimensions: {}×{}", f.label, f.width, f.depth),
            });
        }
    }
    errors
}

/// Check that every room has exactly one wall with an opening.
pub fn check_single_opening(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in &plan.rooms {
        let count = r.openings().count();
        if count != 1 {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!("Room '{}' has {} openings, expected 1", r.footprint.label, count),
            });
        }
    }
    errors
}

/// Check that sub-rooms lie strictly inside their parent.
pub fn check_sub_rooms_inside(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in &plan.rooms {
        let Some(parent) = r.parent.and_then(|id| plan.room(id)) else {
            continue;
        };
        let (ax0, az0, ax1, az1) = r.bounds();
        let (px0, pz0, px1, pz1) = parent.bounds();
        if ax0 <= px0 || az0 <= pz0 || ax1 >= px1 || az1 >= pz1 {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Sub-room '{}' is not inside '{}'",
                    r.footprint.label, parent.footprint.label
                ),
            });
        }
    }
    errors
}

// ── B. Room-to-room (pairwise) ──────────────────────────────────────────

/// Check no two top-level rooms on the same floor overlap. Touching walls
/// are fine.
pub fn check_room_overlaps(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let tolerance = 0.1;

    // Group rooms by floor height
    let mut by_floor: HashMap<i32, Vec<usize>> = HashMap::new();
    for (i, r) in plan.rooms.iter().enumerate() {
        if r.parent.is_none() {
            let key = (r.footprint.center.y * 100.0).round() as i32;
            by_floor.entry(key).or_default().push(i);
        }
    }

    for ids in by_floor.values() {
        for (n, &i) in ids.iter().enumerate() {
            for &j in &ids[n + 1..] {
                let a = plan.rooms[i].bounds();
                let b = plan.rooms[j].bounds();
                let overlap_x = a.2 - tolerance > b.0 && b.2 - tolerance > a.0;
                let overlap_z = a.3 - tolerance > b.1 && b.3 - tolerance > a.1;
                if overlap_x && overlap_z {
                    errors.push(ValidationError {
                        category: "room_overlap",
                        severity: Severity::Error,
                        message: format!(
                            "Rooms '{}' and '{}' overlap at height {}",
                            plan.rooms[i].footprint.label,
                            plan.rooms[j].footprint.label,
                            plan.rooms[i].footprint.center.y
                        ),
                    });
                }
            }
        }
    }
    errors
}

// ── C. Doors ────────────────────────────────────────────────────────────

/// Check that every room's door sits in its opening: on the wall line and
/// centered on the gap.
pub fn check_door_alignment(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, r) in plan.rooms.iter().enumerate() {
        let Some(wall) = r.openings().next() else {
            continue; // caught by the opening check
        };
        let Some(gap) = wall.opening else {
            continue;
        };
        let placed: Vec<&DoorPlacement> = plan.doors_of(RoomId(i)).collect();
        if placed.len() != 1 {
            errors.push(ValidationError {
                category: "door_validity",
                severity: Severity::Error,
                message: format!("Room '{}' has {} doors, expected 1", r.footprint.label, placed.len()),
            });
            continue;
        }
        let door = placed[0];
        let along = wall.axis.component(door.position);
        let across = wall.axis.other().component(door.position);
        if (along - gap.center).abs() > TOLERANCE || (across - wall.across).abs() > TOLERANCE {
            errors.push(ValidationError {
                category: "door_validity",
                severity: Severity::Error,
                message: format!(
                    "Door '{}' at ({:.2}, {:.2}) is off its opening at {:.2} on wall {:.2}",
                    door.label, door.position.x, door.position.z, gap.center, wall.across
                ),
            });
        }
        if (gap.width - doors::WIDTH).abs() > TOLERANCE {
            errors.push(ValidationError {
                category: "door_validity",
                severity: Severity::Warning,
                message: format!("Room '{}' opening is {} wide, door is {}", r.footprint.label, gap.width, doors::WIDTH),
            });
        }
    }
    errors
}

/// Floor-plan area a door leaf sweeps between closed and open.
pub fn swing_bounds(door: &DoorPlacement) -> Aabb {
    let radius = door.position - door.hinge;
    let closed_tip = radius * 2.0;
    let open_tip = closed_tip.rotate_y(door.open_yaw);
    let corners = [Vec3::ZERO, closed_tip, open_tip, closed_tip + open_tip];
    let half = doors::THICKNESS / 2.0;
    let mut min = Vec3::new(f32::INFINITY, 0.0, f32::INFINITY);
    let mut max = Vec3::new(f32::NEG_INFINITY, 0.0, f32::NEG_INFINITY);
    for c in corners {
        min = Vec3::new(min.x.min(c.x), 0.0, min.z.min(c.z));
        max = Vec3::new(max.x.max(c.x), 0.0, max.z.max(c.z));
    }
    let bottom = door.hinge.y - doors::HEIGHT / 2.0;
    Aabb::new(
        Vec3::new(door.hinge.x + min.x - half, bottom, door.hinge.z + min.z - half),
        Vec3::new(door.hinge.x + max.x + half, bottom + doors::HEIGHT, door.hinge.z + max.z + half),
    )
}

// ── D. Fixtures ─────────────────────────────────────────────────────────

/// Check that no switch plate sits inside any door's swing.
pub fn check_switch_clearance(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let (pw, ph, pd) = switches::PLATE;
    let swings: Vec<(&DoorPlacement, Aabb)> = plan.doors.iter().map(|d| (d, swing_bounds(d))).collect();
    for s in &plan.switches {
        let plate = Aabb::from_rotated(s.position, Vec3::new(pw, ph, pd), s.yaw);
        for (door, swing) in &swings {
            if plate.overlaps(swing, TOLERANCE) {
                errors.push(ValidationError {
                    category: "fixture_clearance",
                    severity: Severity::Error,
                    message: format!("Switch '{}' is inside the swing of '{}'", s.label, door.label),
                });
            }
        }
    }
    errors
}

/// Check that no switch plate is buried in a wall or any other solid
/// primitive.
pub fn check_switch_mounting(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let (pw, ph, pd) = switches::PLATE;
    for s in &plan.switches {
        let plate = Aabb::from_rotated(s.position, Vec3::new(pw, ph, pd), s.yaw);
        for p in plan.primitives.iter().filter(|p| p.collider) {
            if plate.overlaps(&p.bounds(), TOLERANCE) {
                errors.push(ValidationError {
                    category: "fixture_clearance",
                    severity: Severity::Error,
                    message: format!("Switch '{}' intersects '{}'", s.label, p.label),
                });
            }
        }
    }
    errors
}

/// Check that hidden props are wired to something that reveals them.
pub fn check_hidden_props_reachable(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, prop) in plan.props.iter().enumerate() {
        if !prop.hidden {
            continue;
        }
        let revealed = plan.switches.iter().any(|s| {
            matches!(s.on_first_activate, Some(ScriptedEvent::Reveal(p)) if p.0 == i)
        });
        if !revealed {
            errors.push(ValidationError {
                category: "fixture_wiring",
                severity: Severity::Warning,
                message: format!("Hidden prop '{}' is never revealed", prop.primitive.label),
            });
        }
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all geometry validations and return combined results.
pub fn validate_all(plan: &LevelPlan) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(plan));
    all.extend(check_single_opening(plan));
    all.extend(check_sub_rooms_inside(plan));
    all.extend(check_room_overlaps(plan));
    all.extend(check_door_alignment(plan));
    all.extend(check_switch_clearance(plan));
    all.extend(check_switch_mounting(plan));
    all.extend(check_hidden_props_reachable(plan));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{build_house, HouseConfig};
    use crate::room::{build_room, Direction, Point2, RoomSpec};

    fn room_plan(dir: Direction) -> LevelPlan {
        let mut plan = LevelPlan::new();
        build_room(&RoomSpec::new("r", Point2::new(0.0, 0.0), (8.0, 8.0), dir), &mut plan).unwrap();
        plan
    }

    #[test]
    fn test_single_room_validates_clean() {
        for dir in Direction::ALL {
            let errs = validate_all(&room_plan(dir));
            assert!(errs.is_empty(), "{dir:?}: {errs:?}");
        }
    }

    #[test]
    fn test_default_house_validates_clean() {
        let plan = build_house(&HouseConfig::default()).unwrap();
        let errs: Vec<_> = validate_all(&plan)
            .into_iter()
            .filter(|e| e.severity == Severity::Error)
            .collect();
        assert!(errs.is_empty(), "{errs:?}");
    }

    #[test]
    fn test_missing_opening_flagged() {
        let mut plan = room_plan(Direction::North);
        plan.rooms[0].walls.iter_mut().for_each(|w| w.opening = None);
        let errs = check_single_opening(&plan);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("0 openings"));
    }

    #[test]
    fn test_misplaced_door_flagged() {
        let mut plan = room_plan(Direction::West);
        plan.doors[0].position.z += 1.0;
        let errs = check_door_alignment(&plan);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].category, "door_validity");
    }

    #[test]
    fn test_switch_in_door_swing_flagged() {
        let mut plan = room_plan(Direction::North);
        let door = plan.doors[0].clone();
        // Into the room, half a door from the hinge.
        plan.switches[0].position = door.hinge + Vec3::new(0.5, 0.0, 0.5);
        let errs = check_switch_clearance(&plan);
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_switch_buried_in_wall_flagged() {
        let mut plan = room_plan(Direction::South);
        assert!(check_switch_mounting(&plan).is_empty());
        // Back onto the south wall's line, well clear of the door on the north.
        plan.switches[0].position = Vec3::new(2.0, 1.5, -4.0);
        let errs = check_switch_mounting(&plan);
        assert!(!errs.is_empty());
        assert!(errs.iter().all(|e| e.category == "fixture_clearance"));
    }

    #[test]
    fn test_overlapping_rooms_flagged() {
        let mut plan = LevelPlan::new();
        build_room(&RoomSpec::new("a", Point2::new(0.0, 0.0), (8.0, 8.0), Direction::North), &mut plan).unwrap();
        build_room(&RoomSpec::new("b", Point2::new(4.0, 4.0), (8.0, 8.0), Direction::North), &mut plan).unwrap();
        let errs = check_room_overlaps(&plan);
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn test_rooms_on_different_floors_may_overlap() {
        let mut plan = LevelPlan::new();
        build_room(&RoomSpec::new("a", Point2::new(0.0, 0.0), (8.0, 8.0), Direction::North), &mut plan).unwrap();
        let mut upper = RoomSpec::new("b", Point2::new(0.0, 0.0), (8.0, 8.0), Direction::North);
        upper.base_height = 4.0;
        build_room(&upper, &mut plan).unwrap();
        assert!(check_room_overlaps(&plan).is_empty());
    }
}
