//! Continuous (swept) collision between a moving sphere and a moving
//! axis-aligned box.
//!
//! Everything here is pure floating point with no allocation and no
//! shared state: this is a per-tick-per-pair hot path, and it must be
//! trivially safe to call from parallel broad-phase workers even though
//! the surrounding simulation is single-threaded per tick.

use glam::{Vec2, Vec2Swizzles};

/// Does a sphere of `radius` touch the box at any point while both
/// bodies move linearly from their previous to their current placement
/// over one tick?
///
/// All positions are in the same space; the box may be moving too.
/// Testing the whole interval instead of the endpoints avoids tunneling
/// when either body moves further than its own size in one tick.
///
/// The test works in the box's frame (only relative placement and
/// relative motion matter), classifies the sphere's start position into
/// the inside / edge / vertex regions around the box, and dispatches:
/// an overlapping start accepts immediately, receding motion rejects,
/// and the remaining cases test the swept approach against the inflated
/// face slabs and the corner arcs.
///
/// Degenerate inputs (zero motion, zero radius) return definite
/// booleans; this function never panics.
pub fn sphere_aabb_sweep(
    radius: f32,
    box_half_extents: Vec2,
    sphere_prev: Vec2,
    sphere_curr: Vec2,
    box_prev: Vec2,
    box_curr: Vec2,
) -> bool {
    let start = sphere_prev - box_prev;
    let end = sphere_curr - box_curr;
    let motion = end - start;

    // Overlap at the start of the interval settles it immediately. This
    // covers the inside region and every edge/vertex start already
    // within the radius of its nearest face or corner.
    if box_gap_squared(start, box_half_extents) <= radius * radius {
        return true;
    }
    if motion == Vec2::ZERO {
        return false;
    }

    let outside_x = start.x.abs() > box_half_extents.x;
    let outside_y = start.y.abs() > box_half_extents.y;

    if outside_x && outside_y {
        vertex_sweep(radius, box_half_extents, start, motion)
    } else if outside_x {
        edge_sweep(radius, box_half_extents, start, motion)
    } else {
        // Outside on y only: swap axes and reuse the x-side edge test.
        edge_sweep(radius, box_half_extents.yx(), start.yx(), motion.yx())
    }
}

/// Squared gap between a point and the box surface; zero inside.
fn box_gap_squared(point: Vec2, half: Vec2) -> f32 {
    let gap_x = (point.x.abs() - half.x).max(0.0);
    let gap_y = (point.y.abs() - half.y).max(0.0);
    gap_x * gap_x + gap_y * gap_y
}

/// Start is beside exactly one face (outside on x, within the y span).
fn edge_sweep(radius: f32, half: Vec2, start: Vec2, motion: Vec2) -> bool {
    // Moving away from the separating face: the gap only grows.
    if start.x * motion.x >= 0.0 {
        return false;
    }
    if crosses_face(start, motion, half.x + radius, half.y) {
        return true;
    }
    // The crossing drifted past the face span, so the contact, if any,
    // is around one of this face's corner arcs.
    let face_x = start.x.signum() * half.x;
    sweeps_past_corner(start, motion, Vec2::new(face_x, half.y), radius)
        || sweeps_past_corner(start, motion, Vec2::new(face_x, -half.y), radius)
}

/// Start is in a corner quadrant (outside on both axes).
fn vertex_sweep(radius: f32, half: Vec2, start: Vec2, motion: Vec2) -> bool {
    // Receding on both separating axes: every per-axis gap grows.
    if start.x * motion.x >= 0.0 && start.y * motion.y >= 0.0 {
        return false;
    }
    if crosses_face(start, motion, half.x + radius, half.y)
        || crosses_face(start.yx(), motion.yx(), half.y + radius, half.x)
    {
        return true;
    }
    // Neither flat was crossed inside its span; the only remaining
    // contacts are the corner arcs.
    sweeps_past_corner(start, motion, Vec2::new(half.x, half.y), radius)
        || sweeps_past_corner(start, motion, Vec2::new(-half.x, half.y), radius)
        || sweeps_past_corner(start, motion, Vec2::new(half.x, -half.y), radius)
        || sweeps_past_corner(start, motion, Vec2::new(-half.x, -half.y), radius)
}

/// Ray–slab test against one inflated face: does the swept center cross
/// the plane at `plane_x` on its own side of the box, within the face
/// span on the perpendicular axis, inside the tick interval?
fn crosses_face(start: Vec2, motion: Vec2, plane_x: f32, half_y: f32) -> bool {
    if start.x.abs() <= plane_x {
        // Already inside this inflated band; entry, if any, is not
        // through this flat.
        return false;
    }
    let approach = -motion.x * start.x.signum();
    if approach <= 0.0 {
        return false;
    }
    let t = (start.x.abs() - plane_x) / approach;
    if t > 1.0 {
        return false;
    }
    (start.y + motion.y * t).abs() <= half_y
}

/// Swept distance-vs-radius test against one corner point: the motion's
/// perpendicular offset from the corner, compared against the radius
/// scaled by the motion length (`|motion x to_corner| <= r * |motion|`),
/// with endpoint handling when the closest approach falls outside the
/// tick interval.
fn sweeps_past_corner(start: Vec2, motion: Vec2, corner: Vec2, radius: f32) -> bool {
    let to_corner = corner - start;
    let r_squared = radius * radius;

    let along = to_corner.dot(motion);
    if along <= 0.0 {
        // Closest approach is the start of the interval.
        return to_corner.length_squared() <= r_squared;
    }

    let motion_squared = motion.length_squared();
    if along >= motion_squared {
        // Closest approach is the end of the interval.
        return (to_corner - motion).length_squared() <= r_squared;
    }

    let cross = motion.perp_dot(to_corner);
    cross * cross <= r_squared * motion_squared
}
