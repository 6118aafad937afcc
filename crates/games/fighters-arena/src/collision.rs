use fighters_core::geometry::{Bounds, Rect};

/// Move a circle by (dx, dy), sliding along obstacles instead of stopping dead.
///
/// The full step is clamped to the bounds first. Each obstacle the running candidate
/// overlaps then retries the step one axis at a time against that obstacle alone: a free
/// axis replaces the candidate, both free keeps the diagonal, and when neither axis is free
/// the circle stays where it was. Obstacles are resolved in order, so a slide off one wall
/// can end inside an earlier one.
pub fn slide_move(
    x: f32,
    y: f32,
    radius: f32,
    dx: f32,
    dy: f32,
    obstacles: &[Rect],
    bounds: Bounds,
) -> (f32, f32) {
    let (mut cx, mut cy) = bounds.clamp_circle(x + dx, y + dy, radius);
    for rect in obstacles {
        if !rect.overlaps_circle(cx, cy, radius) {
            continue;
        }
        let x_free = !rect.overlaps_circle(x + dx, y, radius);
        let y_free = !rect.overlaps_circle(x, y + dy, radius);
        (cx, cy) = match (x_free, y_free) {
            (true, true) => (x + dx, y + dy),
            (true, false) => (x + dx, y),
            (false, true) => (x, y + dy),
            (false, false) => return (x, y),
        };
    }
    bounds.clamp_circle(cx, cy, radius)
}
