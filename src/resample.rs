//! Arc-length resampling of a polyline into marker positions.
//!
//! Markers always land on existing vertices. The walk accumulates segment
//! lengths and emits the current vertex once the running total reaches the
//! spacing, then restarts the total from zero rather than carrying the
//! overshoot. Actual spacing is therefore at least the requested spacing, off
//! by at most the length of the segment that crossed the threshold.

use egui::Pos2;

/// Lazy iterator over marker positions, see [`markers`]
#[derive(Debug, Clone)]
pub struct Markers<'a> {
    points: &'a [Pos2],
    spacing: f32,
    next: usize,
    walked: f32,
}

/// Walk `points` and yield every vertex at which the distance travelled since
/// the previous marker (or the start) reaches `spacing`.
///
/// Polylines with fewer than two points yield nothing, as does a spacing that
/// is not a positive finite number.
pub fn markers(points: &[Pos2], spacing: f32) -> Markers<'_> {
    let valid = spacing.is_finite() && spacing > 0.0;
    Markers {
        points: if valid { points } else { &[] },
        spacing,
        next: 1,
        walked: 0.0,
    }
}

impl Iterator for Markers<'_> {
    type Item = Pos2;

    fn next(&mut self) -> Option<Pos2> {
        while self.next < self.points.len() {
            let prev = self.points[self.next - 1];
            let current = self.points[self.next];
            self.next += 1;

            self.walked += prev.distance(current);
            if self.walked >= self.spacing {
                self.walked = 0.0;
                return Some(current);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.points.len().saturating_sub(self.next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_threshold_reached_at_second_vertex() {
        let points = [pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(25.0, 0.0)];
        let found: Vec<_> = markers(&points, 20.0).collect();
        assert_eq!(found, vec![pos2(25.0, 0.0)]);
    }

    #[test]
    fn test_degenerate_polylines_yield_nothing() {
        assert_eq!(markers(&[], 5.0).count(), 0);
        assert_eq!(markers(&[pos2(4.0, 4.0)], 5.0).count(), 0);
    }

    #[test]
    fn test_invalid_spacing_yields_nothing() {
        let points = [pos2(0.0, 0.0), pos2(100.0, 0.0)];
        assert_eq!(markers(&points, 0.0).count(), 0);
        assert_eq!(markers(&points, -3.0).count(), 0);
        assert_eq!(markers(&points, f32::NAN).count(), 0);
    }

    #[test]
    fn test_total_resets_instead_of_carrying_remainder() {
        // 15 + 15 crosses 20 at x=30, then the next 15 alone does not
        let points = [pos2(0.0, 0.0), pos2(15.0, 0.0), pos2(30.0, 0.0), pos2(45.0, 0.0)];
        let found: Vec<_> = markers(&points, 20.0).collect();
        assert_eq!(found, vec![pos2(30.0, 0.0)]);
    }

    #[test]
    fn test_exact_spacing_counts_as_reached() {
        let points = [pos2(0.0, 0.0), pos2(0.0, 10.0), pos2(0.0, 20.0)];
        let found: Vec<_> = markers(&points, 10.0).collect();
        assert_eq!(found, vec![pos2(0.0, 10.0), pos2(0.0, 20.0)]);
    }

    #[test]
    fn test_markers_are_vertices_with_enough_path_between_them() {
        let points: Vec<Pos2> = (0..60)
            .map(|i| {
                let t = i as f32 * 0.37;
                pos2(t.cos() * (10.0 + i as f32), t.sin() * 7.0 + i as f32)
            })
            .collect();
        let spacing = 12.5;
        let found: Vec<_> = markers(&points, spacing).collect();
        assert!(!found.is_empty());

        let mut cursor = 0;
        let mut last_index = 0;
        for marker in &found {
            let index = points[cursor..]
                .iter()
                .position(|p| p == marker)
                .map(|offset| cursor + offset)
                .expect("marker must be one of the polyline vertices");
            let path: f32 = points[last_index..=index]
                .windows(2)
                .map(|pair| pair[0].distance(pair[1]))
                .sum();
            assert!(path >= spacing, "path {path} shorter than spacing");
            last_index = index;
            cursor = index + 1;
        }
    }
}
