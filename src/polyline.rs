use egui::Pos2;

/// Positions sampled for the stroke in progress, in the order they arrived
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Pos2>,
}

impl Polyline {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    // Add a point to the end of the stroke
    pub fn push(&mut self, point: Pos2) {
        self.points.push(point);
    }

    // Drop every sampled point, keeping the allocation for the next stroke
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, one per drawable segment
    pub fn segments(&self) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Total path length walked along the polyline
    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

impl From<Vec<Pos2>> for Polyline {
    fn from(points: Vec<Pos2>) -> Self {
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_segments_pair_consecutive_points() {
        let line = Polyline::from(vec![pos2(0.0, 0.0), pos2(3.0, 4.0), pos2(3.0, 10.0)]);
        let segments: Vec<_> = line.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], (pos2(3.0, 4.0), pos2(3.0, 10.0)));
        assert_eq!(line.length(), 11.0);
    }

    #[test]
    fn test_single_point_has_no_segments() {
        let mut line = Polyline::new();
        line.push(pos2(1.0, 1.0));
        assert_eq!(line.segments().count(), 0);
        line.clear();
        assert!(line.is_empty());
    }
}
