//! Catmull-Rom interpolation along closed waypoint loops.
//!
//! Pure math on `cgmath` vectors, no scene or GPU dependencies.

use cgmath::Vector3;

/// Fewest waypoints a path needs before it moves
pub const MIN_WAYPOINTS: usize = 4;

/// Uniform Catmull-Rom spline through `p1` (t = 0) and `p2` (t = 1).
pub fn catmull_rom(
    p0: Vector3<f32>,
    p1: Vector3<f32>,
    p2: Vector3<f32>,
    p3: Vector3<f32>,
    t: f32,
) -> Vector3<f32> {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Progress of one object around a closed loop of waypoints.
///
/// The waypoint list is treated as a cycle: segment `i` runs from waypoint
/// `i` to waypoint `i + 1 (mod N)` and is shaped by its two neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath {
    waypoints: Vec<Vector3<f32>>,
    current: usize,
    t: f32,
    /// Segments per second
    pub speed: f32,
}

impl WaypointPath {
    pub fn new(waypoints: Vec<Vector3<f32>>, speed: f32) -> Self {
        Self {
            waypoints,
            current: 0,
            t: 0.0,
            speed,
        }
    }

    pub fn waypoints(&self) -> &[Vector3<f32>] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the waypoint the current segment starts at
    pub fn current_waypoint(&self) -> usize {
        self.current
    }

    /// Parameter along the current segment, in [0, 1)
    pub fn t(&self) -> f32 {
        self.t
    }

    /// Whether the path has enough waypoints to move along
    pub fn is_animated(&self) -> bool {
        self.waypoints.len() >= MIN_WAYPOINTS
    }

    pub fn push(&mut self, waypoint: Vector3<f32>) {
        self.waypoints.push(waypoint);
    }

    /// Back to the first waypoint with t = 0
    pub fn reset(&mut self) {
        self.current = 0;
        self.t = 0.0;
    }

    /// Control point indices `[i0, i1, i2, i3]` of the current segment
    pub fn segment_indices(&self) -> Option<[usize; 4]> {
        if !self.is_animated() {
            return None;
        }
        let n = self.waypoints.len();
        let i1 = self.current % n;
        Some([(i1 + n - 1) % n, i1, (i1 + 1) % n, (i1 + 2) % n])
    }

    /// Position at the current segment and parameter
    pub fn sample(&self) -> Option<Vector3<f32>> {
        let [i0, i1, i2, i3] = self.segment_indices()?;
        let w = &self.waypoints;
        Some(catmull_rom(w[i0], w[i1], w[i2], w[i3], self.t))
    }

    /// Returns the position for this tick, then advances by `speed * delta_time`.
    ///
    /// Crossing the end of a segment resets t to 0 and moves on exactly one
    /// waypoint. Paths with fewer than [`MIN_WAYPOINTS`] return `None` and do
    /// not change.
    pub fn advance(&mut self, delta_time: f32) -> Option<Vector3<f32>> {
        let position = self.sample()?;

        self.t += self.speed * delta_time;
        if self.t >= 1.0 {
            self.t = 0.0;
            self.current = (self.current + 1) % self.waypoints.len();
        }

        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    fn square() -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(4.0, 0.0, 4.0),
            Vector3::new(0.0, 2.0, 4.0),
        ]
    }

    #[test]
    fn test_catmull_rom_hits_inner_control_points() {
        let [a, b, c, d] = [
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(2.0, 1.0, 3.0),
            Vector3::new(3.0, -2.0, 1.0),
        ];
        assert_close(catmull_rom(a, b, c, d, 0.0), b);
        assert_close(catmull_rom(a, b, c, d, 1.0), c);
    }

    #[test]
    fn test_closed_loop_passes_through_every_waypoint() {
        let waypoints = square();
        let n = waypoints.len();
        for i in 0..n {
            let p = |k: usize| waypoints[k % n];
            let start = catmull_rom(p(i + n - 1), p(i), p(i + 1), p(i + 2), 0.0);
            let end = catmull_rom(p(i + n - 1), p(i), p(i + 1), p(i + 2), 1.0);
            assert_close(start, waypoints[i]);
            assert_close(end, waypoints[(i + 1) % n]);
        }
    }

    #[test]
    fn test_segment_starts_sample_waypoints() {
        let mut path = WaypointPath::new(square(), 1.0);
        for expected in square().iter().chain(square().iter()) {
            let position = path.advance(1.0).unwrap();
            assert_close(position, *expected);
        }
    }

    #[test]
    fn test_t_resets_once_per_segment() {
        let mut path = WaypointPath::new(square(), 0.5);
        path.advance(1.0);
        assert_eq!(path.current_waypoint(), 0);
        assert!((path.t() - 0.5).abs() < 1e-6);

        path.advance(1.0);
        assert_eq!(path.current_waypoint(), 1);
        assert_eq!(path.t(), 0.0);

        // an oversized step still only moves one waypoint
        path.advance(10.0);
        assert_eq!(path.current_waypoint(), 2);
        assert_eq!(path.t(), 0.0);
    }

    #[test]
    fn test_wraparound_indices_stay_in_range() {
        let waypoints: Vec<_> = (0..5).map(|i| Vector3::new(i as f32, 0.0, 0.0)).collect();
        let mut path = WaypointPath::new(waypoints, 1.0);
        let start = path.current_waypoint();

        for _ in 0..5 {
            let indices = path.segment_indices().unwrap();
            assert!(indices.iter().all(|&i| i < 5), "{indices:?}");
            path.advance(1.0);
        }
        assert_eq!(path.current_waypoint(), start);

        assert_eq!(path.segment_indices(), Some([4, 0, 1, 2]));
        path.advance(1.0);
        path.advance(1.0);
        path.advance(1.0);
        path.advance(1.0);
        assert_eq!(path.segment_indices(), Some([3, 4, 0, 1]));
    }

    #[test]
    fn test_short_paths_do_not_move() {
        for count in 0..MIN_WAYPOINTS {
            let waypoints = square().into_iter().take(count).collect();
            let mut path = WaypointPath::new(waypoints, 1.0);
            assert!(!path.is_animated());
            assert_eq!(path.advance(0.3), None);
            assert_eq!(path.t(), 0.0);
            assert_eq!(path.current_waypoint(), 0);
        }
    }

    #[test]
    fn test_push_enables_motion() {
        let mut path = WaypointPath::new(square().into_iter().take(3).collect(), 1.0);
        assert_eq!(path.advance(0.5), None);
        path.push(Vector3::new(0.0, 2.0, 4.0));
        assert!(path.advance(0.5).is_some());
        path.reset();
        assert_eq!(path.t(), 0.0);
    }
}
