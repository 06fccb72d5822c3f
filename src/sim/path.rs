//! Polyline path geometry
//!
//! Enemies walk the path by cumulative distance (segment index + distance
//! along that segment). Placement asks the other question: how far is an
//! arbitrary point from the path centerline.

use glam::Vec2;

use crate::error::PathError;

/// One straight leg of the path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    pub start: Vec2,
    pub end: Vec2,
    /// `end - start`
    pub delta: Vec2,
    pub length: f32,
    /// Unit direction from start to end
    pub unit: Vec2,
}

impl PathSegment {
    fn new(start: Vec2, end: Vec2) -> Self {
        let delta = end - start;
        let length = delta.length();
        Self {
            start,
            end,
            delta,
            length,
            unit: delta.normalize_or_zero(),
        }
    }

    /// Point `distance` units along this segment (clamped to its ends)
    #[inline]
    pub fn point_at(&self, distance: f32) -> Vec2 {
        self.start + self.unit * distance.clamp(0.0, self.length)
    }

    /// Clamped point-to-segment distance
    #[inline]
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        point_segment_distance(point, self.start, self.end)
    }
}

/// Immutable polyline the enemies follow
#[derive(Debug, Clone)]
pub struct PathModel {
    waypoints: Vec<Vec2>,
    segments: Vec<PathSegment>,
    total_length: f32,
}

impl PathModel {
    /// Build a path from ordered waypoints.
    ///
    /// Consecutive duplicate waypoints are tolerated; the zero-length legs
    /// they would produce are skipped.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints(waypoints.len()));
        }
        if let Some(index) = waypoints.iter().position(|p| !p.is_finite()) {
            return Err(PathError::NonFinite(index));
        }

        let segments: Vec<PathSegment> = waypoints
            .windows(2)
            .map(|pair| PathSegment::new(pair[0], pair[1]))
            .filter(|segment| segment.length > f32::EPSILON)
            .collect();

        let total_length = segments.iter().map(|s| s.length).sum::<f32>();
        if segments.is_empty() || total_length <= f32::EPSILON {
            return Err(PathError::ZeroLength);
        }

        Ok(Self {
            waypoints,
            segments,
            total_length,
        })
    }

    /// Convenience constructor from `[x, y]` pairs
    pub fn from_points(points: &[[f32; 2]]) -> Result<Self, PathError> {
        Self::new(points.iter().map(|&p| Vec2::from_array(p)).collect())
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Where enemies enter
    pub fn start(&self) -> Vec2 {
        self.segments[0].start
    }

    /// Where enemies leak
    pub fn end(&self) -> Vec2 {
        self.segments[self.segments.len() - 1].end
    }

    /// Minimum clamped distance from `point` to any segment
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        self.segments
            .iter()
            .map(|segment| segment.distance_to_point(point))
            .fold(f32::INFINITY, f32::min)
    }

    /// World position `distance` units from the start (clamped to the path)
    pub fn position_at(&self, distance: f32) -> Vec2 {
        let mut remaining = distance.max(0.0);
        for segment in &self.segments {
            if remaining <= segment.length {
                return segment.point_at(remaining);
            }
            remaining -= segment.length;
        }
        self.end()
    }

    /// World position of a (segment, distance-on-segment) cursor
    pub fn point_on_segment(&self, segment_index: usize, distance_on_segment: f32) -> Vec2 {
        match self.segments.get(segment_index) {
            Some(segment) => segment.point_at(distance_on_segment),
            None => self.end(),
        }
    }

    /// Move a cursor `step` units forward, crossing segment boundaries.
    ///
    /// Returns true once the cursor sits on the end of the final segment.
    pub fn advance(
        &self,
        segment_index: &mut usize,
        distance_on_segment: &mut f32,
        step: f32,
    ) -> bool {
        *distance_on_segment += step.max(0.0);
        let last = self.segments.len() - 1;

        loop {
            if *segment_index > last {
                *segment_index = last;
                *distance_on_segment = self.segments[last].length;
                return true;
            }
            let length = self.segments[*segment_index].length;
            if *distance_on_segment < length {
                return false;
            }
            if *segment_index == last {
                *distance_on_segment = length;
                return true;
            }
            *distance_on_segment -= length;
            *segment_index += 1;
        }
    }
}

/// Distance from `point` to the closest point of segment `a`-`b`
pub fn point_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();
    if line_len_sq < 1e-8 {
        return point.distance(a);
    }
    let t = ((point - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    point.distance(a + line_vec * t)
}
