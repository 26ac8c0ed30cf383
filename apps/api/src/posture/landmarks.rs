//! Pose landmark sets as produced by the external pose-detection model.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete body pose.
pub const LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;

/// Joints used for posture comparison: nose, ears and shoulders.
pub const KEY_LANDMARKS: [usize; 5] = [NOSE, LEFT_EAR, RIGHT_EAR, LEFT_SHOULDER, RIGHT_SHOULDER];

/// A single body-joint coordinate. x/y are normalised to the image size.
///
/// On the wire a landmark is an array `[x, y, z]`; a trailing visibility value is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 3]")]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean distance in 3-D.
    pub fn distance(&self, other: &Landmark) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

impl TryFrom<Vec<f64>> for Landmark {
    type Error = String;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        match coords.as_slice() {
            [x, y, z, ..] => Ok(Landmark::new(*x, *y, *z)),
            _ => Err(format!(
                "landmark needs at least 3 coordinates, got {}",
                coords.len()
            )),
        }
    }
}

impl From<Landmark> for [f64; 3] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y, l.z]
    }
}

/// Ordered landmarks for one analysed image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.0.iter()
    }

    /// True when the set has exactly [`LANDMARK_COUNT`] finite points.
    pub fn is_complete(&self) -> bool {
        self.0.len() == LANDMARK_COUNT && self.0.iter().all(Landmark::is_finite)
    }

    /// Finite landmark at `index`, if present.
    pub fn finite(&self, index: usize) -> Option<Landmark> {
        self.get(index).copied().filter(Landmark::is_finite)
    }

    /// Midpoint of the two shoulders in image coordinates.
    pub fn shoulder_center(&self) -> Option<(f64, f64)> {
        let left = self.finite(LEFT_SHOULDER)?;
        let right = self.finite(RIGHT_SHOULDER)?;
        Some(((left.x + right.x) / 2.0, (left.y + right.y) / 2.0))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Upright seated pose: head centred above level shoulders.
    pub fn upright() -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        points[NOSE] = Landmark::new(0.5, 0.25, -0.25);
        points[LEFT_EAR] = Landmark::new(0.5625, 0.25, 0.0);
        points[RIGHT_EAR] = Landmark::new(0.4375, 0.25, 0.0);
        points[LEFT_SHOULDER] = Landmark::new(0.625, 0.5, 0.0);
        points[RIGHT_SHOULDER] = Landmark::new(0.375, 0.5, 0.0);
        LandmarkSet::new(points)
    }

    /// `set` with every key landmark moved by `dx` along x.
    pub fn shifted(set: &LandmarkSet, dx: f64) -> LandmarkSet {
        let mut points: Vec<Landmark> = set.iter().copied().collect();
        for idx in KEY_LANDMARKS {
            points[idx].x += dx;
        }
        LandmarkSet::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::upright;
    use super::*;

    #[test]
    fn test_landmark_deserializes_from_array() {
        let l: Landmark = serde_json::from_str("[0.1, 0.2, -0.3]").unwrap();
        assert_eq!(l, Landmark::new(0.1, 0.2, -0.3));
    }

    #[test]
    fn test_landmark_ignores_visibility_component() {
        let l: Landmark = serde_json::from_str("[0.1, 0.2, 0.3, 0.99]").unwrap();
        assert_eq!(l, Landmark::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_landmark_rejects_short_array() {
        assert!(serde_json::from_str::<Landmark>("[0.1, 0.2]").is_err());
    }

    #[test]
    fn test_landmark_serializes_as_triple() {
        let json = serde_json::to_string(&Landmark::new(0.5, 0.25, 0.0)).unwrap();
        assert_eq!(json, "[0.5,0.25,0.0]");
    }

    #[test]
    fn test_complete_set_requires_exactly_33() {
        assert!(upright().is_complete());
        let short = LandmarkSet::new(vec![Landmark::new(0.0, 0.0, 0.0); 32]);
        assert!(!short.is_complete());
        let long = LandmarkSet::new(vec![Landmark::new(0.0, 0.0, 0.0); 34]);
        assert!(!long.is_complete());
    }

    #[test]
    fn test_non_finite_point_makes_set_incomplete() {
        let mut points: Vec<Landmark> = upright().iter().copied().collect();
        points[20].y = f64::NAN;
        assert!(!LandmarkSet::new(points).is_complete());
    }

    #[test]
    fn test_shoulder_center() {
        assert_eq!(upright().shoulder_center(), Some((0.5, 0.5)));
        assert_eq!(LandmarkSet::default().shoulder_center(), None);
    }

    #[test]
    fn test_distance_is_euclidean() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.75, 0.0, 1.0);
        assert!((a.distance(&b) - 1.25).abs() < 1e-12);
    }
}
