//! Named landmark resolution.
//!
//! Landmarks come from two sources: skeleton joints and keypoints. When both
//! name the same point the keypoint wins. Absence is an ordinary outcome and
//! is represented by `None`; the combinators [`coalesce`] and [`average`]
//! express the fallback rules without special cases.

use crate::types::Rig;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Return the first present candidate.
///
/// # Example
///
/// ```
/// use body_metrics::landmarks::coalesce;
/// use nalgebra::Point3;
///
/// let keypoint = None;
/// let joint = Some(Point3::new(0.0, 1.0, 0.0));
/// assert_eq!(coalesce([keypoint, joint]), joint);
/// ```
pub fn coalesce<I>(candidates: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = Option<Point3<f64>>>,
{
    candidates.into_iter().flatten().next()
}

/// Mean of the present points, or `None` if none are present.
pub fn average<I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = Option<Point3<f64>>>,
{
    let (sum, count) = points
        .into_iter()
        .flatten()
        .fold((Vector3::zeros(), 0usize), |(sum, count), p| (sum + p.coords, count + 1));
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Mean of the present, non-NaN values, or `None` if none qualify.
pub fn average_values<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Body side of a bilateral landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Name prefix used by keypoints and joints.
    pub fn prefix(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A left/right pair of optional values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bilateral<T> {
    pub left: Option<T>,
    pub right: Option<T>,
}

impl<T> Default for Bilateral<T> {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
        }
    }
}

impl<T: Copy> Bilateral<T> {
    /// Create a pair.
    pub fn new(left: Option<T>, right: Option<T>) -> Self {
        Self { left, right }
    }

    /// Value for one side.
    pub fn get(&self, side: Side) -> Option<T> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Left value if present, otherwise right.
    pub fn either(&self) -> Option<T> {
        self.left.or(self.right)
    }

    /// Apply `f` to each side independently.
    pub fn map<U, F>(&self, mut f: F) -> Bilateral<U>
    where
        F: FnMut(Option<T>) -> Option<U>,
    {
        Bilateral {
            left: f(self.left),
            right: f(self.right),
        }
    }
}

impl Bilateral<Point3<f64>> {
    /// Midline point: average of whichever sides are present.
    pub fn center(&self) -> Option<Point3<f64>> {
        average([self.left, self.right])
    }

    /// Per-side midpoint with another pair (e.g. knee and ankle for the calf).
    pub fn midpoint(&self, other: &Bilateral<Point3<f64>>) -> Bilateral<Point3<f64>> {
        Bilateral {
            left: average([self.left, other.left]),
            right: average([self.right, other.right]),
        }
    }
}

impl Bilateral<f64> {
    /// Mean of the sides that resolved.
    pub fn mean(&self) -> Option<f64> {
        average_values([self.left, self.right])
    }
}

/// Name lookup over a rig's keypoints and skeleton joints.
///
/// Built once per measurement. For repeated names the first occurrence wins
/// within each source.
#[derive(Debug, Clone, Default)]
pub struct LandmarkSource {
    keypoints: HashMap<String, Point3<f64>>,
    joints: HashMap<String, Point3<f64>>,
}

impl LandmarkSource {
    /// Index the keypoints and joints of a rig.
    pub fn from_rig(rig: &Rig) -> Self {
        let mut joints = HashMap::with_capacity(rig.skeleton.joint_count());
        for (name, position) in rig.skeleton.joints() {
            joints.entry(name.to_owned()).or_insert(position);
        }

        let mut keypoints = HashMap::with_capacity(rig.keypoints.len());
        for (name, position) in rig.keypoints.iter().filter_map(|k| k.resolved()) {
            keypoints.entry(name.to_owned()).or_insert(position);
        }

        Self { keypoints, joints }
    }

    /// Keypoint with this name.
    pub fn keypoint(&self, name: &str) -> Option<Point3<f64>> {
        self.keypoints.get(name).copied()
    }

    /// Skeleton joint with this name.
    pub fn joint(&self, name: &str) -> Option<Point3<f64>> {
        self.joints.get(name).copied()
    }

    /// Keypoint if present, otherwise the same-named joint.
    pub fn resolve(&self, name: &str) -> Option<Point3<f64>> {
        coalesce([self.keypoint(name), self.joint(name)])
    }

    /// Resolve `<side>_<name>` for both sides.
    pub fn resolve_pair(&self, name: &str) -> Bilateral<Point3<f64>> {
        let [left, right] =
            Side::BOTH.map(|side| self.resolve(&format!("{}_{}", side.prefix(), name)));
        Bilateral { left, right }
    }

    /// Number of distinct keypoint names.
    pub fn keypoint_count(&self) -> usize {
        self.keypoints.len()
    }

    /// Number of distinct joint names.
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

/// The skeletal landmarks used by the measurement pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletalLandmarks {
    pub neck: Option<Point3<f64>>,
    pub shoulders: Bilateral<Point3<f64>>,
    /// Acromion, falling back to the shoulder on the same side.
    pub acromia: Bilateral<Point3<f64>>,
    pub elbows: Bilateral<Point3<f64>>,
    pub wrists: Bilateral<Point3<f64>>,
    pub hips: Bilateral<Point3<f64>>,
    pub knees: Bilateral<Point3<f64>>,
    pub ankles: Bilateral<Point3<f64>>,
    /// Average of the eyes and the nose.
    pub eye: Option<Point3<f64>>,
}

impl SkeletalLandmarks {
    /// Resolve every landmark from a source.
    pub fn resolve(source: &LandmarkSource) -> Self {
        let shoulders = source.resolve_pair("shoulder");
        let acromia = Bilateral {
            left: coalesce([source.resolve("left_acromion"), shoulders.left]),
            right: coalesce([source.resolve("right_acromion"), shoulders.right]),
        };
        let eye = average([
            source.resolve("left_eye"),
            source.resolve("right_eye"),
            source.resolve("nose"),
        ]);

        Self {
            neck: source.resolve("neck"),
            shoulders,
            acromia,
            elbows: source.resolve_pair("elbow"),
            wrists: source.resolve_pair("wrist"),
            hips: source.resolve_pair("hip"),
            knees: source.resolve_pair("knee"),
            ankles: source.resolve_pair("ankle"),
            eye,
        }
    }

    /// Number of resolved points (bilateral pairs count per side).
    pub fn resolved_count(&self) -> usize {
        let pairs = [
            &self.shoulders,
            &self.acromia,
            &self.elbows,
            &self.wrists,
            &self.hips,
            &self.knees,
            &self.ankles,
        ];
        let singles = [self.neck, self.eye];
        pairs
            .iter()
            .map(|p| p.left.is_some() as usize + p.right.is_some() as usize)
            .sum::<usize>()
            + singles.iter().filter(|p| p.is_some()).count()
    }
}
