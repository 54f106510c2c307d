//! Rig data types.
//!
//! A rig is what the reconstruction step exports for one person: the mesh, the
//! skeleton and the named keypoints. The layout mirrors the exported JSON:
//!
//! ```json
//! {
//!   "mesh": { "vertices": [[x, y, z], ...], "faces": [[a, b, c], ...] },
//!   "skeleton": { "joint_names": ["neck", ...], "joint_positions": [[x, y, z], ...] },
//!   "keypoints": [{ "name": "left_wrist", "position": [x, y, z] }, ...]
//! }
//! ```
//!
//! Coordinates are in meters with Y pointing up. Fields the engine does not
//! use (skin weights, joint parents, animation targets) are ignored.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Mesh part of a rig.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigMesh {
    /// Vertex positions.
    #[serde(default)]
    pub vertices: Vec<[f64; 3]>,

    /// Faces as exported. Not used for measurement, so any polygon shape or
    /// index encoding is accepted.
    #[serde(default)]
    pub faces: Vec<serde_json::Value>,
}

/// Skeleton part of a rig.
///
/// `joint_names` and `joint_positions` are parallel arrays; extra entries on
/// either side are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    /// Joint names.
    #[serde(default)]
    pub joint_names: Vec<String>,

    /// Joint positions, parallel to `joint_names`.
    #[serde(default)]
    pub joint_positions: Vec<[f64; 3]>,
}

impl Skeleton {
    /// Iterate over `(name, position)` pairs.
    pub fn joints(&self) -> impl Iterator<Item = (&str, Point3<f64>)> {
        self.joint_names
            .iter()
            .zip(&self.joint_positions)
            .map(|(name, p)| (name.as_str(), Point3::from(*p)))
    }

    /// Number of usable joints.
    pub fn joint_count(&self) -> usize {
        self.joint_names.len().min(self.joint_positions.len())
    }
}

/// A named keypoint as exported by the pose estimator.
///
/// Both fields are optional on the wire; incomplete entries are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Semantic name, e.g. `left_wrist`.
    #[serde(default)]
    pub name: Option<String>,

    /// Position; only three-component positions are used.
    #[serde(default)]
    pub position: Option<Vec<f64>>,
}

impl Keypoint {
    /// Create a keypoint.
    pub fn new(name: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            name: Some(name.into()),
            position: Some(position.to_vec()),
        }
    }

    /// Name and position, if both are present and the position is 3D.
    pub fn resolved(&self) -> Option<(&str, Point3<f64>)> {
        let name = self.name.as_deref()?;
        match self.position.as_deref()? {
            [x, y, z] => Some((name, Point3::new(*x, *y, *z))),
            _ => None,
        }
    }
}

/// One person's reconstructed rig.
///
/// # Example
///
/// ```
/// use body_metrics::{Keypoint, Rig};
///
/// let mut rig = Rig::new();
/// rig.mesh.vertices.push([0.0, 0.0, 0.0]);
/// rig.mesh.vertices.push([0.0, 1.7, 0.0]);
/// rig.add_joint("neck", [0.0, 1.45, 0.0]);
/// rig.keypoints.push(Keypoint::new("nose", [0.0, 1.6, 0.1]));
///
/// assert_eq!(rig.vertex_count(), 2);
/// assert_eq!(rig.skeleton.joint_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    /// Body mesh.
    #[serde(default)]
    pub mesh: RigMesh,

    /// Skeleton joints.
    #[serde(default)]
    pub skeleton: Skeleton,

    /// Named keypoints.
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Rig {
    /// Create an empty rig.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rig from bare vertex positions.
    pub fn from_vertices(vertices: impl IntoIterator<Item = [f64; 3]>) -> Self {
        Self {
            mesh: RigMesh {
                vertices: vertices.into_iter().collect(),
                faces: Vec::new(),
            },
            ..Self::default()
        }
    }

    /// Append a skeleton joint.
    pub fn add_joint(&mut self, name: impl Into<String>, position: [f64; 3]) {
        self.skeleton.joint_names.push(name.into());
        self.skeleton.joint_positions.push(position);
    }

    /// Number of mesh vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    /// Number of mesh faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.mesh.faces.len()
    }

    /// Vertex positions as points.
    pub fn vertex_points(&self) -> Vec<Point3<f64>> {
        self.mesh.vertices.iter().map(|v| Point3::from(*v)).collect()
    }

    /// Axis-aligned bounding box of the mesh, or `None` if it has no vertices.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = Point3::from(*self.mesh.vertices.first()?);
        Some(self.mesh.vertices.iter().fold((first, first), |(min, max), v| {
            let p = Point3::from(*v);
            (min.inf(&p), max.sup(&p))
        }))
    }
}
