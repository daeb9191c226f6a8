use serde::{Deserialize, Serialize};

use crate::DataError;

/// Number of landmarks in one hand pose.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Index of the chin tip in a 468-point face mesh.
pub const FACE_CHIN_LANDMARK: usize = 152;

/// A tracked point in normalized camera space.
///
/// `x` and `y` are relative to the frame size (`y` grows downwards), `z` is
/// relative depth where negative values are closer to the camera.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in all three axes
    pub fn distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        libm::sqrtf(dx * dx + dy * dy + dz * dz)
    }

    /// Distance in the image plane, ignoring depth
    pub fn planar_distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }

    /// Picks the chin tip out of a full face mesh.
    pub fn chin_from_face(face: &[Landmark]) -> Option<Landmark> {
        face.get(FACE_CHIN_LANDMARK).copied()
    }
}

/// The five digits of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const LONG: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    fn first_index(self) -> usize {
        match self {
            Finger::Thumb => 1,
            Finger::Index => 5,
            Finger::Middle => 9,
            Finger::Ring => 13,
            Finger::Pinky => 17,
        }
    }

    /// Knuckle joining the finger to the palm (CMC for the thumb).
    pub fn base(self) -> usize {
        self.first_index()
    }

    /// Proximal joint: PIP for fingers, MCP for the thumb.
    pub fn proximal(self) -> usize {
        self.first_index() + 1
    }

    /// Joint just below the tip: DIP for fingers, IP for the thumb.
    pub fn distal(self) -> usize {
        self.first_index() + 2
    }

    pub fn tip(self) -> usize {
        self.first_index() + 3
    }
}

/// One hand in one frame: exactly [`HAND_LANDMARK_COUNT`] landmarks.
///
/// Index 0 is the wrist, then four landmarks per digit from base to tip in
/// the order thumb, index, middle, ring, pinky.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandPose {
    landmarks: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandPose {
    pub const WRIST: usize = 0;

    pub fn new(landmarks: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Builds a pose from provider output, rejecting anything that is not
    /// exactly 21 points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, DataError> {
        let landmarks: [Landmark; HAND_LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| DataError::InvalidLandmarkCount {
                    expected: HAND_LANDMARK_COUNT,
                    actual: points.len(),
                })?;
        Ok(Self { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Landmark by raw index. Panics when `index >= 21`.
    pub fn at(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn wrist(&self) -> Landmark {
        self.landmarks[Self::WRIST]
    }

    pub fn base(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.base()]
    }

    pub fn proximal(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.proximal()]
    }

    pub fn distal(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.distal()]
    }

    pub fn tip(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.tip()]
    }

    /// Mean of wrist, index base and pinky base.
    pub fn palm_center(&self) -> Landmark {
        let wrist = self.wrist();
        let index = self.base(Finger::Index);
        let pinky = self.base(Finger::Pinky);
        Landmark::new(
            (wrist.x + index.x + pinky.x) / 3.0,
            (wrist.y + index.y + pinky.y) / 3.0,
            (wrist.z + index.z + pinky.z) / 3.0,
        )
    }

    /// Average landmark-to-landmark distance between two poses.
    pub fn mean_distance(&self, other: &HandPose) -> f32 {
        let total: f32 = self
            .landmarks
            .iter()
            .zip(other.landmarks.iter())
            .map(|(a, b)| a.distance_to(b))
            .sum();
        total / HAND_LANDMARK_COUNT as f32
    }

    /// Same pose moved by an offset in every axis.
    pub fn translated(&self, dx: f32, dy: f32, dz: f32) -> HandPose {
        let mut landmarks = self.landmarks;
        for point in landmarks.iter_mut() {
            point.x += dx;
            point.y += dy;
            point.z += dz;
        }
        HandPose { landmarks }
    }
}

impl TryFrom<&[Landmark]> for HandPose {
    type Error = DataError;

    fn try_from(points: &[Landmark]) -> Result<Self, Self::Error> {
        HandPose::from_slice(points)
    }
}
