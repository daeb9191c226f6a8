#![allow(dead_code)]

use asl_shared::{Finger, HandPose, Landmark, HAND_LANDMARK_COUNT};

const WRIST: (f32, f32) = (0.50, 0.80);
const FINGER_Z: f32 = -0.02;

#[derive(Debug, Clone, Copy)]
pub enum Thumb {
    /// Lying across the folded fingers.
    Wrapped,
    /// Sticking out sideways.
    Out,
    Up,
    Down,
}

pub struct HandBuilder {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandBuilder {
    /// A closed fist with the thumb wrapped over the fingers.
    pub fn fist() -> Self {
        let mut builder = Self {
            points: [Landmark::default(); HAND_LANDMARK_COUNT],
        };
        builder.points[0] = Landmark::new(WRIST.0, WRIST.1, 0.0);
        for finger in Finger::LONG {
            builder = builder.fold(finger);
        }
        builder.thumb(Thumb::Wrapped)
    }

    fn knuckle(finger: Finger) -> (f32, f32) {
        match finger {
            Finger::Index => (0.44, 0.62),
            Finger::Middle => (0.49, 0.61),
            Finger::Ring => (0.54, 0.62),
            Finger::Pinky => (0.59, 0.64),
            Finger::Thumb => (0.42, 0.74),
        }
    }

    fn place(mut self, finger: Finger, offsets: [f32; 3]) -> Self {
        let (x, y) = Self::knuckle(finger);
        self.points[finger.base()] = Landmark::new(x, y, FINGER_Z);
        self.points[finger.proximal()] = Landmark::new(x, y + offsets[0], FINGER_Z);
        self.points[finger.distal()] = Landmark::new(x, y + offsets[1], FINGER_Z);
        self.points[finger.tip()] = Landmark::new(x, y + offsets[2], FINGER_Z);
        self
    }

    pub fn extend(self, finger: Finger) -> Self {
        self.place(finger, [-0.06, -0.10, -0.13])
    }

    pub fn fold(self, finger: Finger) -> Self {
        self.place(finger, [-0.04, -0.01, 0.02])
    }

    pub fn thumb(mut self, thumb: Thumb) -> Self {
        let joints = match thumb {
            Thumb::Wrapped => [(0.42, 0.74), (0.39, 0.68), (0.42, 0.67), (0.45, 0.665)],
            Thumb::Out => [(0.42, 0.74), (0.37, 0.70), (0.33, 0.66), (0.29, 0.63)],
            Thumb::Up => [(0.42, 0.70), (0.40, 0.62), (0.40, 0.56), (0.40, 0.50)],
            Thumb::Down => [(0.42, 0.62), (0.40, 0.66), (0.40, 0.72), (0.40, 0.78)],
        };
        for (offset, (x, y)) in joints.into_iter().enumerate() {
            self.points[Finger::Thumb.base() + offset] = Landmark::new(x, y, FINGER_Z);
        }
        self
    }

    /// Moves one landmark in the image plane, keeping its depth.
    pub fn set(mut self, index: usize, x: f32, y: f32) -> Self {
        self.points[index].x = x;
        self.points[index].y = y;
        self
    }

    pub fn set_z(mut self, index: usize, z: f32) -> Self {
        self.points[index].z = z;
        self
    }

    pub fn build(self) -> HandPose {
        HandPose::new(self.points)
    }
}

pub fn fist() -> HandPose {
    HandBuilder::fist().build()
}

pub fn hello() -> HandPose {
    open_hand().build()
}

pub fn open_hand() -> HandBuilder {
    HandBuilder::fist()
        .extend(Finger::Index)
        .extend(Finger::Middle)
        .extend(Finger::Ring)
        .extend(Finger::Pinky)
        .thumb(Thumb::Out)
}

pub fn i_love_you() -> HandPose {
    HandBuilder::fist()
        .extend(Finger::Index)
        .extend(Finger::Pinky)
        .thumb(Thumb::Out)
        .build()
}

pub fn good() -> HandPose {
    HandBuilder::fist().thumb(Thumb::Up).build()
}

pub fn bad() -> HandPose {
    HandBuilder::fist().thumb(Thumb::Down).build()
}

pub fn i_me() -> HandPose {
    HandBuilder::fist().extend(Finger::Index).build()
}

/// Index and middle up with their tips pressed together.
pub fn no() -> HandPose {
    HandBuilder::fist()
        .extend(Finger::Index)
        .extend(Finger::Middle)
        .set(Finger::Index.tip(), 0.465, 0.49)
        .set(Finger::Middle.tip(), 0.47, 0.48)
        .build()
}

/// Thumb and curled index touching, other three fingers up.
pub fn okay() -> HandPose {
    HandBuilder::fist()
        .extend(Finger::Middle)
        .extend(Finger::Ring)
        .extend(Finger::Pinky)
        .set(Finger::Index.proximal(), 0.42, 0.57)
        .set(Finger::Index.distal(), 0.39, 0.58)
        .set(Finger::Index.tip(), 0.36, 0.60)
        .set(Finger::Thumb.base(), 0.42, 0.74)
        .set(Finger::Thumb.proximal(), 0.38, 0.70)
        .set(Finger::Thumb.distal(), 0.35, 0.65)
        .set(Finger::Thumb.tip(), 0.36, 0.62)
        .build()
}

/// Index and middle spread apart: not a sign in the vocabulary.
pub fn peace() -> HandPose {
    HandBuilder::fist()
        .extend(Finger::Index)
        .extend(Finger::Middle)
        .build()
}
