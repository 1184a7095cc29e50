//! Animation curves: one animated property with its keyframes.

use std::fmt;

use glam::{Quat, Vec3};

use crate::animation::tracks::KeyframeTrack;

/// The animated property a curve drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    /// `position`
    Position,
    /// `rotationQuaternion`
    RotationQuaternion,
    /// `scaling`
    Scaling,
    /// Any other engine property path (morph weights, visibility, ...).
    Other(String),
}

impl PropertyPath {
    #[must_use]
    pub fn parse(path: &str) -> Self {
        match path {
            "position" => Self::Position,
            "rotationQuaternion" => Self::RotationQuaternion,
            "scaling" => Self::Scaling,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Position => "position",
            Self::RotationQuaternion => "rotationQuaternion",
            Self::Scaling => "scaling",
            Self::Other(path) => path,
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    Scalar(KeyframeTrack<f32>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            Self::Vector3(track) => track.end_time(),
            Self::Quaternion(track) => track.end_time(),
            Self::Scalar(track) => track.end_time(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Vector3(track) => track.len(),
            Self::Quaternion(track) => track.len(),
            Self::Scalar(track) => track.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyframeValue {
    Vector3(Vec3),
    Quaternion(Quat),
    Scalar(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: KeyframeValue,
}

/// A named property path plus an ordered sequence of keyframes.
///
/// Curves are shared between animation groups through `Arc`; `Clone`
/// produces an independent copy whose keys can be rewritten freely.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationCurve {
    pub name: String,
    pub property: PropertyPath,
    pub data: TrackData,
}

impl AnimationCurve {
    #[must_use]
    pub fn new(name: &str, property: PropertyPath, data: TrackData) -> Self {
        Self {
            name: name.to_string(),
            property,
            data,
        }
    }

    #[must_use]
    pub fn vector3(name: &str, property: PropertyPath, track: KeyframeTrack<Vec3>) -> Self {
        Self::new(name, property, TrackData::Vector3(track))
    }

    #[must_use]
    pub fn quaternion(name: &str, property: PropertyPath, track: KeyframeTrack<Quat>) -> Self {
        Self::new(name, property, TrackData::Quaternion(track))
    }

    /// Keyframes in order.
    #[must_use]
    pub fn keys(&self) -> Vec<Keyframe> {
        match &self.data {
            TrackData::Vector3(track) => track
                .keyframes()
                .map(|(time, v)| Keyframe { time, value: KeyframeValue::Vector3(v) })
                .collect(),
            TrackData::Quaternion(track) => track
                .keyframes()
                .map(|(time, q)| Keyframe { time, value: KeyframeValue::Quaternion(q) })
                .collect(),
            TrackData::Scalar(track) => track
                .keyframes()
                .map(|(time, s)| Keyframe { time, value: KeyframeValue::Scalar(s) })
                .collect(),
        }
    }

    /// Rewrites every vector value. Returns `false` (and changes nothing)
    /// when the curve does not hold vector data.
    pub fn map_vectors(&mut self, f: impl FnMut(Vec3) -> Vec3) -> bool {
        match &mut self.data {
            TrackData::Vector3(track) => {
                track.map_values(f);
                true
            }
            _ => false,
        }
    }

    /// Rewrites every quaternion value. Returns `false` (and changes nothing)
    /// when the curve does not hold quaternion data.
    pub fn map_quaternions(&mut self, f: impl FnMut(Quat) -> Quat) -> bool {
        match &mut self.data {
            TrackData::Quaternion(track) => {
                track.map_values(f);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> Option<KeyframeValue> {
        match &self.data {
            TrackData::Vector3(track) => track.sample(time).map(KeyframeValue::Vector3),
            TrackData::Quaternion(track) => track.sample(time).map(KeyframeValue::Quaternion),
            TrackData::Scalar(track) => track.sample(time).map(KeyframeValue::Scalar),
        }
    }

    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.data.end_time()
    }
}
