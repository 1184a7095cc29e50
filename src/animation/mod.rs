mod values;
pub mod tracks;
pub mod curve;
pub mod group;
pub mod retarget;

pub use tracks::{KeyframeTrack, InterpolationMode};
pub use values::Interpolatable;
pub use curve::{AnimationCurve, Keyframe, KeyframeValue, PropertyPath, TrackData};
pub use group::{AnimationGroup, AnimationTarget, TargetedAnimation};
pub use retarget::{NodeRole, PropertyKind, ReferenceFrame, RetargetStrategy, Retargeter, strategy_for};
