pub mod values;
pub mod tracks;
pub mod clip;
pub mod binding;
pub mod codec;

pub use clip::{AnimationClip, Track, TrackData};
pub use binding::{TargetPath, TrackBinding, track_name};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use codec::{SerializedClip, SerializedTrack, TrackKind};
