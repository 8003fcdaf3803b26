use glam::{Quat, Vec3};

/// A keyframe value that can be blended between two keys.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

/// A keyframe value with a fixed flat component layout on the wire.
///
/// Quaternions are stored as `[x, y, z, w]`, vectors as `[x, y, z]`.
pub trait KeyframeValue: Interpolatable {
    /// Number of `f32` components per key.
    const COMPONENTS: usize;

    /// Appends this value's components to `out`.
    fn write_components(&self, out: &mut Vec<f32>);

    /// Reads a value from exactly [`Self::COMPONENTS`] floats.
    fn from_components(components: &[f32]) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl KeyframeValue for f32 {
    const COMPONENTS: usize = 1;

    fn write_components(&self, out: &mut Vec<f32>) {
        out.push(*self);
    }

    fn from_components(components: &[f32]) -> Self {
        components[0]
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl KeyframeValue for Vec3 {
    const COMPONENTS: usize = 3;

    fn write_components(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }

    fn from_components(components: &[f32]) -> Self {
        Vec3::new(components[0], components[1], components[2])
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}

impl KeyframeValue for Quat {
    const COMPONENTS: usize = 4;

    fn write_components(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }

    // No normalization here: the codec must reproduce stored values bit for bit.
    fn from_components(components: &[f32]) -> Self {
        Quat::from_xyzw(components[0], components[1], components[2], components[3])
    }
}

/// Flattens a slice of keyframe values into their wire components.
pub fn flatten<T: KeyframeValue>(values: &[T]) -> Vec<f32> {
    let mut out = Vec::with_capacity(values.len() * T::COMPONENTS);
    for value in values {
        value.write_components(&mut out);
    }
    out
}

/// Rebuilds keyframe values from flat components.
///
/// Returns `None` when `components.len()` is not a multiple of
/// [`KeyframeValue::COMPONENTS`].
pub fn unflatten<T: KeyframeValue>(components: &[f32]) -> Option<Vec<T>> {
    if components.len() % T::COMPONENTS != 0 {
        return None;
    }
    Some(
        components
            .chunks_exact(T::COMPONENTS)
            .map(T::from_components)
            .collect(),
    )
}
