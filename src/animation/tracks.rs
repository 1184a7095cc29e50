use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// Keyframe times with their values.
///
/// For `CubicSpline` every keyframe stores three values
/// (in-tangent, value, out-tangent), so `values.len() == times.len() * 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[must_use]
    pub fn linear(times: Vec<f32>, values: Vec<T>) -> Self {
        Self::new(times, values, InterpolationMode::Linear)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last keyframe, 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Keyframe value at `index` (skips cubic tangents).
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<T> {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values.get(index * 3 + 1).copied(),
            _ => self.values.get(index).copied(),
        }
    }

    /// `(time, value)` pairs in keyframe order.
    pub fn keyframes(&self) -> impl Iterator<Item = (f32, T)> + '_ {
        self.times
            .iter()
            .enumerate()
            .filter_map(|(i, &t)| self.value_at(i).map(|v| (t, v)))
    }

    /// Rewrites every stored value, cubic tangents included.
    ///
    /// Tangents go through the same mapping, which is exact for the linear maps
    /// the retargeter applies (rotation, component scale, left quaternion product).
    pub fn map_values(&mut self, mut f: impl FnMut(T) -> T) {
        for value in &mut self.values {
            *value = f(*value);
        }
    }

    /// Samples the track, clamping outside the keyframe range.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.times.is_empty() {
            return None;
        }

        // partition_point finds the first index where t > time
        let next_idx = self.times.partition_point(|&t| t <= time);
        if next_idx == 0 {
            return self.value_at(0);
        }
        self.sample_at_frame(next_idx - 1, time)
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> Option<T> {
        let len = self.times.len();

        if index >= len - 1 {
            return self.value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => {
                let v0 = self.value_at(index)?;
                let v1 = self.value_at(next_idx)?;
                Some(T::interpolate_linear(v0, v1, t))
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                let v0 = *self.values.get(i_prev + 1)?;
                let out_tangent0 = *self.values.get(i_prev + 2)?;
                let in_tangent1 = *self.values.get(i_next)?;
                let v1 = *self.values.get(i_next + 1)?;

                Some(T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt))
            }
        }
    }
}
