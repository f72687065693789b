//! Fixed-rate frame sampling.
//!
//! The sampler walks a decoded frame sequence and keeps every frame whose
//! zero-based index is a multiple of the stride
//! `max(1, round(source_fps / target_fps))`. Each kept frame is stamped
//! with `index / source_fps` seconds.

/// A decoded frame selected for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample<F> {
    /// Zero-based index of the frame in the source.
    pub index: u64,

    /// Seconds since the start of the source.
    pub timestamp_secs: f64,

    pub image: F,
}

/// Fixed-stride frame sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSampler {
    /// Rate used to turn frame indices into seconds.
    clock_fps: f64,
    interval: u64,
}

impl FrameSampler {
    /// Create a sampler for a source running at `source_fps`.
    ///
    /// When the source rate is zero, negative, or unknown, every frame is
    /// kept and timestamps assume the source runs at `target_fps`. This is
    /// degraded but never divides by zero.
    pub fn new(source_fps: Option<f64>, target_fps: f64) -> Self {
        let source_fps = source_fps.filter(|fps| is_usable_rate(*fps));
        let target_fps = Some(target_fps).filter(|fps| is_usable_rate(*fps));

        let interval = match (source_fps, target_fps) {
            (Some(source), Some(target)) => ((source / target).round() as u64).max(1),
            _ => 1,
        };

        if source_fps.is_none() {
            tracing::warn!("Source frame rate unknown; sampling every frame");
        }

        Self {
            clock_fps: source_fps.or(target_fps).unwrap_or(1.0),
            interval,
        }
    }

    /// Frame-count stride between kept frames.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Whether the frame at `index` is kept.
    pub fn keeps(&self, index: u64) -> bool {
        index % self.interval == 0
    }

    /// Timestamp in seconds of the frame at `index`.
    pub fn timestamp_for(&self, index: u64) -> f64 {
        index as f64 / self.clock_fps
    }

    /// Number of frames kept out of a source of `frame_count` frames.
    pub fn expected_samples(&self, frame_count: u64) -> u64 {
        frame_count.div_ceil(self.interval)
    }

    /// Lazily sample a sequence of decoded frames, in order.
    pub fn sample<I>(&self, frames: I) -> SampledFrames<I::IntoIter>
    where
        I: IntoIterator,
    {
        SampledFrames {
            sampler: *self,
            frames: frames.into_iter(),
            next_index: 0,
        }
    }
}

fn is_usable_rate(fps: f64) -> bool {
    fps.is_finite() && fps > 0.0
}

/// Iterator returned by [`FrameSampler::sample`].
#[derive(Debug)]
pub struct SampledFrames<I> {
    sampler: FrameSampler,
    frames: I,
    next_index: u64,
}

impl<I: Iterator> Iterator for SampledFrames<I> {
    type Item = FrameSample<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.frames.next()?;
            let index = self.next_index;
            self.next_index += 1;

            if self.sampler.keeps(index) {
                return Some(FrameSample {
                    index,
                    timestamp_secs: self.sampler.timestamp_for(index),
                    image: frame,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_to_five_fps_keeps_every_sixth_frame() {
        let sampler = FrameSampler::new(Some(30.0), 5.0);
        assert_eq!(sampler.interval(), 6);

        let samples: Vec<_> = sampler.sample(0..20u32).collect();
        let indices: Vec<u64> = samples.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 6, 12, 18]);

        let expected = [0.0, 0.2, 0.4, 0.6];
        for (sample, want) in samples.iter().zip(expected) {
            assert!((sample.timestamp_secs - want).abs() < 1e-9);
        }
        assert_eq!(samples[1].image, 6);
    }

    #[test]
    fn test_interval_rounds_to_nearest() {
        assert_eq!(FrameSampler::new(Some(29.97), 5.0).interval(), 6);
        assert_eq!(FrameSampler::new(Some(24.0), 5.0).interval(), 5);
        assert_eq!(FrameSampler::new(Some(25.0), 10.0).interval(), 3);
    }

    #[test]
    fn test_target_above_source_keeps_every_frame() {
        let sampler = FrameSampler::new(Some(30.0), 120.0);
        assert_eq!(sampler.interval(), 1);
        assert_eq!(sampler.sample(0..4u8).count(), 4);
    }

    #[test]
    fn test_unknown_source_rate_falls_back_to_every_frame() {
        for source in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            let sampler = FrameSampler::new(source, 5.0);
            assert_eq!(sampler.interval(), 1);
            assert!((sampler.timestamp_for(5) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let sampler = FrameSampler::new(Some(30.0), 5.0);
        assert_eq!(sampler.sample(Vec::<u8>::new()).count(), 0);
    }

    #[test]
    fn test_expected_samples() {
        let sampler = FrameSampler::new(Some(30.0), 5.0);
        assert_eq!(sampler.expected_samples(0), 0);
        assert_eq!(sampler.expected_samples(1), 1);
        assert_eq!(sampler.expected_samples(19), 4);
        assert_eq!(sampler.expected_samples(18), 3);
    }
}
