use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    pub clamped_frames: u32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    clamped_frames: u32,
    frame_time_sum: Duration,
    frame_time_max: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            ticks: 0,
            clamped_frames: 0,
            frame_time_sum: Duration::ZERO,
            frame_time_max: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        self.frame_time_max = self.frame_time_max.max(frame_dt);
    }

    pub(crate) fn record_ticks(&mut self, ticks: u32) {
        self.ticks = self.ticks.saturating_add(ticks);
    }

    pub(crate) fn record_clamp(&mut self) {
        self.clamped_frames = self.clamped_frames.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            self.frame_time_sum.as_secs_f32() * 1000.0 / self.frames as f32
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
            max_frame_time_ms: self.frame_time_max.as_secs_f32() * 1000.0,
            clamped_frames: self.clamped_frames,
        };

        *self = Self::new(self.interval, now);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_averages_over_interval() {
        let base = Instant::now();
        let mut metrics = MetricsAccumulator::new(Duration::from_secs(1), base);
        metrics.record_frame(Duration::from_millis(10));
        metrics.record_frame(Duration::from_millis(30));
        metrics.record_ticks(3);
        metrics.record_ticks(1);
        metrics.record_clamp();

        let snapshot = metrics
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot");
        assert!((snapshot.fps - 2.0).abs() < 0.01);
        assert!((snapshot.tps - 4.0).abs() < 0.01);
        assert!((snapshot.frame_time_ms - 20.0).abs() < 0.01);
        assert!((snapshot.max_frame_time_ms - 30.0).abs() < 0.01);
        assert_eq!(snapshot.clamped_frames, 1);
    }

    #[test]
    fn no_snapshot_before_interval_elapses() {
        let base = Instant::now();
        let mut metrics = MetricsAccumulator::new(Duration::from_secs(1), base);
        metrics.record_frame(Duration::from_millis(16));
        assert!(metrics
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn counters_reset_after_snapshot() {
        let base = Instant::now();
        let mut metrics = MetricsAccumulator::new(Duration::from_secs(1), base);
        metrics.record_frame(Duration::from_millis(16));
        metrics.record_clamp();
        metrics.maybe_snapshot(base + Duration::from_secs(1));

        let next = metrics
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("snapshot");
        assert_eq!(next, LoopMetricsSnapshot::default());
    }
}
