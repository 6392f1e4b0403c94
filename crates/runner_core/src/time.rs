//! Fixed-timestep frame clock.
//!
//! The runner advances its simulation in whole ticks. Wall-clock time is fed
//! into an accumulator once per redraw and drained in `fixed_dt` slices, so
//! spawn cadence and jump arcs are measured in ticks no matter how fast the
//! display refreshes.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Ticks per second of simulated time.
pub const DEFAULT_TICK_RATE_HZ: f64 = 60.0;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK_RATE_HZ)
    }

    pub fn with_tick_rate(tick_rate_hz: f64) -> Self {
        let fixed_dt = 1.0 / tick_rate_hz.max(1.0);
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.begin_frame_at(Instant::now());
    }

    /// Feed the accumulator with the time elapsed since the previous frame.
    pub fn begin_frame_at(&mut self, now: Instant) {
        self.real_dt = now
            .saturating_duration_since(self.last_instant)
            .as_secs_f64();
        self.last_instant = now;

        // A long stall (window drag, debugger) would otherwise replay a burst
        // of ticks and spawn a wall of obstacles at once.
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Drop any banked time. Called when ticking resumes after a pause so the
    /// paused interval is not replayed.
    pub fn discard_accumulated(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn one_fixed_dt_of_wall_time_yields_one_step() {
        let mut time = TimeState::new();
        let start = time.last_instant;
        time.begin_frame_at(start + Duration::from_micros(16_700));
        assert!(time.should_step());
        assert!(!time.should_step());
        assert_eq!(time.steps_this_frame, 1);
        assert_eq!(time.fixed_step_count, 1);
    }

    #[test]
    fn short_frame_banks_time_for_the_next() {
        let mut time = TimeState::new();
        let start = time.last_instant;
        time.begin_frame_at(start + Duration::from_millis(10));
        assert!(!time.should_step());
        time.begin_frame_at(start + Duration::from_millis(20));
        assert!(time.should_step());
    }

    #[test]
    fn long_stall_is_capped() {
        let mut time = TimeState::new();
        let start = time.last_instant;
        time.begin_frame_at(start + Duration::from_secs(5));
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        // 0.25s of capped time at 60Hz, give or take float rounding.
        assert!((14..=15).contains(&steps), "got {steps} steps");
    }

    #[test]
    fn discard_accumulated_drops_banked_time() {
        let mut time = TimeState::new();
        let start = time.last_instant;
        time.begin_frame_at(start + Duration::from_millis(100));
        time.discard_accumulated();
        assert!(!time.should_step());
    }

    #[test]
    fn custom_tick_rate_sets_fixed_dt() {
        let time = TimeState::with_tick_rate(30.0);
        assert!((time.fixed_dt - 1.0 / 30.0).abs() < 1e-12);
    }
}
