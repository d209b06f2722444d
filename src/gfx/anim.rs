/// Decelerating curve: starts fast and eases into the end value.
///
/// `f(t) = 1 - (1 - t)^2`, monotonic on `[0, 1]` with `f(0) = 0` and `f(1) = 1`.
pub fn decelerate(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Normalized time over a fixed duration, driven by the host frame clock (seconds).
///
/// The clock itself is `f64`; only the elapsed time is narrowed to `f32`.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub start_time: f64,
    pub duration: f32,
    pub current_time: f64,
    started: bool,
}

impl Timeline {
    pub fn new(duration: f32) -> Self {
        Self {
            start_time: 0.0,
            duration,
            current_time: 0.0,
            started: false,
        }
    }

    /// Starts the clock at `now`. A timeline that already started keeps its start time.
    pub fn start(&mut self, now: f64) {
        if self.started {
            return;
        }
        self.started = true;
        self.start_time = now;
        self.current_time = now;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn update(&mut self, now: f64) {
        self.current_time = now;
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let elapsed = (self.current_time - self.start_time) as f32;
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn eased_progress(&self) -> f32 {
        decelerate(self.progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decelerate_endpoints_and_shape() {
        assert_eq!(decelerate(0.0), 0.0);
        assert_eq!(decelerate(1.0), 1.0);
        // faster than linear at the midpoint
        assert!(decelerate(0.5) > 0.5);

        let mut last = 0.0;
        let mut last_slope = f32::MAX;
        for i in 1..=100 {
            let t = i as f32 / 100.0;
            let v = decelerate(t);
            assert!(v >= last);
            let slope = v - last;
            assert!(slope <= last_slope + 1e-6);
            last = v;
            last_slope = slope;
        }
    }

    #[test]
    fn timeline_progress_is_clamped() {
        let mut tl = Timeline::new(0.7);
        tl.start(1.0);
        assert_eq!(tl.progress(), 0.0);
        tl.update(1.35);
        assert!((tl.progress() - 0.5).abs() < 1e-5);
        tl.update(5.0);
        assert!(tl.is_complete());
        assert_eq!(tl.eased_progress(), 1.0);
    }

    #[test]
    fn progress_holds_up_late_in_a_long_session() {
        let mut tl = Timeline::new(0.7);
        tl.start(524_288.0);
        tl.update(524_288.0 + 0.35);
        assert!((tl.progress() - 0.5).abs() < 1e-4);
        tl.update(524_289.0);
        assert!(tl.is_complete());
    }

    #[test]
    fn second_start_keeps_first_start_time() {
        let mut tl = Timeline::new(1.0);
        tl.start(2.0);
        tl.start(3.0);
        assert!(tl.is_started());
        assert_eq!(tl.start_time, 2.0);
    }
}
