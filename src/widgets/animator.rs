use crate::gfx::anim::Timeline;
use log::debug;

/// Progress animations always run for 700 ms.
pub const PROGRESS_ANIMATION_DURATION: f32 = 0.7;

#[derive(Debug, Clone)]
enum Slot {
    Idle,
    /// Armed by a setter; the clock starts on the next frame tick.
    Armed { target: i32, timeline: Timeline },
    Running { target: i32, timeline: Timeline },
}

/// Single animation slot driving a progress value from 0 towards a target.
#[derive(Debug, Clone)]
pub struct ProgressAnimation {
    slot: Slot,
}

impl Default for ProgressAnimation {
    fn default() -> Self {
        Self { slot: Slot::Idle }
    }
}

impl ProgressAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the slot for `target`. Whatever run the slot held is dropped.
    pub fn arm(&mut self, target: i32) {
        debug!("Arming progress animation towards {}", target);
        self.slot = Slot::Armed {
            target,
            timeline: Timeline::new(PROGRESS_ANIMATION_DURATION),
        };
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.slot, Slot::Idle)
    }

    /// Advances the run to `now` and returns the progress value for this frame,
    /// or `None` when nothing is animating.
    pub fn tick(&mut self, now: f64) -> Option<i32> {
        let slot = std::mem::replace(&mut self.slot, Slot::Idle);
        let (target, mut timeline) = match slot {
            Slot::Idle => return None,
            Slot::Armed { target, mut timeline } => {
                if !timeline.is_started() {
                    timeline.start(now);
                }
                (target, timeline)
            }
            Slot::Running { target, timeline } => (target, timeline),
        };

        timeline.update(now);
        if timeline.is_complete() {
            debug!("Progress animation reached {}", target);
            return Some(target);
        }

        let value = (timeline.eased_progress() * target as f32).round() as i32;
        self.slot = Slot::Running { target, timeline };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_slot_yields_nothing() {
        let mut anim = ProgressAnimation::new();
        assert!(!anim.is_active());
        assert_eq!(anim.tick(1.0), None);
    }

    #[test]
    fn clock_starts_on_first_tick() {
        let mut anim = ProgressAnimation::new();
        anim.arm(80);
        assert_eq!(anim.tick(10.0), Some(0));
        assert!(anim.is_active());
        assert_eq!(anim.tick(11.0), Some(80));
        assert!(!anim.is_active());
        assert_eq!(anim.tick(12.0), None);
    }

    #[test]
    fn values_follow_the_decelerating_curve() {
        let mut anim = ProgressAnimation::new();
        anim.arm(100);
        anim.tick(0.0);
        // halfway through, 1 - 0.5^2 = 0.75
        assert_eq!(anim.tick(0.35), Some(75));
    }

    #[test]
    fn rearming_replaces_the_target() {
        let mut anim = ProgressAnimation::new();
        anim.arm(40);
        anim.tick(0.0);
        anim.tick(0.2);
        anim.arm(90);
        assert!(anim.is_active());
        assert_eq!(anim.tick(0.3), Some(0));
        let mid = anim.tick(0.65).unwrap();
        assert!(mid > 40 && mid < 90);
        assert_eq!(anim.tick(2.0), Some(90));
    }

    #[test]
    fn negative_targets_animate_downwards() {
        let mut anim = ProgressAnimation::new();
        anim.arm(-20);
        anim.tick(0.0);
        let mid = anim.tick(0.35).unwrap();
        assert!(mid < 0 && mid > -20);
        assert_eq!(anim.tick(1.0), Some(-20));
    }
}
