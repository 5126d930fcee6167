//! Snap animation for the carousel's horizontal offset.
//!
//! The offset is the only input of the layout engine, so animating it is
//! all that is needed to animate every card and poster.

use std::time::{Duration, Instant};

use parallax_core::ScrollConfig;

use super::easing::{EasingType, EasingTypeExt};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

impl ActiveAnimation {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Owns the live scroll offset (in layout points).
#[derive(Debug, Clone)]
pub struct OffsetAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current: f64,
}

impl Default for OffsetAnimator {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl OffsetAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
        }
    }

    fn is_smooth(&self) -> bool {
        self.config.smooth_enabled && self.config.animation_duration_ms > 0
    }

    /// Frame interval while animating
    pub fn tick_duration(&self) -> Duration {
        if self.config.animation_fps == 0 {
            Duration::from_millis(16)
        } else {
            Duration::from_millis((1000 / self.config.animation_fps as u64).max(1))
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.current
    }

    /// Final offset once the running animation settles
    pub fn target(&self) -> f64 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current)
    }

    /// Jump without animating
    pub fn set_offset(&mut self, offset: f64) {
        self.animation = None;
        self.current = offset;
    }

    /// Move toward `target`, animating from the currently visible offset
    pub fn animate_to(&mut self, target: f64) {
        self.animate_to_at(target, Instant::now());
    }

    fn animate_to_at(&mut self, target: f64, now: Instant) {
        if !self.is_smooth() {
            self.set_offset(target);
            return;
        }

        if (self.current - target).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to: target,
            duration: Duration::from_millis(self.config.animation_duration_ms),
            easing: self.config.easing,
        });
    }

    /// Advance the animation and return the offset for this frame
    pub fn update(&mut self) -> f64 {
        self.update_at(Instant::now())
    }

    pub fn update_at(&mut self, now: Instant) -> f64 {
        if let Some(ref anim) = self.animation {
            let t = anim.progress(now);
            if t >= 1.0 {
                self.current = anim.to;
                self.animation = None;
            } else {
                let eased = anim.easing.apply(t);
                self.current = anim.from + (anim.to - anim.from) * eased;
            }
        }
        self.current
    }

    pub fn reset(&mut self) {
        self.animation = None;
        self.current = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smooth(duration_ms: u64, easing: EasingType) -> OffsetAnimator {
        OffsetAnimator::new(ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: duration_ms,
            easing,
            ..Default::default()
        })
    }

    #[test]
    fn test_instant_when_disabled() {
        let mut animator = OffsetAnimator::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });
        animator.animate_to(560.0);
        assert_eq!(animator.offset(), 560.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_linear_progress() {
        let mut animator = smooth(100, EasingType::Linear);
        let start = Instant::now();
        animator.animate_to_at(200.0, start);

        assert!(animator.is_animating());
        assert_eq!(animator.target(), 200.0);

        let mid = animator.update_at(start + Duration::from_millis(50));
        assert!((mid - 100.0).abs() < 1e-6);

        let end = animator.update_at(start + Duration::from_millis(150));
        assert_eq!(end, 200.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_retarget_starts_from_visible_offset() {
        let mut animator = smooth(100, EasingType::Linear);
        let start = Instant::now();
        animator.animate_to_at(200.0, start);
        animator.update_at(start + Duration::from_millis(50));

        let later = start + Duration::from_millis(50);
        animator.animate_to_at(0.0, later);
        assert!((animator.update_at(later) - 100.0).abs() < 1e-6);
        assert_eq!(animator.update_at(later + Duration::from_millis(100)), 0.0);
    }

    #[test]
    fn test_same_target_is_noop() {
        let mut animator = smooth(100, EasingType::Cubic);
        animator.set_offset(280.0);
        animator.animate_to(280.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(smooth(100, EasingType::Cubic).tick_duration(), Duration::from_millis(16));
        let animator = OffsetAnimator::new(ScrollConfig {
            animation_fps: 0,
            ..Default::default()
        });
        assert_eq!(animator.tick_duration(), Duration::from_millis(16));
    }
}
