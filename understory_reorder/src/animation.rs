// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settle animation timing.
//!
//! ## Overview
//!
//! A single [`AnimationDuration`] drives both the CSS transition written onto
//! items (`top 0.3s`) and the delay of the timer that ends the settle phase,
//! so the visual motion and the completion callbacks never drift apart.
//!
//! [`AnimationCoordinator`] owns the two timers a drag uses: the next-tick
//! timer that turns on sibling transitions after the first, unanimated
//! placement, and the settle timer armed on release. Both are cancellable and
//! firings with stale handles are ignored.

use alloc::format;
use alloc::string::String;
use core::str::FromStr;
use core::time::Duration;

use crate::error::DurationParseError;
use crate::surface::ListSurface;

/// Length of the settle animation.
///
/// Built from a number of milliseconds, a [`Duration`], or a string:
///
/// - `"0.3s"`: seconds.
/// - `"300ms"`: milliseconds.
/// - `"0.3"`: a bare number string is read as seconds.
///
/// ```
/// use understory_reorder::animation::AnimationDuration;
///
/// let a: AnimationDuration = "0.3s".parse().unwrap();
/// let b = AnimationDuration::from(300_u64);
/// assert_eq!(a, b);
/// assert_eq!(a.transition("top"), "top 0.3s");
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AnimationDuration(Duration);

impl AnimationDuration {
    /// Default settle length, 300 ms.
    pub const DEFAULT: Self = Self(Duration::from_millis(300));

    /// A duration of `ms` milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// A duration of `ms` fractional milliseconds.
    pub fn try_from_millis_f64(ms: f64) -> Result<Self, DurationParseError> {
        Self::try_from_secs_f64(ms / 1000.0)
    }

    /// A duration of `secs` fractional seconds.
    pub fn try_from_secs_f64(secs: f64) -> Result<Self, DurationParseError> {
        if secs.is_nan() || secs.is_infinite() {
            return Err(DurationParseError::NonFinite);
        }
        if secs < 0.0 {
            return Err(DurationParseError::Negative);
        }
        Duration::try_from_secs_f64(secs)
            .map(Self)
            .map_err(|_| DurationParseError::NonFinite)
    }

    /// The duration as a [`Duration`]; this is also the settle timer delay.
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Whole milliseconds, truncated.
    pub const fn as_millis(self) -> u128 {
        self.0.as_millis()
    }

    /// CSS transition declaration animating `property` over this duration.
    pub fn transition(self, property: &str) -> String {
        format!("{property} {}s", self.0.as_secs_f64())
    }
}

impl Default for AnimationDuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u64> for AnimationDuration {
    fn from(ms: u64) -> Self {
        Self::from_millis(ms)
    }
}

impl From<Duration> for AnimationDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl FromStr for AnimationDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DurationParseError::Empty);
        }
        let (number, millis) = if let Some(n) = s.strip_suffix("ms") {
            (n, true)
        } else if let Some(n) = s.strip_suffix('s') {
            (n, false)
        } else {
            (s, false)
        };
        let value: f64 = number
            .trim_end()
            .parse()
            .map_err(|_| DurationParseError::Invalid)?;
        if millis {
            Self::try_from_millis_f64(value)
        } else {
            Self::try_from_secs_f64(value)
        }
    }
}

/// Which of the coordinator's timers fired.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimerKind {
    /// The next-tick timer enabling transitions on non-dragged items.
    EnableTransitions,
    /// The settle timer ending the finishing phase.
    Settle,
}

/// Owner of the transition string and the cancellable timers of a drag.
#[derive(Clone, Debug)]
pub struct AnimationCoordinator<T> {
    duration: AnimationDuration,
    transition: String,
    enable_timer: Option<T>,
    settle_timer: Option<T>,
}

/// The only property the engine animates.
const ANIMATED_PROPERTY: &str = "top";

impl<T: Copy + Eq> AnimationCoordinator<T> {
    /// Create a coordinator with no timers armed.
    pub fn new(duration: AnimationDuration) -> Self {
        Self {
            duration,
            transition: duration.transition(ANIMATED_PROPERTY),
            enable_timer: None,
            settle_timer: None,
        }
    }

    /// The configured duration.
    pub fn duration(&self) -> AnimationDuration {
        self.duration
    }

    /// Transition declaration applied to animating items, e.g. `top 0.3s`.
    pub fn transition(&self) -> &str {
        &self.transition
    }

    /// Returns true if either timer is armed.
    pub fn is_pending(&self) -> bool {
        self.enable_timer.is_some() || self.settle_timer.is_some()
    }

    /// Arm the next-tick timer, replacing any earlier one.
    pub fn arm_enable_transitions<S>(&mut self, surface: &mut S)
    where
        S: ListSurface<Timer = T> + ?Sized,
    {
        if let Some(old) = self.enable_timer.take() {
            surface.clear_timer(old);
        }
        self.enable_timer = Some(surface.set_timer(Duration::ZERO));
    }

    /// Arm the settle timer for the configured duration, replacing any earlier one.
    pub fn arm_settle<S>(&mut self, surface: &mut S)
    where
        S: ListSurface<Timer = T> + ?Sized,
    {
        if let Some(old) = self.settle_timer.take() {
            surface.clear_timer(old);
        }
        self.settle_timer = Some(surface.set_timer(self.duration.as_duration()));
    }

    /// Match a fired timer against the armed ones, disarming it.
    ///
    /// Returns `None` for timers this coordinator does not own (or no longer owns).
    pub fn fire(&mut self, timer: T) -> Option<TimerKind> {
        if self.enable_timer == Some(timer) {
            self.enable_timer = None;
            Some(TimerKind::EnableTransitions)
        } else if self.settle_timer == Some(timer) {
            self.settle_timer = None;
            Some(TimerKind::Settle)
        } else {
            None
        }
    }

    /// Cancel every armed timer.
    pub fn cancel_all<S>(&mut self, surface: &mut S)
    where
        S: ListSurface<Timer = T> + ?Sized,
    {
        if let Some(t) = self.enable_timer.take() {
            surface.clear_timer(t);
        }
        if let Some(t) = self.settle_timer.take() {
            surface.clear_timer(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_reorder_scene::{Scene, TimerId};

    #[test]
    fn seconds_and_millis_agree() {
        let secs: AnimationDuration = "0.3s".parse().unwrap();
        assert_eq!(secs, AnimationDuration::from(300_u64));
        assert_eq!(secs.as_millis(), 300);
        assert_eq!(secs.as_duration(), Duration::from_millis(300));
        let ms: AnimationDuration = "300ms".parse().unwrap();
        assert_eq!(ms, secs);
        let bare: AnimationDuration = " 0.3 ".parse().unwrap();
        assert_eq!(bare, secs);
    }

    #[test]
    fn default_is_300ms() {
        assert_eq!(AnimationDuration::default().as_millis(), 300);
    }

    #[test]
    fn transition_and_delay_agree() {
        let d: AnimationDuration = "1.25s".parse().unwrap();
        assert_eq!(d.transition("top"), "top 1.25s");
        assert_eq!(d.as_duration(), Duration::from_millis(1250));
        assert_eq!(
            AnimationDuration::from_millis(0).transition("top"),
            "top 0s"
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "".parse::<AnimationDuration>(),
            Err(DurationParseError::Empty)
        );
        assert_eq!(
            "fast".parse::<AnimationDuration>(),
            Err(DurationParseError::Invalid)
        );
        assert_eq!(
            "s".parse::<AnimationDuration>(),
            Err(DurationParseError::Invalid)
        );
        assert_eq!(
            "-1s".parse::<AnimationDuration>(),
            Err(DurationParseError::Negative)
        );
        assert_eq!(
            "infs".parse::<AnimationDuration>(),
            Err(DurationParseError::NonFinite)
        );
        assert_eq!(
            AnimationDuration::try_from_millis_f64(f64::NAN),
            Err(DurationParseError::NonFinite)
        );
    }

    #[test]
    fn coordinator_owns_its_timers() {
        let mut scene = Scene::new();
        let mut anim: AnimationCoordinator<TimerId> =
            AnimationCoordinator::new(AnimationDuration::from_millis(200));
        assert_eq!(anim.transition(), "top 0.2s");

        anim.arm_enable_transitions(&mut scene);
        anim.arm_settle(&mut scene);
        assert!(anim.is_pending());

        let fired = scene.advance(Duration::from_millis(1));
        assert_eq!(fired.len(), 1);
        assert_eq!(anim.fire(fired[0]), Some(TimerKind::EnableTransitions));
        assert_eq!(anim.fire(fired[0]), None, "a timer fires once");

        let fired = scene.advance(Duration::from_millis(199));
        assert_eq!(anim.fire(fired[0]), Some(TimerKind::Settle));
        assert!(!anim.is_pending());
    }

    #[test]
    fn cancel_disarms_surface_timers() {
        let mut scene = Scene::new();
        let mut anim: AnimationCoordinator<TimerId> =
            AnimationCoordinator::new(AnimationDuration::DEFAULT);
        anim.arm_enable_transitions(&mut scene);
        anim.arm_settle(&mut scene);
        anim.arm_settle(&mut scene);
        assert_eq!(
            scene.pending_timers(),
            2,
            "re-arming replaces the old timer"
        );
        anim.cancel_all(&mut scene);
        assert_eq!(scene.pending_timers(), 0);
        assert!(scene.advance(Duration::from_secs(1)).is_empty());
    }
}
