//! Splash screen animation state

use std::time::{Duration, Instant};

/// Animation phase for splash screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashPhase {
    /// Banner held in place
    Display,
    /// Banner sliding off the top
    ScrollUp,
    Complete,
}

/// Splash screen animation state
#[derive(Debug)]
pub struct SplashState {
    start_time: Instant,
    pub phase: SplashPhase,
    /// Rows the banner has moved up
    pub scroll_offset: f32,
}

impl Default for SplashState {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashState {
    const DISPLAY_DURATION: Duration = Duration::from_millis(1200);
    const ANIMATION_DURATION: Duration = Duration::from_millis(700);

    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase: SplashPhase::Display,
            scroll_offset: 0.0,
        }
    }

    /// Advance the animation for the current terminal height
    pub fn update(&mut self, terminal_height: u16) {
        self.advance(self.start_time.elapsed(), terminal_height);
    }

    fn advance(&mut self, elapsed: Duration, terminal_height: u16) {
        if elapsed < Self::DISPLAY_DURATION {
            self.phase = SplashPhase::Display;
            self.scroll_offset = 0.0;
        } else if elapsed < Self::DISPLAY_DURATION + Self::ANIMATION_DURATION {
            self.phase = SplashPhase::ScrollUp;
            let progress = (elapsed - Self::DISPLAY_DURATION).as_secs_f32()
                / Self::ANIMATION_DURATION.as_secs_f32();
            self.scroll_offset = simple_easing::cubic_out(progress) * f32::from(terminal_height);
        } else {
            self.phase = SplashPhase::Complete;
        }
    }

    /// Skip to completion (user pressed a key)
    pub fn skip(&mut self) {
        self.phase = SplashPhase::Complete;
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SplashPhase::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_displaying() {
        let mut state = SplashState::new();
        state.update(24);
        assert_eq!(state.phase, SplashPhase::Display);
        assert_eq!(state.scroll_offset, 0.0);
        assert!(!state.is_complete());
    }

    #[test]
    fn test_skip_completes() {
        let mut state = SplashState::new();
        state.skip();
        state.skip();
        assert!(state.is_complete());
    }

    #[test]
    fn test_scrolls_after_display() {
        let mut state = SplashState::new();
        let midway = SplashState::DISPLAY_DURATION + SplashState::ANIMATION_DURATION / 2;
        state.advance(midway, 40);
        assert_eq!(state.phase, SplashPhase::ScrollUp);
        assert!(state.scroll_offset > 0.0 && state.scroll_offset < 40.0);
    }

    #[test]
    fn test_completes_after_animation() {
        let mut state = SplashState::new();
        state.advance(
            SplashState::DISPLAY_DURATION + SplashState::ANIMATION_DURATION,
            40,
        );
        assert!(state.is_complete());
    }
}
