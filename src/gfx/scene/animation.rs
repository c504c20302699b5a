//! Motion parameter state for the animated object
//!
//! `t` only ever grows, by [`STEP_INCREMENT`] per advance. In continuous mode
//! the frame renderer advances once per rendered frame; in stepped mode only
//! an explicit step command moves it.

/// Amount `t` grows by on every advance.
pub const STEP_INCREMENT: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    #[default]
    Continuous,
    Stepped,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    t: f32,
    mode: AnimationMode,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn t(&self) -> f32 {
        self.t
    }

    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    pub fn is_stepped(&self) -> bool {
        self.mode == AnimationMode::Stepped
    }

    /// Switches to continuous mode. `t` is left untouched.
    pub fn start_continuous(&mut self) {
        self.mode = AnimationMode::Continuous;
    }

    /// Advances exactly once and leaves the state in stepped mode, so a step
    /// issued during continuous playback does not keep free-running.
    pub fn step(&mut self) {
        self.mode = AnimationMode::Stepped;
        self.advance();
    }

    /// Per-frame hook. Advances only in continuous mode and reports whether it
    /// did.
    pub fn advance_for_frame(&mut self) -> bool {
        if self.is_stepped() {
            return false;
        }
        self.advance();
        true
    }

    fn advance(&mut self) {
        self.t += STEP_INCREMENT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = AnimationState::new();
        assert_eq!(state.t(), 0.0);
        assert_eq!(state.mode(), AnimationMode::Continuous);
    }

    #[test]
    fn test_step_advances_once_and_stops_playback() {
        let mut state = AnimationState::new();
        state.step();
        assert_eq!(state.t(), STEP_INCREMENT);
        assert!(state.is_stepped());

        assert!(!state.advance_for_frame());
        assert!(!state.advance_for_frame());
        assert_eq!(state.t(), STEP_INCREMENT);
    }

    #[test]
    fn test_continuous_advances_once_per_frame() {
        let mut state = AnimationState::new();
        for _ in 0..3 {
            assert!(state.advance_for_frame());
        }
        assert!((state.t() - 3.0 * STEP_INCREMENT).abs() < 1e-6);
    }

    #[test]
    fn test_start_continuous_keeps_t() {
        let mut state = AnimationState::new();
        state.step();
        state.step();
        let t = state.t();
        state.start_continuous();
        assert_eq!(state.t(), t);
        assert_eq!(state.mode(), AnimationMode::Continuous);
    }

    #[test]
    fn test_five_steps() {
        let mut state = AnimationState::new();
        for _ in 0..5 {
            state.step();
        }
        assert!((state.t() - 0.05).abs() < 1e-6);
    }
}
