//! Measuring mode state machine

/// Camera interaction that must be switched off while measuring
pub trait ControlGate {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureMode {
    /// Pointer drives the camera
    #[default]
    Idle,
    /// Pointer places measurement points
    Measuring,
}

/// Cursor shown over the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Grab,
    Crosshair,
}

/// Two-state gate between camera orbit and point placement.
///
/// The cursor is derived from the mode, and the camera controls are switched
/// inside the same call that flips the mode, so the two can never be active
/// at once.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: MeasureMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn is_measuring(&self) -> bool {
        self.mode == MeasureMode::Measuring
    }

    /// Whether pointer-down events should reach the ray picker
    pub fn accepts_pointer(&self) -> bool {
        self.is_measuring()
    }

    pub fn cursor(&self) -> CursorHint {
        match self.mode {
            MeasureMode::Idle => CursorHint::Grab,
            MeasureMode::Measuring => CursorHint::Crosshair,
        }
    }

    /// Flip the mode and the camera controls together
    pub fn toggle(&mut self, controls: &mut impl ControlGate) -> MeasureMode {
        self.mode = match self.mode {
            MeasureMode::Idle => MeasureMode::Measuring,
            MeasureMode::Measuring => MeasureMode::Idle,
        };
        self.apply(controls);
        tracing::debug!("Measure mode: {:?}", self.mode);
        self.mode
    }

    /// Force the controls to agree with the current mode
    pub fn apply(&self, controls: &mut impl ControlGate) {
        controls.set_enabled(!self.is_measuring());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Controls {
        enabled: bool,
    }

    impl ControlGate for Controls {
        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }
    }

    #[test]
    fn test_initial_state() {
        let mode = ModeController::new();
        assert_eq!(mode.mode(), MeasureMode::Idle);
        assert_eq!(mode.cursor(), CursorHint::Grab);
        assert!(!mode.accepts_pointer());
    }

    #[test]
    fn test_toggle_parity() {
        let mut mode = ModeController::new();
        let mut controls = Controls { enabled: true };

        for n in 1..=6 {
            mode.toggle(&mut controls);
            let odd = n % 2 == 1;
            assert_eq!(mode.is_measuring(), odd);
            assert_eq!(mode.accepts_pointer(), odd);
            assert_eq!(controls.is_enabled(), !odd);
            // never both active
            assert!(!(mode.accepts_pointer() && controls.is_enabled()));
        }
    }

    #[test]
    fn test_cursor_follows_mode() {
        let mut mode = ModeController::new();
        let mut controls = Controls::default();
        mode.toggle(&mut controls);
        assert_eq!(mode.cursor(), CursorHint::Crosshair);
        mode.toggle(&mut controls);
        assert_eq!(mode.cursor(), CursorHint::Grab);
    }

    #[test]
    fn test_apply_syncs_controls() {
        let mode = ModeController::new();
        let mut controls = Controls { enabled: false };
        mode.apply(&mut controls);
        assert!(controls.is_enabled());
    }
}
