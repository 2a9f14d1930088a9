//! # Quit Combo Module
//!
//! Options + Share held together requests a shutdown.
//!
//! The combo fires on the press that completes it, once. Holding both
//! buttons does not fire again; one of them has to be released first.

use tracing::info;

/// Result of a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum ComboOutcome {
    /// Nothing to do
    Idle,
    /// Both buttons are now held: stop motors, then exit
    Shutdown,
}

/// Tracks the two quit buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuitCombo {
    options_held: bool,
    share_held: bool,
    fired: bool,
}

impl QuitCombo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn options_held(&self) -> bool {
        self.options_held
    }

    #[must_use]
    pub fn share_held(&self) -> bool {
        self.share_held
    }

    pub fn on_options_press(&mut self) -> ComboOutcome {
        self.options_held = true;
        self.check()
    }

    pub fn on_options_release(&mut self) {
        self.options_held = false;
        self.fired = false;
    }

    pub fn on_share_press(&mut self) -> ComboOutcome {
        self.share_held = true;
        self.check()
    }

    pub fn on_share_release(&mut self) {
        self.share_held = false;
        self.fired = false;
    }

    fn check(&mut self) -> ComboOutcome {
        if self.options_held && self.share_held && !self.fired {
            self.fired = true;
            info!("Options + Share pressed, requesting shutdown");
            return ComboOutcome::Shutdown;
        }
        ComboOutcome::Idle
    }
}
