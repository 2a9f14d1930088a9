//! # Drive Module
//!
//! Mecanum drive control.
//!
//! This module handles:
//! - Mixing strafe/forward/rotate intent into four wheel duties
//! - Debounce and redundant-write suppression
//! - The Options + Share quit combo
//! - Routing controller events through a single session

pub mod wheels;
pub mod mixer;
pub mod quit;
pub mod session;

pub use session::{DriveSession, SessionControl};
