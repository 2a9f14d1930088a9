//! # Controller Module
//!
//! PS4/PS5 controller input handling.
//!
//! This module handles:
//! - Opening the controller's evdev node, waiting for it to connect
//! - Translating raw evdev events into [`events::PadEvent`]s
//! - Deadzone and trigger normalization into a drive intent

pub mod events;
pub mod gamepad;
pub mod normalizer;

pub use events::{EventMapper, PadEvent};
pub use gamepad::Gamepad;
pub use normalizer::{InputNormalizer, NormalizedIntent};
