//! # Mecanum Pad Library
//!
//! Drive a four-wheel mecanum platform with a PS4/PS5 controller.
//!
//! The left stick strafes and drives, R2/L2 rotate, both triggers brake and
//! Options + Share stops the motors and quits. Wheel duties go to a motor
//! expansion board over serial; every change is appended to a telemetry log.

pub mod config;
pub mod error;
pub mod controller;
pub mod drive;
pub mod board;
pub mod serial;
pub mod telemetry;
