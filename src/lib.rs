//! # Nikon F-mount Lens Link
//!
//! This crate contains all functionality to drive a Nikon F-mount
//! lens over its handshake-gated serial protocol, in library form.
//! It is meant to be consumed by firmware-level application code.
#![cfg_attr(target_arch = "arm", no_std)]

pub mod hal;
pub mod drivers;
pub mod error;
