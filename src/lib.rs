//! Deterministic Q16.16 fixed-point numbers for lockstep simulations
//!
//! This library provides one number type built for bit-identical results on
//! every machine, compiler and target:
//!
//! - **`FixedPoint32`**: 32-bit signed, 16 fractional bits
//!   - Range: -32768.0 to 32767.9999847412109375
//!   - Precision: 0.0000152587890625 (2^-16)
//!   - Use cases: lockstep multiplayer, replays, physics ticks
//!
//! ## Features
//!
//! - **Integer-only arithmetic**: no floating point on any arithmetic path
//! - **Overflow-aware multiply**: full 64-bit product, rounded, saturated by sign
//! - **Exact text**: `Display` and `to_decimal` print `raw / 65536` exactly
//! - **no_std compatible**: works in embedded and WebAssembly environments
//! - **Serde support**: always persists the raw `i32`, never a decimal string
//!
//! ## Overflow policy
//!
//! | Operation        | Operator behavior | Alternatives                          |
//! |------------------|-------------------|---------------------------------------|
//! | `+`, `-`, neg    | wraps             | `checked_*`, `saturating_*`, `try_*`  |
//! | `*`              | saturates by sign | `checked_mul`, `try_mul`              |
//!
//! ## Example
//!
//! ```rust
//! use core::str::FromStr;
//! use fixq::FixedPoint32;
//!
//! let speed = FixedPoint32::from_str("1.5").unwrap();
//! let dt = FixedPoint32::HALF;
//! let step = speed * dt; // 0.75
//!
//! assert_eq!(step.to_raw(), 49152);
//! assert_eq!(step.to_string(), "0.75");
//! assert_eq!((step + FixedPoint32::ONE).floor(), FixedPoint32::ONE);
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(test)]
extern crate std;

mod fp32;

pub use fp32::FixedPoint32;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("overflow: value too large to represent")]
    Overflow,

    #[error("underflow: value too small to represent")]
    Underflow,

    #[error("invalid string format")]
    InvalidFormat,
}

pub type Result<T> = core::result::Result<T, FixedPointError>;
