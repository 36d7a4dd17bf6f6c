// src/lib.rs

#![no_std] // Specify no_std at the crate root

// Response lines and extracted records are heap strings; the crate
// requires an allocator even without the `std` feature.
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod client;
pub mod common;
pub mod payload;

#[cfg(feature = "impl-serialport")]
pub mod impl_serialport;

// Re-export key types for convenience
pub use client::{ClientTiming, Dt80Client};
pub use common::Command;
pub use common::Dt80Error;
pub use payload::EncodedPacket;
