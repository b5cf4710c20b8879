//! Sampling firmware for the hydrodynamic sensor module on the
//! EK-TM4C123GXL LaunchPad

#![no_std]
#![warn(dead_code)]
#![deny(missing_docs)]

extern crate cortex_m;
extern crate cortex_m_rt;
extern crate embedded_hal;
extern crate tm4c123x_hal;

// Debug builds get the panic handler in `builtins`, which parks the
// board. Release builds link panic-never instead, which fails the build
// outright if any panic branch survives optimization.
#[cfg(not(debug_assertions))]
use panic_never as _;

pub mod board;
pub mod startup;
pub mod drivers;
pub mod builtins;
