//! Peripheral drivers for the sampling firmware

pub mod adc;
pub mod console;
pub mod flash;
pub mod udma;
