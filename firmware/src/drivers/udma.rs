//! uDMA bus-error monitor
//!
//! The sampling path does not use DMA; this monitor only exists to own
//! the bus-error tally for the controller. Nothing consumes the count
//! today — it is observability for a bench debugger, surfaced through
//! an accessor instead of an ambient static.

use tm4c123x_hal::sysctl::{control_power, Domain, PowerControl, PowerState, RunMode};
use tm4c123x_hal::tm4c123x::UDMA;

/// Tracks bus errors reported by the uDMA controller.
pub struct UdmaMonitor {
    udma: UDMA,
    errors: u32,
}

impl UdmaMonitor {
    /// Power the controller and start the tally at zero.
    pub fn new(udma: UDMA, power: &PowerControl) -> Self {
        control_power(power, Domain::MicroDma, RunMode::Run, PowerState::On);
        UdmaMonitor { udma, errors: 0 }
    }

    /// Check for a pending bus error; clear it and count it if one is
    /// up. Returns whether an error was observed on this poll.
    pub fn poll(&mut self) -> bool {
        if self.udma.errclr.read().bits() == 0 {
            return false;
        }
        // Write-one-to-clear
        self.udma.errclr.write(|w| unsafe { w.bits(1) });
        self.errors = self.errors.wrapping_add(1);
        true
    }

    /// Bus errors observed since construction.
    pub fn error_count(&self) -> u32 {
        self.errors
    }

    /// Release the controller.
    pub fn free(self) -> UDMA {
        self.udma
    }
}
