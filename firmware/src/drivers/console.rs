//! UART0 operator console
//!
//! Line-oriented text console on PA0/PA1 at 115200 baud: prints the
//! setup banner and sample lines, and reads back the requested sample
//! count for bounded runs.

use core::fmt::{self, Write};

use embedded_hal::serial::Read as SerialRead;
use hydrosense_sampling::{Sample, Sink};

/// Most digits a sample-count entry can carry.
const INPUT_BUF: usize = 16;

/// Operator console over a split serial port.
///
/// Also acts as the console [`Sink`]: one `index,timestamp,raw` line
/// per sample.
pub struct Console<TX, RX> {
    tx: TX,
    rx: RX,
}

impl<TX, RX> Console<TX, RX>
where
    TX: fmt::Write,
    RX: SerialRead<u8>,
{
    /// Wrap the transmit and receive halves of the console UART.
    pub fn new(tx: TX, rx: RX) -> Self {
        Console { tx, rx }
    }

    /// Print the fixed setup banner.
    pub fn banner(&mut self, sysclk_hz: u32) {
        writeln!(self.tx, "ADC ->").unwrap_or_default();
        writeln!(self.tx, "    Type:           Differential").unwrap_or_default();
        writeln!(self.tx, "    Input Pins:     AIN0/PE3 - AIN1/PE2").unwrap_or_default();
        writeln!(
            self.tx,
            "    System Clock:   {} MHz",
            sysclk_hz / 1_000_000
        )
        .unwrap_or_default();
        writeln!(self.tx).unwrap_or_default();
    }

    /// Prompt for and read the requested number of samples.
    ///
    /// Blocks until a full line arrives. Garbage input parses to zero,
    /// which the sample-count bounds check then rejects.
    pub fn read_sample_count(&mut self) -> u32 {
        write!(self.tx, "Enter the number of samples: ").unwrap_or_default();

        let mut buf = [0u8; INPUT_BUF];
        let mut len = 0usize;
        loop {
            let byte = match self.rx.read() {
                Ok(b) => b,
                Err(_) => continue, // nothing yet, or a line error; keep polling
            };
            if byte == b'\r' || byte == b'\n' {
                writeln!(self.tx).unwrap_or_default();
                break;
            }
            if len < buf.len() {
                buf[len] = byte;
                len += 1;
                // Echo so the operator sees the entry
                write!(self.tx, "{}", byte as char).unwrap_or_default();
            }
        }

        core::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Release the serial halves.
    pub fn free(self) -> (TX, RX) {
        (self.tx, self.rx)
    }
}

// Status messages go straight through to the transmit side
impl<TX, RX> fmt::Write for Console<TX, RX>
where
    TX: fmt::Write,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.tx.write_str(s)
    }
}

impl<TX, RX> Sink for Console<TX, RX>
where
    TX: fmt::Write,
{
    type Error = fmt::Error;

    fn emit(&mut self, sample: &Sample) -> Result<(), fmt::Error> {
        writeln!(self.tx, "{}", sample)
    }
}
