//! Timer-triggered differential sampling at 1 kHz
//!
//! Timer0A starts every conversion; the loop only waits for results
//! and streams them out, so the sampling rate is set by hardware
//! rather than by console printing cadence.

#![no_std]
#![no_main]

extern crate embedded_hal;
extern crate hydrosense_firmware;
extern crate tm4c123x_hal;

use embedded_hal::digital::v2::OutputPin;
use hydrosense_firmware::board;
use hydrosense_firmware::drivers::adc::AdcSeq3;
use hydrosense_firmware::drivers::console::Console;
use hydrosense_sampling::{Sampler, Sink, TriggerSource};
use tm4c123x_hal::gpio::GpioExt;
use tm4c123x_hal::serial;
use tm4c123x_hal::time::{Bps, Hertz};

/// Hardware sampling rate
const SAMPLE_RATE: Hertz = Hertz(1_000);

#[no_mangle]
pub fn sampler_main(mut board: board::Board) -> ! {
    let mut pins_a = board.GPIO_PORTA.split(&board.power_control);
    let uart = serial::Serial::uart0(
        board.UART0,
        pins_a.pa1.into_af_push_pull(&mut pins_a.control),
        pins_a.pa0.into_af_push_pull(&mut pins_a.control),
        (),
        (),
        Bps(115200),
        serial::NewlineMode::SwapLFtoCRLF,
        board::clocks(),
        &board.power_control,
    );
    let (tx, rx) = uart.split();
    let mut console = Console::new(tx, rx);
    console.banner(board::clocks().sysclk.0);

    let adc = AdcSeq3::timer_triggered(
        board.ADC0,
        board.GPIO_PORTE,
        board.TIMER0,
        board::clocks().sysclk,
        SAMPLE_RATE,
        &board.power_control,
    );
    let mut sampler = Sampler::new(adc, board.ticks, TriggerSource::Timer);

    // Green LED while the stream is live
    board.led_green.set_high().unwrap_or_default();

    loop {
        let sample = match sampler.acquire_one() {
            Ok(s) => s,
            Err(_) => continue,
        };
        console.emit(&sample).unwrap_or_default();
    }
}
