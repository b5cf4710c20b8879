//! Bounded differential sampling with an operator-selected length
//!
//! Prompts the console for a sample count, rejects anything outside
//! `(0, 1000]`, then runs the acquisition with the blue LED held on and
//! reports completion.

#![no_std]
#![no_main]

extern crate cortex_m;
extern crate embedded_hal;
extern crate hydrosense_firmware;
extern crate tm4c123x_hal;

use core::fmt::Write;
use embedded_hal::digital::v2::OutputPin;
use hydrosense_firmware::board;
use hydrosense_firmware::drivers::adc::AdcSeq3;
use hydrosense_firmware::drivers::console::Console;
use hydrosense_sampling::{RunLimit, SampleCount, Sampler, TriggerSource};
use tm4c123x_hal::gpio::GpioExt;
use tm4c123x_hal::serial;
use tm4c123x_hal::time::Bps;

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

    let requested = console.read_sample_count();
    let count = match SampleCount::new(requested) {
        Ok(count) => count,
        Err(e) => {
            writeln!(console, "{}", e).unwrap_or_default();
            writeln!(console, "Exiting.").unwrap_or_default();
            park();
        }
    };

    let adc = AdcSeq3::processor_triggered(board.ADC0, board.GPIO_PORTE, &board.power_control);
    let mut sampler = Sampler::new(adc, board.ticks, TriggerSource::Processor);

    // LED on for the duration of the run
    board.led_blue.set_high().unwrap_or_default();
    let produced = sampler
        .run(RunLimit::Bounded(count), &mut console)
        .unwrap_or(0);
    board.led_blue.set_low().unwrap_or_default();

    writeln!(console).unwrap_or_default();
    writeln!(console, "Sampling Completed: {} samples", produced).unwrap_or_default();

    park();
}

fn park() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
