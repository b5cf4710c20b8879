//! Free-running differential sampling over the console
//!
//! Software-triggered: one conversion per loop pass, one CSV line per
//! sample, blue LED toggled as the visual heartbeat.

#![no_std]
#![no_main]

extern crate embedded_hal;
extern crate hydrosense_firmware;
extern crate tm4c123x_hal;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use hydrosense_firmware::board;
use hydrosense_firmware::drivers::adc::AdcSeq3;
use hydrosense_firmware::drivers::console::Console;
use hydrosense_sampling::{Sampler, Sink, TriggerSource};
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

    let adc = AdcSeq3::processor_triggered(board.ADC0, board.GPIO_PORTE, &board.power_control);
    let mut sampler = Sampler::new(adc, board.ticks, TriggerSource::Processor);
    let mut delay = tm4c123x_hal::delay::Delay::new(board.core_peripherals.SYST, board::clocks());

    loop {
        let sample = match sampler.acquire_one() {
            Ok(s) => s,
            Err(_) => continue,
        };
        console.emit(&sample).unwrap_or_default();

        // Blink the indicator; about four samples per second
        board.led_blue.set_high().unwrap_or_default();
        delay.delay_ms(125u32);
        board.led_blue.set_low().unwrap_or_default();
        delay.delay_ms(125u32);
    }
}
