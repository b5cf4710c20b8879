//! Capture a short run into the flash record page and read it back
//!
//! Demonstrates the persistent path end to end: bounded capture into
//! RAM, pack-and-program into the fixed record page, then reload,
//! verify and dump over the console.

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
use hydrosense_firmware::drivers::flash::{Flash, RecordStore};
use hydrosense_sampling::sink::SliceSink;
use hydrosense_sampling::{record, RunLimit, Sample, SampleCount, Sampler, Sink, TriggerSource};
use tm4c123x_hal::gpio::GpioExt;
use tm4c123x_hal::serial;
use tm4c123x_hal::time::Bps;

/// Samples captured per flash store
const CAPTURE: usize = 32;

const EMPTY: Sample = Sample {
    index: 0,
    timestamp: 0,
    raw: 0,
};

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

    // Capture into RAM with the LED up
    let count = match SampleCount::new(CAPTURE as u32) {
        Ok(count) => count,
        Err(_) => park(), // CAPTURE is in range by construction
    };
    let mut storage = [EMPTY; CAPTURE];
    let mut capture = SliceSink::new(&mut storage);

    board.led_blue.set_high().unwrap_or_default();
    if sampler.run(RunLimit::Bounded(count), &mut capture).is_err() {
        writeln!(console, "Capture failed").unwrap_or_default();
        park();
    }
    board.led_blue.set_low().unwrap_or_default();

    // Program the captured run into the record page
    let mut store = RecordStore::new(Flash::new(board.FLASH_CTRL));
    if let Err(e) = store.save(capture.samples()) {
        writeln!(console, "Flash store failed: {}", e).unwrap_or_default();
        park();
    }

    // Read it back and check it survived intact
    let mut readback = [EMPTY; record::MAX_RECORDS];
    match store.load(&mut readback) {
        Ok(n) => {
            writeln!(console, "Read {} records back from flash:", n).unwrap_or_default();
            for sample in &readback[..n] {
                console.emit(sample).unwrap_or_default();
            }
            if &readback[..n] == capture.samples() {
                writeln!(console, "Flash records verified").unwrap_or_default();
            } else {
                writeln!(console, "Flash records DIFFER from capture").unwrap_or_default();
            }
        }
        Err(e) => {
            writeln!(console, "Flash readback failed: {}", e).unwrap_or_default();
        }
    }

    park();
}

fn park() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
