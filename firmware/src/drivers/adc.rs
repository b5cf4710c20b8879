//! ADC0 differential sampling driver
//!
//! One sample sequencer (SS3: a single step, FIFO depth 1) configured
//! for the differential pair AIN0 (PE3) minus AIN1 (PE2), either
//! software-triggered or free-running off Timer0A.

use core::convert::Infallible;

use hydrosense_sampling::{Sequencer, TriggerSource};
use tm4c123x_hal::sysctl::{control_power, Domain, PowerControl, PowerState, RunMode};
use tm4c123x_hal::time::Hertz;
use tm4c123x_hal::tm4c123x::{ADC0, GPIO_PORTE, TIMER0};

/// Differential channel pair 0: AIN0 (PE3) minus AIN1 (PE2).
const CHANNEL_PAIR: u8 = 0;

/// PE2 and PE3 carry the analog inputs.
const ADC_PIN_MASK: u32 = (1 << 2) | (1 << 3);

// Trigger-select codes for the EMUX EM3 field
const EMUX_PROCESSOR: u8 = 0x0;
const EMUX_TIMER: u8 = 0x5;

/// ADC0 running sample sequencer 3.
///
/// Construction consumes the converter and the analog port, so the
/// one-time-configuration rule is enforced by ownership; there is no
/// re-configuration path.
pub struct AdcSeq3 {
    adc: ADC0,
    trigger: TriggerSource,
    // Pins must stay in analog mode for the life of the driver
    _gpioe: GPIO_PORTE,
}

impl AdcSeq3 {
    /// Processor-triggered configuration: every conversion is started
    /// from software by the acquire loop.
    pub fn processor_triggered(adc: ADC0, gpioe: GPIO_PORTE, power: &PowerControl) -> Self {
        Self::configure(adc, gpioe, TriggerSource::Processor, power)
    }

    /// Timer-triggered configuration: Timer0A runs periodically at
    /// `rate` and starts conversions on its own; the acquire loop only
    /// waits for results.
    pub fn timer_triggered(
        adc: ADC0,
        gpioe: GPIO_PORTE,
        timer: TIMER0,
        sysclk: Hertz,
        rate: Hertz,
        power: &PowerControl,
    ) -> Self {
        control_power(power, Domain::Timer0, RunMode::Run, PowerState::On);

        // Full-width periodic timer with the ADC trigger output
        // enabled. The load value sets the sampling rate.
        timer.ctl.modify(|_, w| w.taen().clear_bit());
        timer.cfg.write(|w| unsafe { w.bits(0x0) }); // 32-bit configuration
        timer.tamr.write(|w| unsafe { w.bits(0x2) }); // periodic, count down
        timer
            .tailr
            .write(|w| unsafe { w.bits(sysclk.0 / rate.0 - 1) });

        let adc = Self::configure(adc, gpioe, TriggerSource::Timer, power);

        // Conversions begin as soon as the timer runs
        timer.ctl.modify(|_, w| w.taote().set_bit().taen().set_bit());
        adc
    }

    fn configure(
        adc: ADC0,
        gpioe: GPIO_PORTE,
        trigger: TriggerSource,
        power: &PowerControl,
    ) -> Self {
        //
        // 1. Power on the converter and the analog port
        //
        control_power(power, Domain::Adc0, RunMode::Run, PowerState::On);
        control_power(power, Domain::GpioE, RunMode::Run, PowerState::On);

        //
        // 2. Hand PE2/PE3 to the analog function: input direction,
        //    alternate function, digital path off, analog path on
        //
        gpioe
            .dir
            .modify(|r, w| unsafe { w.bits(r.bits() & !ADC_PIN_MASK) });
        gpioe
            .afsel
            .modify(|r, w| unsafe { w.bits(r.bits() | ADC_PIN_MASK) });
        gpioe
            .den
            .modify(|r, w| unsafe { w.bits(r.bits() & !ADC_PIN_MASK) });
        gpioe
            .amsel
            .modify(|r, w| unsafe { w.bits(r.bits() | ADC_PIN_MASK) });

        //
        // 3. Configure SS3 (must configure before enabling)
        //
        // Sequencer off while its mux and control are written
        adc.actss.modify(|_, w| w.asen3().clear_bit());

        let em3 = match trigger {
            TriggerSource::Processor => EMUX_PROCESSOR,
            TriggerSource::Timer => EMUX_TIMER,
        };
        adc.emux.modify(|_, w| unsafe { w.em3().bits(em3) });

        // Step 0: differential pair 0, completion flag on, end of
        // sequence. SS3 has exactly one programmable step.
        adc.ssmux3.write(|w| unsafe { w.mux0().bits(CHANNEL_PAIR) });
        adc.ssctl3
            .write(|w| w.d0().set_bit().ie0().set_bit().end0().set_bit());

        //
        // 4. Enable the sequencer and drop any stale completion flag
        //
        adc.actss.modify(|_, w| w.asen3().set_bit());
        adc.isc.write(|w| w.in3().set_bit());

        Self {
            adc,
            trigger,
            _gpioe: gpioe,
        }
    }

    /// The trigger source this converter was configured with.
    pub fn trigger_source(&self) -> TriggerSource {
        self.trigger
    }
}

impl Sequencer for AdcSeq3 {
    // The converter has no failure path to report: a conversion that
    // never completes shows up as the documented unbounded busy-wait,
    // not as an error value.
    type Error = Infallible;

    fn start(&mut self) -> Result<(), Infallible> {
        self.adc.pssi.write(|w| w.ss3().set_bit());
        Ok(())
    }

    fn try_read(&mut self) -> nb::Result<u16, Infallible> {
        if self.adc.ris.read().inr3().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        // Acknowledge completion before handing out the result so the
        // next trigger is issued against an idle sequencer
        self.adc.isc.write(|w| w.in3().set_bit());
        Ok(self.adc.ssfifo3.read().data().bits())
    }
}
