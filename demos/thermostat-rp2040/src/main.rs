//! Control panel firmware for the digital air conditioner, on an RP2040 board like the Pi Pico.
//!
//! The setpoint is shown on a 4-digit 7-segment display driven through a pair of 74HC595 shift
//! registers.  The display is refreshed from a high-priority interrupt executor, while the main
//! task polls the keys.
//!
//! Wiring:
//!
//! - Display: DIO on GPIO 6, SCLK on GPIO 7, RCLK on GPIO 8
//! - Keys (to ground): ON/OFF on GPIO 10, SLEEP on 11, DECREMENT on 12, RESET on 13
//! - LEDs (active low): green on GPIO 14 (power), blue on GPIO 15 (cooling)

#![no_std]
#![no_main]

mod config;

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{PIN_6, PIN_7, PIN_8};
use embassy_time::{Ticker, Timer};
use portable_atomic::{AtomicU32, Ordering};
use serial_displays::{
    DisplayBuffer, EmbassyRpBusDriver, Key, KeyPad, Keys, LeadingZeros, OnOff, PowerState,
    SerialDisplays,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

type Display = SerialDisplays<'static, EmbassyRpBusDriver<'static, PIN_6, PIN_7, PIN_8>>;

/// State shared between the main task and the refresh task
struct Panel {
    buffer: DisplayBuffer,
    refresh_cycles: AtomicU32,
}

static PANEL: StaticCell<Panel> = StaticCell::new();

static EXECUTOR_REFRESH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_REFRESH.on_interrupt()
}

/// Bound to the periodic timer: one full multiplexing cycle per tick
#[embassy_executor::task]
async fn refresh_task(mut display: Display, refresh_cycles: &'static AtomicU32) -> ! {
    let mut ticker = Ticker::every(config::REFRESH_PERIOD);

    loop {
        ticker.next().await;

        // Embassy RP outputs can't fail
        match display.update_displays() {
            Ok(()) => {}
            Err(never) => match never {},
        }

        refresh_cycles.fetch_add(1, Ordering::Relaxed);
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let panel: &'static Panel = PANEL.init(Panel {
        buffer: DisplayBuffer::new(),
        refresh_cycles: AtomicU32::new(0),
    });

    let display = unwrap!(SerialDisplays::builder()
        .with_embassy_rp_pins(p.PIN_6, p.PIN_7, p.PIN_8)
        .build(&panel.buffer));

    // The refresh cycle preempts the main task, like a timer interrupt service routine
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let refresh_spawner = EXECUTOR_REFRESH.start(interrupt::SWI_IRQ_1);
    unwrap!(refresh_spawner.spawn(refresh_task(display, &panel.refresh_cycles)));

    let mut on_off = OnOff::new(
        Input::new(p.PIN_10, Pull::Up),
        Output::new(p.PIN_14, Level::High),
    );
    let mut key_pad = KeyPad::new(
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
    );
    let mut cooling_led = Output::new(p.PIN_15, Level::High);

    let mut setpoint = config::DEFAULT_SETPOINT;
    let mut sleeping = false;
    let mut previous_keys = Keys::default();

    info!("Panel ready, setpoint {=u16}", setpoint);

    loop {
        Timer::after(config::DEBOUNCE_DELAY).await;

        match unwrap!(on_off.poll()) {
            PowerState::Off => {
                panel.buffer.clear_displays();
                cooling_led.set_high();
                previous_keys = Keys::default();
            }
            PowerState::On => {
                let keys = unwrap!(key_pad.read_keys());

                for key in keys.newly_pressed(&previous_keys) {
                    match key {
                        Key::Sleep => sleeping = !sleeping,
                        Key::Decrement => {
                            setpoint = setpoint.saturating_sub(1).max(config::MIN_SETPOINT)
                        }
                        Key::Reset => setpoint = config::DEFAULT_SETPOINT,
                    }

                    debug!(
                        "{} -> setpoint {=u16}, sleeping {=bool}, {=u32} refresh cycles",
                        key,
                        setpoint,
                        sleeping,
                        panel.refresh_cycles.load(Ordering::Relaxed)
                    );
                }
                previous_keys = keys;

                cooling_led.set_level(if sleeping { Level::High } else { Level::Low });

                if let Err(e) = panel
                    .buffer
                    .write_number(setpoint, LeadingZeros::Hide)
                {
                    error!("Can't show setpoint {=u16}: {}", setpoint, e);
                }
            }
        }
    }
}
