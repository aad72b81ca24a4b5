//! Compile-time settings for the control panel

use embassy_time::Duration;

/// Interval between refresh cycles.  Each cycle lights all four digits in turn, so this gives a
/// 1 kHz full-display refresh rate, far above visible flicker.
pub const REFRESH_PERIOD: Duration = Duration::from_millis(1);

/// Wait between key reads, long enough for the contacts to stop bouncing
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(30);

/// Setpoint in degrees Celsius after power-up and after RESET
pub const DEFAULT_SETPOINT: u16 = 22;

/// DECREMENT won't go below this
pub const MIN_SETPOINT: u16 = 16;
