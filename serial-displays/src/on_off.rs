//! Tracks whether the unit is switched on, from the ON/OFF key, and mirrors that on a status LED.
//!
//! There's no debouncing here; callers poll at a fixed interval long enough for the contacts to
//! settle.

use embedded_hal_1::digital::{InputPin, OutputPin};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    #[default]
    Off,
    On,
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnOffError<KeyError, LedError> {
    Key(KeyError),
    Led(LedError),
}

pub struct OnOff<KeyPin, LedPin> {
    key: KeyPin,
    led: LedPin,
    state: PowerState,
}

impl<KeyPin: InputPin, LedPin: OutputPin> OnOff<KeyPin, LedPin> {
    /// `key` is active low with a pull-up; `led` is lit by driving it low
    pub fn new(key: KeyPin, led: LedPin) -> Self {
        Self {
            key,
            led,
            state: PowerState::Off,
        }
    }

    /// The state as of the last call to [`Self::poll`]
    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state == PowerState::On
    }

    /// Read the key, update the state and the LED, and return the new state
    pub fn poll(&mut self) -> Result<PowerState, OnOffError<KeyPin::Error, LedPin::Error>> {
        let pressed = self.key.is_low().map_err(OnOffError::Key)?;

        let state = if pressed {
            self.led.set_low().map_err(OnOffError::Led)?;
            PowerState::On
        } else {
            self.led.set_high().map_err(OnOffError::Led)?;
            PowerState::Off
        };

        if state != self.state {
            #[cfg(feature = "defmt")]
            defmt::debug!("power {} -> {}", self.state, state);

            self.state = state;
        }

        Ok(state)
    }

    pub fn release(self) -> (KeyPin, LedPin) {
        (self.key, self.led)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Bus, FakeInput, Line};

    #[test]
    fn starts_off() {
        let bus = Bus::new();
        let on_off = OnOff::new(FakeInput::pulled_up(), bus.pin(Line::Led));

        assert_eq!(PowerState::Off, on_off.state());
        assert!(!on_off.is_on());
        assert!(bus.events().is_empty());
    }

    #[test]
    fn follows_key_and_drives_led() {
        let bus = Bus::new();
        let key = FakeInput::pulled_up();
        let mut on_off = OnOff::new(key.clone(), bus.pin(Line::Led));

        assert_eq!(Ok(PowerState::Off), on_off.poll());
        assert_eq!(Some(true), bus.level(Line::Led));

        key.press();
        assert_eq!(Ok(PowerState::On), on_off.poll());
        assert!(on_off.is_on());
        assert_eq!(Some(false), bus.level(Line::Led));

        key.release();
        assert_eq!(Ok(PowerState::Off), on_off.poll());
        assert_eq!(Some(true), bus.level(Line::Led));
    }

    #[test]
    fn errors_keep_previous_state() {
        let bus = Bus::new();
        let key = FakeInput::pulled_up();
        let mut on_off = OnOff::new(key.clone(), bus.pin(Line::Led));

        key.press();
        on_off.poll().unwrap();

        key.fail();
        assert!(matches!(on_off.poll(), Err(OnOffError::Key(_))));
        assert_eq!(PowerState::On, on_off.state());
    }

    #[test]
    fn led_errors_are_reported() {
        let bus = Bus::new();
        let mut on_off = OnOff::new(FakeInput::pulled_up(), bus.pin(Line::Led));

        bus.fail_on(Line::Led);
        assert!(matches!(on_off.poll(), Err(OnOffError::Led(_))));
    }
}
