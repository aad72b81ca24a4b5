//! Fake pins for the unit tests.  Output pins record every level they are driven to in a shared
//! log, so tests can check the exact sequence of edges on the bus.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal_1::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

use crate::BitBangingBusDriver;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Data,
    Clock,
    Latch,
    Led,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FakePinError;

impl digital::Error for FakePinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// What reached the shift register chain, decoded from the pin log
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Byte(u8),
    Latch,
}

#[derive(Default)]
struct State {
    events: Vec<(Line, bool)>,
    fail_on: Option<Line>,
}

/// The shared log all fake output pins write to
#[derive(Clone, Default)]
pub struct Bus(Rc<RefCell<State>>);

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, line: Line) -> FakePin {
        FakePin {
            line,
            bus: self.clone(),
        }
    }

    pub fn driver(&self) -> BitBangingBusDriver<FakePin, FakePin, FakePin> {
        BitBangingBusDriver::new(
            self.pin(Line::Data),
            self.pin(Line::Clock),
            self.pin(Line::Latch),
        )
        .unwrap()
    }

    /// Forget everything logged so far
    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }

    /// Make every write to `line` fail from now on
    pub fn fail_on(&self, line: Line) {
        self.0.borrow_mut().fail_on = Some(line);
    }

    pub fn events(&self) -> Vec<(Line, bool)> {
        self.0.borrow().events.clone()
    }

    /// Level most recently driven on `line`
    pub fn level(&self, line: Line) -> Option<bool> {
        self.0
            .borrow()
            .events
            .iter()
            .rev()
            .find(|(l, _)| *l == line)
            .map(|(_, level)| *level)
    }

    pub fn rising_edges(&self, line: Line) -> usize {
        let mut previous = None;
        let mut count = 0;

        for (l, level) in self.events() {
            if l == line {
                if previous == Some(false) && level {
                    count += 1;
                }
                previous = Some(level);
            }
        }

        count
    }

    /// The data line level sampled at each rising edge of the shift clock
    pub fn bits_at_rising_clock(&self) -> Vec<bool> {
        let mut data = false;
        let mut clock = None;
        let mut bits = Vec::new();

        for (line, level) in self.events() {
            match line {
                Line::Data => data = level,
                Line::Clock => {
                    if clock == Some(false) && level {
                        bits.push(data);
                    }
                    clock = Some(level);
                }
                _ => {}
            }
        }

        bits
    }

    /// Bytes as the shift register would assemble them, interleaved with register clock pulses
    pub fn transmitted(&self) -> Vec<Sent> {
        let mut data = false;
        let mut clock = None;
        let mut latch = None;
        let mut byte = 0u8;
        let mut bit_count = 0;
        let mut sent = Vec::new();

        for (line, level) in self.events() {
            match line {
                Line::Data => data = level,
                Line::Clock => {
                    if clock == Some(false) && level {
                        byte = (byte << 1) | data as u8;
                        bit_count += 1;

                        if bit_count == 8 {
                            sent.push(Sent::Byte(byte));
                            byte = 0;
                            bit_count = 0;
                        }
                    }
                    clock = Some(level);
                }
                Line::Latch => {
                    if latch == Some(false) && level {
                        sent.push(Sent::Latch);
                    }
                    latch = Some(level);
                }
                Line::Led => {}
            }
        }

        sent
    }
}

pub struct FakePin {
    line: Line,
    bus: Bus,
}

impl FakePin {
    pub fn line(&self) -> Line {
        self.line
    }

    fn drive(&mut self, level: bool) -> Result<(), FakePinError> {
        let mut state = self.bus.0.borrow_mut();

        if state.fail_on == Some(self.line) {
            return Err(FakePinError);
        }

        state.events.push((self.line, level));
        Ok(())
    }
}

impl ErrorType for FakePin {
    type Error = FakePinError;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// An input whose level the test controls through a shared handle
#[derive(Clone)]
pub struct FakeInput {
    level: Rc<Cell<bool>>,
    fail: Rc<Cell<bool>>,
}

impl FakeInput {
    /// A pulled-up input: high until something pulls it low
    pub fn pulled_up() -> Self {
        Self {
            level: Rc::new(Cell::new(true)),
            fail: Rc::new(Cell::new(false)),
        }
    }

    pub fn set_high(&self, high: bool) {
        self.level.set(high);
    }

    pub fn press(&self) {
        self.set_high(false);
    }

    pub fn release(&self) {
        self.set_high(true);
    }

    pub fn fail(&self) {
        self.fail.set(true);
    }
}

impl ErrorType for FakeInput {
    type Error = FakePinError;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.fail.get() {
            return Err(FakePinError);
        }

        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
