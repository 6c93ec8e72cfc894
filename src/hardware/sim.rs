//! In-memory hardware for tests, demos and desk simulation.
//!
//! Every simulated device hands out cheap clones that share state, so a test
//! can keep one handle for scripting and inspection while the robot owns
//! another. Single-threaded by design, like the drive loop itself.

use super::{
    AnalogInput, HardwareError, LineSensors, Lights, MotorCommand, Motors, ObstacleSensor,
    PixelStrip, Rgb, SensorSnapshot, Side, StateDisplay, OFF, PIXEL_COUNT,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Line sensors returning whatever snapshot was last scripted.
#[derive(Clone, Debug, Default)]
pub struct SimLineSensors {
    snapshot: Rc<Cell<SensorSnapshot>>,
    fault: Rc<Cell<bool>>,
    reads: Rc<Cell<usize>>,
}

impl SimLineSensors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, snapshot: SensorSnapshot) {
        self.snapshot.set(snapshot);
    }

    /// Make every following read fail until cleared.
    pub fn fail(&self, fault: bool) {
        self.fault.set(fault);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl LineSensors for SimLineSensors {
    fn read(&mut self) -> Result<SensorSnapshot, HardwareError> {
        if self.fault.get() {
            return Err(HardwareError::Unavailable("line sensors".into()));
        }
        self.reads.set(self.reads.get() + 1);
        Ok(self.snapshot.get())
    }
}

#[derive(Debug, Default)]
struct MotorLog {
    commands: Vec<MotorCommand>,
    initialized: usize,
    fault: bool,
}

/// Motors recording every applied command.
#[derive(Clone, Debug, Default)]
pub struct SimMotors {
    log: Rc<RefCell<MotorLog>>,
}

impl SimMotors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<MotorCommand> {
        self.log.borrow().commands.clone()
    }

    /// Drain the recorded commands.
    pub fn take_commands(&self) -> Vec<MotorCommand> {
        std::mem::take(&mut self.log.borrow_mut().commands)
    }

    /// Most recent command for one wheel.
    pub fn last(&self, side: Side) -> Option<MotorCommand> {
        self.log
            .borrow()
            .commands
            .iter()
            .rev()
            .find(|c| c.side == side)
            .copied()
    }

    pub fn initialized(&self) -> usize {
        self.log.borrow().initialized
    }

    pub fn fail(&self, fault: bool) {
        self.log.borrow_mut().fault = fault;
    }
}

impl Motors for SimMotors {
    fn initialize(&mut self) -> Result<(), HardwareError> {
        self.log.borrow_mut().initialized += 1;
        Ok(())
    }

    fn apply(&mut self, command: MotorCommand) -> Result<(), HardwareError> {
        let mut log = self.log.borrow_mut();
        if log.fault {
            return Err(HardwareError::Unavailable("motor controller".into()));
        }
        log.commands.push(command);
        Ok(())
    }
}

/// Calls made on [`SimLights`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightEvent {
    IndicateLeft,
    IndicateRight,
    TurnOff,
    BlinkAll,
    BrakeOn,
    BrakeOff,
}

/// Lights recording every call.
#[derive(Clone, Debug, Default)]
pub struct SimLights {
    events: Rc<RefCell<Vec<LightEvent>>>,
    fault: Rc<Cell<bool>>,
}

impl SimLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LightEvent> {
        self.events.borrow().clone()
    }

    pub fn take_events(&self) -> Vec<LightEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Make every following call fail until cleared.
    pub fn fail(&self, fault: bool) {
        self.fault.set(fault);
    }

    /// Whether the brake lights are currently on.
    pub fn brake_lit(&self) -> bool {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|e| matches!(e, LightEvent::BrakeOn | LightEvent::BrakeOff))
            == Some(&LightEvent::BrakeOn)
    }

    fn push(&mut self, event: LightEvent) -> Result<(), HardwareError> {
        if self.fault.get() {
            return Err(HardwareError::Pixels("pixel strip not responding".into()));
        }
        self.events.borrow_mut().push(event);
        Ok(())
    }
}

impl Lights for SimLights {
    fn indicate_left(&mut self) -> Result<(), HardwareError> {
        self.push(LightEvent::IndicateLeft)
    }

    fn indicate_right(&mut self) -> Result<(), HardwareError> {
        self.push(LightEvent::IndicateRight)
    }

    fn turn_off(&mut self) -> Result<(), HardwareError> {
        self.push(LightEvent::TurnOff)
    }

    fn blink_all(&mut self) -> Result<(), HardwareError> {
        self.push(LightEvent::BlinkAll)
    }

    fn brake_on(&mut self) -> Result<(), HardwareError> {
        self.push(LightEvent::BrakeOn)
    }

    fn brake_off(&mut self) -> Result<(), HardwareError> {
        self.push(LightEvent::BrakeOff)
    }
}

/// Display keeping every shown text.
#[derive(Clone, Debug, Default)]
pub struct SimDisplay {
    shown: Rc<RefCell<Vec<String>>>,
}

impl SimDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.shown.borrow().last().cloned()
    }
}

impl StateDisplay for SimDisplay {
    fn show(&mut self, text: &str) {
        self.shown.borrow_mut().push(text.to_owned());
    }
}

/// Obstacle sensor with a scripted answer that counts how often it is polled.
#[derive(Clone, Debug, Default)]
pub struct SimObstacleSensor {
    present: Rc<Cell<bool>>,
    polls: Rc<Cell<usize>>,
}

impl SimObstacleSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, present: bool) {
        self.present.set(present);
    }

    pub fn polls(&self) -> usize {
        self.polls.get()
    }
}

impl ObstacleSensor for SimObstacleSensor {
    fn detect(&mut self) -> bool {
        self.polls.set(self.polls.get() + 1);
        self.present.get()
    }
}

/// Pixel strip buffering colors in memory.
#[derive(Clone, Debug)]
pub struct SimPixelStrip {
    buffer: [Rgb; PIXEL_COUNT],
    pixels: [Rgb; PIXEL_COUNT],
    writes: usize,
}

impl SimPixelStrip {
    pub fn new() -> Self {
        Self {
            buffer: [OFF; PIXEL_COUNT],
            pixels: [OFF; PIXEL_COUNT],
            writes: 0,
        }
    }

    /// Colors as of the last write.
    pub fn pixels(&self) -> [Rgb; PIXEL_COUNT] {
        self.pixels
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Default for SimPixelStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelStrip for SimPixelStrip {
    fn set(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.buffer.get_mut(index) {
            *pixel = color;
        }
    }

    fn write(&mut self) -> Result<(), HardwareError> {
        self.pixels = self.buffer;
        self.writes += 1;
        Ok(())
    }
}

/// Analog pin returning a settable raw sample.
#[derive(Clone, Debug, Default)]
pub struct SimAnalog {
    raw: Rc<Cell<u16>>,
}

impl SimAnalog {
    pub fn new(raw: u16) -> Self {
        Self {
            raw: Rc::new(Cell::new(raw)),
        }
    }

    pub fn set(&self, raw: u16) {
        self.raw.set(raw);
    }
}

impl AnalogInput for SimAnalog {
    fn read_raw(&mut self) -> Result<u16, HardwareError> {
        Ok(self.raw.get())
    }
}

/// Error returned by [`SimI2c`] when a fault is injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimI2cError(pub ErrorKind);

impl embedded_hal::i2c::Error for SimI2cError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

#[derive(Debug, Default)]
struct I2cLog {
    writes: Vec<(u8, Vec<u8>)>,
    reads: Vec<u8>,
    queued: VecDeque<u8>,
    fault: Option<ErrorKind>,
}

/// I2C bus recording writes and serving queued read bytes.
#[derive(Clone, Debug, Default)]
pub struct SimI2c {
    log: Rc<RefCell<I2cLog>>,
}

impl SimI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a byte for the next read; reads with nothing queued return zero.
    pub fn queue_read(&self, byte: u8) {
        self.log.borrow_mut().queued.push_back(byte);
    }

    pub fn fail_with(&self, kind: ErrorKind) {
        self.log.borrow_mut().fault = Some(kind);
    }

    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.log.borrow().writes.clone()
    }

    /// Addresses read from, in order.
    pub fn reads(&self) -> Vec<u8> {
        self.log.borrow().reads.clone()
    }
}

impl ErrorType for SimI2c {
    type Error = SimI2cError;
}

impl I2c for SimI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut log = self.log.borrow_mut();
        if let Some(kind) = log.fault {
            return Err(SimI2cError(kind));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => log.writes.push((address, bytes.to_vec())),
                Operation::Read(buffer) => {
                    log.reads.push(address);
                    for byte in buffer.iter_mut() {
                        *byte = log.queued.pop_front().unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that only accumulates the requested time.
#[derive(Clone, Debug, Default)]
pub struct SimDelay {
    total_ns: Rc<Cell<u64>>,
}

impl SimDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ns(&self) -> u64 {
        self.total_ns.get()
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}
