//! The drive loop: one call per tick advances the whole robot.
//!
//! Each tick reads the obstacle flag and the line sensors, lets the state
//! holder fire any due transition, and then acts on the current state:
//!
//! | State                 | Action                                                  |
//! |-----------------------|---------------------------------------------------------|
//! | `Finish`, `Error`     | issue `Finish`                                          |
//! | `Break`               | issue `Break`                                           |
//! | `MoveToIntersection`  | drive on for the crossing time, then resolve            |
//! | `ResolveIntersection` | take the next route decision                            |
//! | `TurnLeft/Right`      | spin until the matching detector finds the line         |
//! | `Driving`             | brake at intersections, time out on a lost line, follow |

mod builder;

pub use builder::{BuildError, RobotBuilder};

use crate::config::DriveConfig;
use crate::control::{Command, ControlUnit};
use crate::core::{Clock, DriveState, Guard, StateHistory, StateHolder, Timer};
use crate::hardware::{
    HardwareError, LineSensor, LineSensors, Lights, Motors, ObstacleSensor, SensorSnapshot,
    StateDisplay,
};
use crate::navigation::{Navigator, Turn};
use serde::Serialize;
use std::time::Instant;

/// What one call to [`Robot::drive`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tick {
    /// State after the tick.
    pub state: DriveState,
    /// Command sent to the control unit, if any.
    pub command: Option<Command>,
    /// Obstacle sensor reading; informational only.
    pub obstacle: bool,
}

/// Line-following robot driven one tick at a time.
pub struct Robot<L, M, G, O, D, C> {
    control: ControlUnit<L, M, G, O>,
    navigator: Navigator,
    state: StateHolder<DriveState, D>,
    clock: C,
    config: DriveConfig,
    lost_line: Option<Timer>,
}

impl<L, M, G, O, D, C> Robot<L, M, G, O, D, C>
where
    L: LineSensors,
    M: Motors,
    G: Lights,
    O: ObstacleSensor,
    D: StateDisplay,
    C: Clock,
{
    /// Assemble a robot starting in [`DriveState::Driving`].
    ///
    /// The route is taken from `navigator`; `config.route` is not consulted
    /// here. Prefer [`RobotBuilder`], which validates the configuration.
    pub fn new(
        control: ControlUnit<L, M, G, O>,
        navigator: Navigator,
        display: D,
        clock: C,
        config: DriveConfig,
    ) -> Self {
        let state = StateHolder::with_display(DriveState::Driving, display)
            .with_history(StateHistory::with_limit(config.history_limit));
        Self {
            control,
            navigator,
            state,
            clock,
            config,
            lost_line: None,
        }
    }

    /// Switch the indicators off and initialize the motor controller.
    pub fn start(&mut self) -> Result<(), HardwareError> {
        self.control.lights_mut().turn_off()?;
        self.control.initialize()
    }

    /// Halt both motors.
    pub fn stop(&mut self) -> Result<(), HardwareError> {
        self.control.stop()
    }

    /// Advance the state machine by one tick.
    pub fn drive(&mut self) -> Result<Tick, HardwareError> {
        // No avoidance behavior yet; the reading is only reported.
        let obstacle = self.control.is_obstacle();
        let snapshot = self.control.read_sensors()?;
        let now = self.clock.now();

        self.state.tick(now, &snapshot);
        let command = self.act(now, &snapshot)?;

        Ok(Tick {
            state: *self.state.current(),
            command,
            obstacle,
        })
    }

    pub fn state(&self) -> DriveState {
        *self.state.current()
    }

    /// The state holder, for inspecting guards and history.
    pub fn holder(&self) -> &StateHolder<DriveState, D> {
        &self.state
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn control(&self) -> &ControlUnit<L, M, G, O> {
        &self.control
    }

    /// Whether the lost-line timer is running.
    pub fn is_line_lost(&self) -> bool {
        self.lost_line.is_some()
    }

    /// The run is over, successfully or not.
    pub fn is_finished(&self) -> bool {
        use crate::core::State;
        self.state.current().is_final()
    }

    fn act(
        &mut self,
        now: Instant,
        snapshot: &SensorSnapshot,
    ) -> Result<Option<Command>, HardwareError> {
        match self.state() {
            DriveState::Finish | DriveState::Error => self.issue(Command::Finish),
            DriveState::Break => self.issue(Command::Break),
            DriveState::MoveToIntersection => {
                self.state.set_state(
                    DriveState::Driving,
                    Guard::Elapsed(Timer::starting_at(now, self.config.crossing_secs)),
                    Some(DriveState::ResolveIntersection),
                );
                Ok(None)
            }
            DriveState::ResolveIntersection => {
                self.resolve_intersection();
                Ok(None)
            }
            DriveState::TurnLeft => self.issue(Command::Left),
            DriveState::TurnRight => self.issue(Command::Right),
            DriveState::Driving => self.follow_line(now, snapshot),
        }
    }

    fn issue(&mut self, command: Command) -> Result<Option<Command>, HardwareError> {
        self.control.execute(command)?;
        Ok(Some(command))
    }

    fn resolve_intersection(&mut self) {
        match self.navigator.next_turn() {
            Turn::Left => self.state.set_state(
                DriveState::TurnLeft,
                Guard::SensorSeesLine(LineSensor::Left),
                Some(DriveState::Driving),
            ),
            Turn::Right => self.state.set_state(
                DriveState::TurnRight,
                Guard::SensorSeesLine(LineSensor::Right),
                Some(DriveState::Driving),
            ),
            Turn::Forward => self.state.set(DriveState::Driving),
            Turn::Finish => {
                log::info!("Route complete");
                self.state.set_state(DriveState::Finish, Guard::Never, None);
            }
        }
    }

    fn follow_line(
        &mut self,
        now: Instant,
        snapshot: &SensorSnapshot,
    ) -> Result<Option<Command>, HardwareError> {
        if snapshot.no_line() {
            self.track_lost_line(now);
            return Ok(None);
        }
        if self.lost_line.take().is_some() {
            log::info!("Line reacquired");
        }

        if snapshot.is_intersection() {
            self.state.set_state(
                DriveState::Break,
                Guard::Elapsed(Timer::starting_at(now, self.config.brake_secs)),
                Some(DriveState::MoveToIntersection),
            );
            return Ok(None);
        }

        self.issue(Command::Forward)
    }

    /// Coast on the previous command until the grace period runs out.
    fn track_lost_line(&mut self, now: Instant) {
        let grace = self.config.lost_line_grace_secs;
        match self.lost_line {
            None => {
                log::warn!("Line lost, {grace:.1}s to reacquire");
                self.lost_line = Some(Timer::starting_at(now, grace));
            }
            Some(timer) if timer.elapsed(now) => {
                log::error!("Line lost for {grace:.1}s, giving up");
                self.state.set_state(DriveState::Error, Guard::Never, None);
            }
            Some(_) => {}
        }
    }
}
