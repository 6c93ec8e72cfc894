//! Running a robot from power-on to shutdown.

use crate::core::{Clock, State};
use crate::error::DriveError;
use crate::hardware::{
    Battery, HardwareError, LineSensors, Lights, Motors, ObstacleSensor, StateDisplay,
    MIN_BATTERY_VOLTAGE,
};
use crate::robot::Robot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Refuse to start on a depleted battery.
///
/// Returns the measured voltage. On low battery the voltage is shown on
/// `display` and [`DriveError::LowBattery`] is returned.
pub fn preflight<B, D>(battery: &mut B, display: &mut D) -> Result<f32, DriveError>
where
    B: Battery,
    D: StateDisplay,
{
    let voltage = battery.voltage()?;
    if voltage <= MIN_BATTERY_VOLTAGE {
        log::error!("Battery at {voltage:.2}V, refusing to start");
        display.show(&format!("LOW BATTERY {voltage:.2}V"));
        return Err(DriveError::LowBattery { voltage });
    }
    log::info!("Battery at {voltage:.2}V");
    Ok(voltage)
}

/// Start the robot and tick it every `period` until `stop` is raised.
///
/// The motors are halted on the way out, whether the loop ended normally or
/// because starting or a tick failed. Returns the number of completed ticks.
pub fn run<L, M, G, O, D, C>(
    robot: &mut Robot<L, M, G, O, D, C>,
    stop: &AtomicBool,
    period: Duration,
) -> Result<u64, DriveError>
where
    L: LineSensors,
    M: Motors,
    G: Lights,
    O: ObstacleSensor,
    D: StateDisplay,
    C: Clock,
{
    if let Err(err) = robot.start() {
        log::error!("Start failed: {err}");
        return Err(halt_after(robot, err));
    }
    log::info!("Drive loop started, period {period:?}");

    let mut ticks = 0;
    while !stop.load(Ordering::Relaxed) {
        let started = Instant::now();
        if let Err(err) = robot.drive() {
            log::error!("Tick {ticks} failed: {err}");
            return Err(halt_after(robot, err));
        }
        ticks += 1;

        if let Some(rest) = period.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    log::info!(
        "Drive loop stopped after {ticks} ticks in {}",
        robot.state().name()
    );
    robot.stop()?;
    Ok(ticks)
}

/// Halt the motors after `err`; a failing halt is logged, `err` is returned.
fn halt_after<L, M, G, O, D, C>(
    robot: &mut Robot<L, M, G, O, D, C>,
    err: HardwareError,
) -> DriveError
where
    L: LineSensors,
    M: Motors,
    G: Lights,
    O: ObstacleSensor,
    D: StateDisplay,
    C: Clock,
{
    if let Err(halt) = robot.stop() {
        log::error!("Could not halt motors: {halt}");
    }
    err.into()
}
