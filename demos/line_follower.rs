//! Line Follower Simulation
//!
//! This demo drives the robot around a simulated course with twelve
//! intersections and prints the route it took.
//!
//! Key concepts:
//! - Building a robot from simulated hardware
//! - Driving time with a manual clock instead of sleeping
//! - Checking the battery before starting
//! - Inspecting the state history after the run
//!
//! Run with: RUST_LOG=info cargo run --example line_follower

use linewise::core::{DriveState, ManualClock, State};
use linewise::hardware::sim::{SimAnalog, SimDisplay, SimLineSensors, SimMotors, SimPixelStrip};
use linewise::hardware::{BatteryMonitor, IndicatorLights, SensorSnapshot};
use linewise::navigation::Turn;
use linewise::session::preflight;
use linewise::{Command, DriveConfig, RobotBuilder, Tick};
use std::error::Error;

/// Forward ticks between two intersections.
const SEGMENT: u32 = 60;
/// Spin ticks until the outer detector finds the new line.
const SPIN_TICKS: u32 = 12;
const MAX_TICKS: u32 = 5_000;

/// One decision per intersection.
const ROUTE: [Turn; 12] = [
    Turn::Forward,
    Turn::Left,
    Turn::Right,
    Turn::Left,
    Turn::Forward,
    Turn::Left,
    Turn::Forward,
    Turn::Left,
    Turn::Forward,
    Turn::Right,
    Turn::Left,
    Turn::Left,
];

const CENTER: SensorSnapshot = SensorSnapshot::new(false, true, false);
const LEFT: SensorSnapshot = SensorSnapshot::new(true, false, false);
const RIGHT: SensorSnapshot = SensorSnapshot::new(false, false, true);
const CROSS: SensorSnapshot = SensorSnapshot::new(true, true, true);
const DARK: SensorSnapshot = SensorSnapshot::new(false, false, false);

/// A course of straight segments joined by intersections.
#[derive(Default)]
struct Course {
    distance: u32,
    spin: u32,
    spinning: Option<Command>,
    marking_passed: bool,
}

impl Course {
    fn reading(&self) -> SensorSnapshot {
        match self.spinning {
            Some(Command::Left) if self.spin >= SPIN_TICKS => LEFT,
            Some(Command::Right) if self.spin >= SPIN_TICKS => RIGHT,
            Some(_) => DARK,
            None if self.at_marking() => CROSS,
            // The line wobbles under the sensors.
            None => match self.distance % 9 {
                3 => LEFT,
                6 => RIGHT,
                _ => CENTER,
            },
        }
    }

    fn at_marking(&self) -> bool {
        self.distance > 0 && self.distance % SEGMENT == 0 && !self.marking_passed
    }

    fn apply(&mut self, tick: &Tick) {
        match tick.state {
            DriveState::TurnLeft | DriveState::TurnRight => {
                let towards = if tick.state == DriveState::TurnLeft {
                    Command::Left
                } else {
                    Command::Right
                };
                self.spinning = Some(towards);
                if tick.command.is_some() {
                    self.spin += 1;
                }
            }
            // The chassis rolls over the marking while braking.
            DriveState::Break => self.marking_passed = true,
            _ => {}
        }

        if tick.command == Some(Command::Forward) {
            self.distance += 1;
            self.spinning = None;
            self.spin = 0;
            if self.distance % SEGMENT != 0 {
                self.marking_passed = false;
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Line Follower Simulation ===\n");

    let mut battery = BatteryMonitor::new(SimAnalog::new(64 * 780));
    let mut display = SimDisplay::new();
    let voltage = preflight(&mut battery, &mut display)?;
    println!("Battery: {voltage:.2}V");

    let config = DriveConfig {
        history_limit: 128,
        ..DriveConfig::default()
    }
    .with_route(ROUTE);
    let period = config.tick_period();

    let sensors = SimLineSensors::new();
    let motors = SimMotors::new();
    let clock = ManualClock::new();
    let lights = IndicatorLights::from_config(SimPixelStrip::new(), clock.clone(), &config);
    let mut robot = RobotBuilder::new()
        .line_sensors(sensors.clone())
        .motors(motors.clone())
        .lights(lights)
        .display(display.clone())
        .clock(clock.clone())
        .config(config)
        .build()?;

    robot.start()?;
    let mut course = Course::default();
    let mut ticks = 0;
    while !robot.is_finished() && ticks < MAX_TICKS {
        sensors.set(course.reading());
        let tick = robot.drive()?;
        course.apply(&tick);
        clock.advance(period);
        ticks += 1;
    }
    robot.stop()?;

    let route: Vec<&str> = ROUTE.iter().map(Turn::as_str).collect();
    println!("\nRoute: {}", route.join(", "));
    println!(
        "Finished in {} after {ticks} ticks ({:.1}s simulated)",
        robot.state().name(),
        clock.elapsed().as_secs_f64()
    );
    println!("Motor commands issued: {}", motors.commands().len());
    println!("Display trail: {}", display.shown().join(" "));

    let history = robot.holder().history();
    println!("\nState changes recorded: {}", history.len());
    println!("{}", serde_json::to_string_pretty(history)?);

    println!("\n=== Demo Complete ===");
    Ok(())
}
