//! End-to-end drive loop scenarios against simulated hardware.
//!
//! Time is driven by a `ManualClock`, so every timed gate is exercised
//! deterministically.

use linewise::core::{DriveState, ManualClock};
use linewise::hardware::sim::{
    LightEvent, SimDisplay, SimLights, SimLineSensors, SimMotors, SimObstacleSensor,
};
use linewise::hardware::{MotorCommand, SensorSnapshot, Side};
use linewise::navigation::Turn;
use linewise::{Command, DriveConfig, Robot, RobotBuilder, Tick};
use std::time::Duration;

const CENTER: SensorSnapshot = SensorSnapshot::new(false, true, false);
const LEFT: SensorSnapshot = SensorSnapshot::new(true, false, false);
const RIGHT: SensorSnapshot = SensorSnapshot::new(false, false, true);
const CROSS: SensorSnapshot = SensorSnapshot::new(true, true, true);
const DARK: SensorSnapshot = SensorSnapshot::new(false, false, false);

type SimRobot =
    Robot<SimLineSensors, SimMotors, SimLights, SimObstacleSensor, SimDisplay, ManualClock>;

struct Rig {
    robot: SimRobot,
    sensors: SimLineSensors,
    motors: SimMotors,
    lights: SimLights,
    display: SimDisplay,
    obstacle: SimObstacleSensor,
    clock: ManualClock,
}

impl Rig {
    fn new(route: &[Turn]) -> Self {
        Self::with_config(DriveConfig::default().with_route(route.iter().copied()))
    }

    fn with_config(config: DriveConfig) -> Self {
        let sensors = SimLineSensors::new();
        let motors = SimMotors::new();
        let lights = SimLights::new();
        let display = SimDisplay::new();
        let obstacle = SimObstacleSensor::new();
        let clock = ManualClock::new();
        let robot = RobotBuilder::new()
            .line_sensors(sensors.clone())
            .motors(motors.clone())
            .lights(lights.clone())
            .display(display.clone())
            .obstacle_sensor(obstacle.clone())
            .clock(clock.clone())
            .config(config)
            .build()
            .unwrap();
        Self {
            robot,
            sensors,
            motors,
            lights,
            display,
            obstacle,
            clock,
        }
    }

    fn step(&mut self, snapshot: SensorSnapshot) -> Tick {
        self.sensors.set(snapshot);
        self.robot.drive().unwrap()
    }

    fn wait(&self, millis: u64) {
        self.clock.advance(Duration::from_millis(millis));
    }
}

#[test]
fn steering_slows_the_wheel_on_the_drift_side() {
    let mut rig = Rig::new(&[]);

    for (snapshot, left, right) in [(LEFT, 30, 90), (RIGHT, 90, 30), (CENTER, 90, 90)] {
        let tick = rig.step(snapshot);
        assert_eq!(tick.state, DriveState::Driving);
        assert_eq!(tick.command, Some(Command::Forward));
        assert_eq!(
            rig.motors.take_commands(),
            [
                MotorCommand::forward(Side::Left, left),
                MotorCommand::forward(Side::Right, right),
            ]
        );
    }
}

#[test]
fn intersection_brakes_for_half_a_second() {
    let mut rig = Rig::new(&[Turn::Forward]);

    let tick = rig.step(CROSS);
    assert_eq!(tick.state, DriveState::Break);
    assert_eq!(tick.command, None);

    let tick = rig.step(CENTER);
    assert_eq!(tick.command, Some(Command::Break));
    assert!(rig.lights.brake_lit());
    assert_eq!(
        rig.motors.take_commands(),
        [MotorCommand::halt(Side::Left), MotorCommand::halt(Side::Right)]
    );

    rig.wait(499);
    assert_eq!(rig.step(CENTER).state, DriveState::Break);

    rig.wait(1);
    let tick = rig.step(CENTER);
    assert_eq!(tick.state, DriveState::Driving);
    assert_eq!(
        rig.robot.holder().pending(),
        Some(&DriveState::ResolveIntersection)
    );
}

#[test]
fn two_detectors_on_the_line_count_as_intersection() {
    for pair in [
        SensorSnapshot::new(true, true, false),
        SensorSnapshot::new(false, true, true),
        SensorSnapshot::new(true, false, true),
    ] {
        let mut rig = Rig::new(&[Turn::Forward]);

        let tick = rig.step(pair);

        assert_eq!(tick.state, DriveState::Break, "{pair:?}");
        assert_eq!(tick.command, None);
        assert_eq!(
            rig.robot.holder().pending(),
            Some(&DriveState::MoveToIntersection)
        );
        assert!(rig.motors.commands().is_empty());
    }
}

#[test]
fn crossing_drives_straight_before_resolving() {
    let mut rig = Rig::new(&[Turn::Forward]);
    rig.step(CROSS);
    rig.wait(500);
    rig.step(CENTER);

    rig.wait(200);
    let tick = rig.step(CENTER);
    assert_eq!(tick.command, Some(Command::Forward));
    assert!(!rig.lights.brake_lit());

    rig.wait(200);
    let tick = rig.step(CENTER);
    assert_eq!(tick.state, DriveState::Driving);
    assert_eq!(rig.robot.holder().pending(), None);
    assert_eq!(rig.robot.navigator().cursor(), 1);
}

#[test]
fn lost_line_aborts_after_grace_period() {
    let mut rig = Rig::new(&[]);
    rig.step(CENTER);
    rig.motors.take_commands();

    let tick = rig.step(DARK);
    assert_eq!(tick.command, None);
    assert!(rig.robot.is_line_lost());

    rig.wait(4_900);
    assert_eq!(rig.step(DARK).state, DriveState::Driving);
    assert!(rig.motors.commands().is_empty());

    rig.wait(100);
    let tick = rig.step(DARK);
    assert_eq!(tick.state, DriveState::Error);
    assert_eq!(tick.command, None);
    assert_eq!(rig.display.last().as_deref(), Some("E"));

    let tick = rig.step(CENTER);
    assert_eq!(tick.state, DriveState::Error);
    assert_eq!(tick.command, Some(Command::Finish));
    assert_eq!(
        rig.motors.take_commands(),
        [MotorCommand::halt(Side::Left), MotorCommand::halt(Side::Right)]
    );
    assert!(rig.lights.events().contains(&LightEvent::BlinkAll));
}

#[test]
fn seeing_the_line_resets_the_grace_period() {
    let mut rig = Rig::new(&[]);

    rig.step(DARK);
    rig.wait(4_000);
    rig.step(DARK);
    rig.step(CENTER);
    assert!(!rig.robot.is_line_lost());

    rig.step(DARK);
    rig.wait(4_000);
    assert_eq!(rig.step(DARK).state, DriveState::Driving);

    rig.wait(1_000);
    assert_eq!(rig.step(DARK).state, DriveState::Error);
}

#[test]
fn configured_grace_period_is_honored() {
    let config = DriveConfig {
        lost_line_grace_secs: 1.5,
        ..DriveConfig::default()
    };
    let mut rig = Rig::with_config(config);

    rig.step(DARK);
    rig.wait(1_499);
    assert_eq!(rig.step(DARK).state, DriveState::Driving);
    rig.wait(1);
    assert_eq!(rig.step(DARK).state, DriveState::Error);
}

#[test]
fn turn_spins_until_matching_detector_sees_line() {
    let mut rig = Rig::new(&[Turn::Left]);
    rig.step(CROSS);
    rig.wait(500);
    rig.step(CENTER);
    rig.wait(400);
    assert_eq!(rig.step(CENTER).state, DriveState::TurnLeft);
    rig.motors.take_commands();

    // The right detector does not end a left turn.
    for snapshot in [DARK, RIGHT, CENTER] {
        let tick = rig.step(snapshot);
        assert_eq!(tick.state, DriveState::TurnLeft);
        assert_eq!(tick.command, Some(Command::Left));
    }
    assert_eq!(
        rig.motors.last(Side::Left),
        Some(MotorCommand::backward(Side::Left, 110))
    );
    assert_eq!(
        rig.motors.last(Side::Right),
        Some(MotorCommand::forward(Side::Right, 110))
    );

    let tick = rig.step(LEFT);
    assert_eq!(tick.state, DriveState::Driving);
    assert_eq!(tick.command, Some(Command::Forward));
}

#[test]
fn single_left_route_end_to_end() {
    let mut rig = Rig::new(&[Turn::Left]);

    let mut ticks = vec![rig.step(CROSS), rig.step(CROSS)];
    rig.wait(500);
    ticks.push(rig.step(CENTER));
    ticks.push(rig.step(CENTER));
    rig.wait(400);
    ticks.push(rig.step(CENTER));
    ticks.push(rig.step(CENTER));
    ticks.push(rig.step(LEFT));

    let observed: Vec<(DriveState, Option<Command>)> =
        ticks.iter().map(|t| (t.state, t.command)).collect();
    assert_eq!(
        observed,
        [
            (DriveState::Break, None),
            (DriveState::Break, Some(Command::Break)),
            (DriveState::Driving, None),
            (DriveState::Driving, Some(Command::Forward)),
            (DriveState::TurnLeft, None),
            (DriveState::TurnLeft, Some(Command::Left)),
            (DriveState::Driving, Some(Command::Forward)),
        ]
    );

    // Second intersection exhausts the route.
    rig.step(CROSS);
    rig.wait(500);
    rig.step(CENTER);
    rig.wait(400);
    assert_eq!(rig.step(CENTER).state, DriveState::Finish);
    assert!(rig.robot.is_finished());

    let path: Vec<DriveState> = rig
        .robot
        .holder()
        .history()
        .get_path()
        .into_iter()
        .copied()
        .collect();
    assert_eq!(
        path,
        [
            DriveState::Driving,
            DriveState::Break,
            DriveState::MoveToIntersection,
            DriveState::Driving,
            DriveState::ResolveIntersection,
            DriveState::TurnLeft,
            DriveState::Driving,
            DriveState::Break,
            DriveState::MoveToIntersection,
            DriveState::Driving,
            DriveState::ResolveIntersection,
            DriveState::Finish,
        ]
    );
    assert_eq!(
        rig.display.shown(),
        ["D", "B", "MTI", "D", "RI", "TL", "D", "B", "MTI", "D", "RI", "F"]
    );

    for _ in 0..5 {
        rig.wait(1_000);
        let tick = rig.step(CROSS);
        assert_eq!(tick.state, DriveState::Finish);
        assert_eq!(tick.command, Some(Command::Finish));
    }
}

#[test]
fn intersection_seen_while_crossing_brakes_again() {
    let mut rig = Rig::new(&[Turn::Forward]);
    rig.step(CROSS);
    rig.wait(500);
    assert_eq!(rig.step(CROSS).state, DriveState::Driving);

    assert_eq!(rig.step(CROSS).state, DriveState::Break);
    assert_eq!(
        rig.robot.holder().pending(),
        Some(&DriveState::MoveToIntersection)
    );
}

#[test]
fn obstacle_is_polled_every_tick_without_effect() {
    let mut rig = Rig::new(&[]);
    rig.obstacle.set(true);

    let tick = rig.step(CENTER);
    assert!(tick.obstacle);
    assert_eq!(tick.command, Some(Command::Forward));

    rig.step(CROSS);
    rig.step(CENTER);
    assert_eq!(rig.obstacle.polls(), 3);
}

#[test]
fn start_resets_lights_and_initializes_motors() {
    let mut rig = Rig::new(&[]);

    rig.robot.start().unwrap();

    assert_eq!(rig.lights.events(), [LightEvent::TurnOff]);
    assert_eq!(rig.motors.initialized(), 1);
}

#[test]
fn identical_inputs_give_identical_runs() {
    let script = [
        (0, CENTER),
        (20, LEFT),
        (20, CROSS),
        (500, CENTER),
        (400, CENTER),
        (20, DARK),
        (20, RIGHT),
        (20, CROSS),
        (500, CENTER),
        (400, DARK),
        (6_000, DARK),
        (20, CENTER),
    ];
    let route = [Turn::Right, Turn::Left];

    let run = || {
        let mut rig = Rig::new(&route);
        let ticks: Vec<Tick> = script
            .iter()
            .map(|&(wait, snapshot)| {
                rig.wait(wait);
                rig.step(snapshot)
            })
            .collect();
        (ticks, rig.motors.commands(), rig.lights.events())
    };

    assert_eq!(run(), run());
}
