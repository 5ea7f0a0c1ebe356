//! Basic example demonstrating NZS motor control over the serial console.
//!
//! This example shows how to:
//! - Connect to the controller via serial port
//! - Configure the control mode and microstepping
//! - Move the motor to specific angles
//! - Read encoder feedback
//!
//! Set the `NZS_ENV_UART` environment variable (or `.env` entry) to your
//! serial port path. `RUST_LOG=nzs_servo_rs=debug` shows every command line.

use std::thread;
use std::time::Duration;

use nzs_servo_rs::{
    ControlMode, Controller, DEFAULT_MOVE_SPEED, LinkConfig, SerialTransport, Transport,
};
use tracing_subscriber::EnvFilter;

/// Microstepping divisor
const MICROSTEPS: u8 = 16;

fn main() -> nzs_servo_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let link = LinkConfig::from_env()?;
    println!("Connecting to: {} @ {}", link.port, link.baud_rate);

    let transport = SerialTransport::open(&link.port, link.baud_rate)?;
    let mut controller = Controller::new(transport);

    // === Setup ===
    println!("\n=== Setup ===");

    controller.set_control_mode(ControlMode::SimplePid)?;
    controller.set_microstep(MICROSTEPS)?;
    controller.set_zero()?;
    thread::sleep(Duration::from_millis(100));

    // === Move to 90° ===
    println!("\n=== Move to 90° ===");

    let start = read_angle(&mut controller);
    println!("Start: {:.2}°", start);

    controller.move_to_angle(90.0, DEFAULT_MOVE_SPEED)?;
    thread::sleep(Duration::from_secs(2));

    let end = read_angle(&mut controller);
    println!("End: {:.2}°", end);
    println!("Moved: {:.2}°", (end - start).abs());

    // === Back to zero ===
    println!("\n=== Back to zero ===");

    controller.move_to_angle(0.0, DEFAULT_MOVE_SPEED)?;
    thread::sleep(Duration::from_secs(2));
    println!("End: {:.2}°", read_angle(&mut controller));

    // === Cleanup ===
    println!("\n=== Done ===");
    controller.stop()?;
    Ok(())
}

/// Read encoder and return angle in degrees, NaN if the controller did not answer
fn read_angle<T: Transport>(controller: &mut Controller<T>) -> f64 {
    match controller.read_position() {
        Ok(position) => position.degrees,
        Err(e) => {
            eprintln!("readpos failed: {e}");
            f64::NAN
        }
    }
}
