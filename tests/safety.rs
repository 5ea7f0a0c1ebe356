//! Safety framework for NZS hardware tests
//!
//! This module provides safety controls and constants for testing hardware
//! without risking damage or losing the console.

/// Maximum safe speed for movement tests
pub const MAX_SAFE_SPEED: i32 = 5;

/// Maximum safe angle for position movement tests (10 degrees)
pub const MAX_SAFE_ANGLE_DEGREES: f64 = 10.0;

/// Maximum safe relative move in steps
pub const MAX_SAFE_STEPS: i32 = 50;

/// Commands that should NEVER be tested on real hardware
/// These commands can stall the motor or change persistent calibration
pub const DANGEROUS_COMMANDS: &[(&str, &str)] = &[
    ("calibrate", "Overwrites the stored encoder calibration"),
    (
        "maxcurrent",
        "A wrong current limit can overheat the motor",
    ),
    ("ctrlmode", "Switching to Off drops holding torque"),
];

/// Check if a command should be skipped during testing
#[allow(dead_code)]
pub fn should_skip_command(keyword: &str) -> bool {
    DANGEROUS_COMMANDS.iter().any(|(name, _)| *name == keyword)
}

/// Validate speed parameter is within safe limits
pub fn validate_safe_speed(speed: i32) -> Result<(), String> {
    if speed.abs() > MAX_SAFE_SPEED {
        Err(format!(
            "Speed {} exceeds safe limit of {}",
            speed, MAX_SAFE_SPEED
        ))
    } else {
        Ok(())
    }
}

/// Validate angle parameter is within safe limits
pub fn validate_safe_angle(angle_degrees: f64) -> Result<(), String> {
    if angle_degrees.abs() > MAX_SAFE_ANGLE_DEGREES {
        Err(format!(
            "Angle {} degrees exceeds safe limit of {} degrees",
            angle_degrees, MAX_SAFE_ANGLE_DEGREES
        ))
    } else {
        Ok(())
    }
}

/// Validate step count is within safe limits
pub fn validate_safe_steps(count: i32) -> Result<(), String> {
    if count.abs() > MAX_SAFE_STEPS {
        Err(format!(
            "Step count {} exceeds safe limit of {}",
            count, MAX_SAFE_STEPS
        ))
    } else {
        Ok(())
    }
}
