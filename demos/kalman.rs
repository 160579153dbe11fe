//! Kalman pitch/roll demonstration
//!
//! Detects the BerryIMU on an I2C bus and prints filtered pitch and roll at
//! up to 100 Hz.
//!
//! Run with: `cargo run --example kalman -- [bus]` (defaults to bus 1)
//! Set `RUST_LOG=debug` to see detection and configuration.

#[cfg(target_os = "linux")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use berry_imu::{Imu, KalmanFilter, KalmanSettings};

    env_logger::init();

    let bus: u8 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 1,
    };

    let mut imu = Imu::open(bus)?;
    println!("{imu}");

    let mut kalman = KalmanFilter::new(&mut imu, KalmanSettings::default());
    loop {
        let angles = kalman.step()?;
        let (pitch_bias, roll_bias) = kalman.biases();
        println!(
            "Pitch: {:7.2}, Roll: {:7.2}  (bias {:+.3}, {:+.3} deg/s)",
            angles.pitch, angles.roll, pitch_bias, roll_bias
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("this example needs a Linux I2C device node");
}
