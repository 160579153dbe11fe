//! Madgwick quaternion filter demonstration
//!
//! Reads scaled samples from the BerryIMU, fuses them with the Madgwick filter
//! and prints yaw, pitch and roll.
//!
//! Run with: `cargo run --example madgwick -- [bus] [beta]`

#[cfg(target_os = "linux")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use berry_imu::{DEFAULT_BETA, Imu, Madgwick, RateLimiter, Vector3Ext};
    use nalgebra::Quaternion;

    const SAMPLE_PERIOD: f32 = 0.01; // 10 ms sample period

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let bus: u8 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 1,
    };
    let beta: f32 = match args.next() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_BETA,
    };

    let mut imu = Imu::open(bus)?;
    println!("{imu}, beta = {beta}");

    let mut filter = Madgwick::new(beta, Quaternion::identity());
    let mut clock = RateLimiter::new(SAMPLE_PERIOD);
    loop {
        let dt = clock.tick();
        let sample = imu.read_motion()?;

        filter.update(
            sample.gyroscope.deg_to_rad(),
            sample.accelerometer,
            sample.magnetometer,
            dt,
        );

        let angles = filter.euler();
        println!(
            "Yaw: {:7.2}, Pitch: {:7.2}, Roll: {:7.2}",
            angles.yaw, angles.pitch, angles.roll
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("this example needs a Linux I2C device node");
}
