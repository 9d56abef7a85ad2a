//! Console and capture demonstration
//!
//! Shows the six severities on the console renderer, caller correction for
//! Trace, switching thresholds at runtime and reading output back through a
//! capture logger.
//!
//! Run with `SEVLOG_LEVEL=trace SEVLOG_SOURCE=1` to see source locations.

use sevlog_core::{attrs, init, CaptureLogger, Profile, Sensitive, Settings, LEVEL_WARN};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== sevlog console demo ===\n");

    // ===== Part 1: Settings from the environment =====
    let settings = Settings::from_env()?;
    println!("settings: {:?}\n", settings);
    let mut log = init(&settings);

    log.trace("probing cache", &attrs!["key" => "user:42"]);
    log.debug("cache miss", &[]);
    log.info("request served", &attrs!["status" => 200u16, "ms" => 12.5f64]);
    log.warn("slow upstream", &attrs!["token" => Sensitive::new("s3cr3t")]);
    log.error("upstream failed", &attrs!["retries" => 3i64]);

    // ===== Part 2: Runtime threshold and caller capture =====
    log.set_level_str("warn")?;
    log.info("not shown", &[]);
    log.set_report_caller(true);
    log.warn("now with a source location", &[]);

    // ===== Part 3: Development profile =====
    let dev = Settings::from_profile(Profile::Development).build(log.destination().clone());
    dev.trace("trace shows the caller of trace(), not the facade", &[]);

    // ===== Part 4: Capture logger =====
    println!("\n## Capture\n");
    let capture = CaptureLogger::new("info")?;
    capture.info("captured", &[]);
    capture.warn("captured warning", &[]);
    capture.fatal("fatal, but the demo keeps running", &[]);

    let warning = capture.get_next_level(LEVEL_WARN)?;
    println!("first warning: {:?}", warning.message);
    let fatal = capture.get_next()?;
    println!("then: {} {:?}", fatal.level_str, fatal.message);
    capture.close();

    Ok(())
}
