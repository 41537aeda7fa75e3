//! Diagnostic output conventions: `[ts] [System] …` lines for
//! coordinator events, `[Actor N] …` lines for actor `print` output.
//! Printed only from the coordinator so cross-actor ordering follows
//! signal-channel order.

// Layer 2: Third-party crate imports
use chrono::Utc;

/// Millisecond-precision wall-clock timestamp string.
pub fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Print a coordinator/system diagnostic line, timestamped.
pub fn print_system(message: &str) {
    println!("[{}] [System] {message}", timestamp());
}

/// Print an already-formatted actor output line (the `[Actor N] ...`
/// prefix was applied inside the sandbox).
pub fn print_actor_line(line: &str) {
    println!("{line}");
}
