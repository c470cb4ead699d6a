//! Command: print version information.

/// Print the macsetup version to stdout.
pub fn run() {
    println!("macsetup {}", crate::version());
}
