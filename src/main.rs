//! synthctl CLI binary
//!
//! Minimal entrypoint; all logic is in the library. cli::run() handles
//! all output including errors, main only maps to the process exit code.

fn main() {
    if let Err(code) = synthctl::cli::run() {
        std::process::exit(code.as_i32());
    }
}
