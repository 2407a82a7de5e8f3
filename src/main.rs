// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::posix` / `platform::win32` – OS loader FFI
//   • `host`                                – calls into the hosting library
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

mod cli;
mod config;
mod error;
mod host;
mod launcher;
mod logging;
mod platform;

use std::ffi::OsString;

use config::Config;
use error::HostError;
use launcher::Launcher;
use platform::{NativePlatform, Platform};

/// Exit status for every failure mdh itself detects.
const FAILURE_EXIT_CODE: i32 = 1;

fn main() {
    let args: Vec<OsString> = std::env::args_os().collect();

    let platform = NativePlatform::new();
    platform.init();

    let config = Config::from_platform(&platform);
    let code = tracing::subscriber::with_default(logging::subscriber(&config), || {
        match Launcher::new(&platform).run(&args) {
            Ok(code) => code,
            Err(e) => {
                report(&args, &e);
                FAILURE_EXIT_CODE
            }
        }
    });

    std::process::exit(code);
}

/// Print a launcher failure: usage text for usage errors, otherwise a single
/// `mdh: ...` line.
fn report(args: &[OsString], error: &HostError) {
    let name = cli::program_name(args);
    match error {
        HostError::Usage { help: true } => println!("{}", cli::help(&name)),
        HostError::Usage { help: false } => eprintln!("{}", cli::usage(&name)),
        other => eprintln!("mdh: {other}"),
    }
}
