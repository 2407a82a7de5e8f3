// ── Command line ──────────────────────────────────────────────────────────────
//
// mdh takes positional arguments only, and everything after the program path
// belongs to the managed program, so there is no option parser here: just the
// two literal help flags and the usage / help text.

use std::ffi::{OsStr, OsString};

use crate::error::{HostError, Result};

/// Flags that request the full help text.
const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// Name shown in usage text when `argv[0]` is missing.
const DEFAULT_NAME: &str = "mdh";

/// The validated shape of `argv`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Invocation<'a> {
    /// Path of the hosting library (`argv[1]`).
    pub(crate) library: &'a OsStr,
    /// `argv[1..]`: what `mono_main` receives.
    pub(crate) forwarded: &'a [OsString],
}

/// Check argument count and help flags.
pub(crate) fn parse(args: &[OsString]) -> Result<Invocation<'_>> {
    let Some((library, _)) = args.get(1..).and_then(<[OsString]>::split_first) else {
        return Err(HostError::Usage { help: false });
    };
    if HELP_FLAGS.iter().any(|flag| library == *flag) {
        return Err(HostError::Usage { help: true });
    }
    Ok(Invocation {
        library: library.as_os_str(),
        forwarded: &args[1..],
    })
}

/// The launcher name for usage text.
pub(crate) fn program_name(args: &[OsString]) -> String {
    args.first()
        .map(|a| a.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_NAME.to_owned())
}

/// One-line usage.
pub(crate) fn usage(name: &str) -> String {
    format!("usage: {name} <mono dynamic library> <.NET executable> [<arg> ...]")
}

/// Full help text.
pub(crate) fn help(name: &str) -> String {
    format!(
        "{usage}
       {name} -h | --help

Loads a Mono hosting library at runtime and runs a managed program with it.

Arguments:
  <mono dynamic library>  e.g. libmonosgen-2.0.so, libmonosgen-2.0.dylib, mono-2.0-sgen.dll
  <.NET executable>       managed program to run
  <arg> ...               passed to the managed program unchanged

Environment:
  MDH_VERBOSE                       diagnostic verbosity (0 = silent, 1-3 = more detail)
  MDH_TRUSTED_PLATFORM_ASSEMBLIES   trusted platform assemblies for monovm_initialize
  TRUSTED_PLATFORM_ASSEMBLIES       fallback for the above
  MONO_PATH                         assembly root for the classic embedding API

Exit status is the managed program's; 1 if mdh itself fails.",
        usage = usage(name),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
