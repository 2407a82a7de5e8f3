// ── Startup configuration ─────────────────────────────────────────────────────
//
// A single `Config` is read from the environment once, before the launcher
// runs, and passed by reference to whatever needs it.  There is no global
// mutable state.

use tracing::level_filters::LevelFilter;

use crate::platform::Platform;

// ── Environment variable names ────────────────────────────────────────────────

/// Diagnostic verbosity: `0` silent, higher is chattier.
pub(crate) const VERBOSE_ENV: &str = "MDH_VERBOSE";

/// Launcher-specific override for the trusted platform assembly list.
pub(crate) const MDH_TPA_ENV: &str = "MDH_TRUSTED_PLATFORM_ASSEMBLIES";

/// Generic trusted platform assembly list, as the dotnet host sets it.
pub(crate) const TPA_ENV: &str = "TRUSTED_PLATFORM_ASSEMBLIES";

/// Assembly search root for the classic embedding API.
pub(crate) const MONO_PATH_ENV: &str = "MONO_PATH";

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) verbosity: u32,
}

impl Config {
    pub(crate) fn from_platform<P: Platform>(platform: &P) -> Self {
        let verbosity = platform
            .dup_env(VERBOSE_ENV)
            .map(|v| parse_verbosity(&v.to_string_lossy()))
            .unwrap_or(0);
        Self { verbosity }
    }

    /// Map verbosity onto a tracing level: 0 off, 1 info, 2 debug, 3+ trace.
    pub(crate) fn level_filter(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::OFF,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// `atoi`-style parse: leading whitespace, optional sign, leading digits.
///
/// Garbage parses as 0, negatives clamp to 0, overflow saturates.
fn parse_verbosity(raw: &str) -> u32 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
