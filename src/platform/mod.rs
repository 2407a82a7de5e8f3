// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface that the rest of the codebase uses to talk
// to the OS: dynamic loading, symbol lookup, environment, and the two path
// queries the launcher needs.  No `unsafe` lives here; all OS FFI is confined
// to the `posix` and `win32` sub-modules and never leaks outward.
//
// Exactly one implementation is compiled in and exported as `NativePlatform`.
// The launcher is generic over `Platform` and contains no `cfg` branches.

use std::{
    ffi::{c_void, CStr, CString, OsStr, OsString},
    fmt,
    ptr::NonNull,
};

#[cfg(unix)]
pub mod posix;
#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod fake;

#[cfg(unix)]
pub(crate) type NativePlatform = posix::PosixPlatform;
#[cfg(windows)]
pub(crate) type NativePlatform = win32::Win32Platform;

// ── Contract ──────────────────────────────────────────────────────────────────

/// OS facade used by the launcher.
///
/// Every operation has the same observable semantics on every host OS.
pub(crate) trait Platform {
    /// Owned handle to a loaded dynamic library.  Dropping it releases the
    /// image.
    type Library;

    /// One-time per-process setup.  Clears stale loader error state so that
    /// `last_error` only ever describes a failure from this process's own
    /// calls.  Idempotent.
    fn init(&self);

    /// Load a dynamic library from an absolute or relative path.
    ///
    /// Returns `None` on failure; `last_error` describes why.  Loading runs
    /// the library's static initializers.
    fn load_library(&self, path: &CStr) -> Option<Self::Library>;

    /// Resolve an exported symbol by exact, case-sensitive name.
    ///
    /// A missing symbol is not an error at this level; callers decide.
    fn get_symbol(&self, library: &Self::Library, name: &CStr) -> Option<NonNull<c_void>>;

    /// Owned copy of an environment variable, `None` only if unset.
    ///
    /// The value is kept in OS form; it is encoded for the C side with
    /// `to_native_string` when it crosses into the runtime.
    fn dup_env(&self, name: &str) -> Option<OsString>;

    /// Directory portion of `path`, always ending with a path separator.
    fn dirname(&self, path: &OsStr) -> OsString;

    /// `true` only for an existing regular file.
    fn file_exists(&self, path: &OsStr) -> bool;

    /// Human-readable text for the most recent loader / OS error.
    fn last_error(&self) -> String;

    /// Encode a process argument for the C ABI.
    fn to_native_string(&self, arg: &OsStr) -> Option<CString>;

    /// Write `mdh: <message>: <last error>` to stderr.
    fn report_error(&self, message: fmt::Arguments<'_>) {
        let detail = self.last_error();
        eprintln!("mdh: {message}: {detail}");
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Length of the directory prefix of `units`: everything up to and including
/// the last separator.  `None` when there is no separator.
///
/// Works on raw path units (bytes on POSIX, UTF-16 on Windows) so that paths
/// which are not valid Unicode split exactly.
pub(crate) fn dirname_len<T: Copy>(units: &[T], is_separator: impl Fn(T) -> bool) -> Option<usize> {
    units.iter().rposition(|&u| is_separator(u)).map(|idx| idx + 1)
}

#[cfg(all(test, unix))]
pub(crate) use posix::dirname as native_dirname;
#[cfg(all(test, windows))]
pub(crate) use win32::dirname as native_dirname;

// ── Tests ─────────────────────────────────────────────────────────────────────
