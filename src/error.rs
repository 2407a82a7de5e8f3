// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible launcher operations return `error::Result<T>`.  No panics in
// production paths; `main` turns an error into one `mdh: ...` line on stderr
// and exit code 1.

use thiserror::Error;

/// Every error that mdh can produce.
#[derive(Debug, Error)]
pub(crate) enum HostError {
    /// Not enough arguments, or a help flag was given.
    ///
    /// `main` prints the usage text (full help when `help` is set) instead of
    /// the `Display` form.
    #[error("invalid usage")]
    Usage {
        /// `true` when `-h` / `--help` was requested explicitly.
        help: bool,
    },

    /// A process argument could not be handed across the C ABI (interior NUL,
    /// or not representable in the platform's narrow encoding).
    #[error("argument {index} cannot be passed to the hosting library")]
    InvalidArgument { index: usize },

    /// The hosting library could not be opened.
    #[error("could not load hosting library from {path}: {detail}")]
    Load {
        path: String,
        /// Loader diagnostic captured right after the failure.
        detail: String,
    },

    /// A required entry point is not exported by the hosting library.
    #[error("could not load symbol '{symbol}': {detail}")]
    MissingSymbol { symbol: String, detail: String },

    /// `monovm_initialize` reported failure.
    #[error("monovm_initialize failed with code {code}")]
    Initialize { code: i32 },

    /// `mono_jit_init` returned a null domain.
    #[error("mono_jit_init returned no domain for {program}")]
    NoDomain { program: String },

    /// `mono_domain_assembly_open` returned a null assembly.
    #[error("could not open assembly {program}")]
    AssemblyOpen { program: String },
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, HostError>;
