// ── C-side argument and property vectors ──────────────────────────────────────
//
// Owned buffers that present Rust strings in the layouts the hosting ABI
// expects.  Buffers live as long as the vector value; the raw pointers handed
// out are only valid while it is alive and not moved-from.

use std::ffi::{c_char, c_int, CStr, CString};

// ── ArgVector ─────────────────────────────────────────────────────────────────

/// `argc` / `argv` pair with a trailing null entry, as C `main` receives it.
///
/// Each argument is stored in its own heap buffer, so the runtime may write
/// through `argv[i]` (some runtimes rewrite options in place).
pub(crate) struct ArgVector {
    /// Backing storage; each buffer ends with its NUL byte.
    buffers: Vec<Vec<u8>>,
    pointers: Vec<*mut c_char>,
}

impl ArgVector {
    pub(crate) fn new(args: Vec<CString>) -> Self {
        let mut buffers: Vec<Vec<u8>> = args.into_iter().map(CString::into_bytes_with_nul).collect();
        // Pointers into each inner buffer stay valid when `buffers` itself
        // moves: only the outer Vec's allocation is relocated.
        let mut pointers: Vec<*mut c_char> = buffers
            .iter_mut()
            .map(|buf| buf.as_mut_ptr().cast::<c_char>())
            .collect();
        pointers.push(std::ptr::null_mut());
        Self { buffers, pointers }
    }

    /// Number of arguments, excluding the trailing null.
    pub(crate) fn argc(&self) -> c_int {
        // Process argument counts are far below i32::MAX.
        c_int::try_from(self.buffers.len()).unwrap_or(c_int::MAX)
    }

    pub(crate) fn argv(&mut self) -> *mut *mut c_char {
        self.pointers.as_mut_ptr()
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

/// Ordered runtime configuration properties for `monovm_initialize`.
#[derive(Debug, Default)]
pub(crate) struct Properties {
    entries: Vec<(CString, CString)>,
}

impl Properties {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: &CStr, value: CString) {
        self.entries.push((key.to_owned(), value));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&CStr, &CStr)> {
        self.entries.iter().map(|(k, v)| (k.as_c_str(), v.as_c_str()))
    }

    /// Parallel key / value pointer arrays.  Valid while `self` is borrowed.
    pub(crate) fn raw(&self) -> (Vec<*const c_char>, Vec<*const c_char>) {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_ptr(), v.as_ptr()))
            .unzip()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
