// ── POSIX platform implementation ─────────────────────────────────────────────
//
// Linux, macOS and the BSDs.  Dynamic loading goes through `libloading`'s unix
// layer so the `dlopen` flags stay under our control; path and environment
// queries are plain std on raw `OsStr` bytes.
//
// `unsafe` is permitted in this sub-tree only.  Every `unsafe` block MUST
// carry a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::{
    cell::RefCell,
    ffi::{c_void, CStr, CString, OsStr, OsString},
    os::unix::ffi::OsStrExt,
    ptr::NonNull,
};

use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_LAZY};

use super::{dirname_len, Platform};

/// `dlopen`-based platform.
///
/// `libloading` reads `dlerror()` itself and hands the text back inside its
/// error, so the text of the last failure is kept here until `last_error`
/// consumes it.
#[derive(Debug, Default)]
pub(crate) struct PosixPlatform {
    last_error: RefCell<Option<String>>,
}

impl PosixPlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn record(&self, error: &libloading::Error) {
        *self.last_error.borrow_mut() = Some(error.to_string());
    }
}

impl Platform for PosixPlatform {
    type Library = Library;

    fn init(&self) {
        self.last_error.borrow_mut().take();
    }

    fn load_library(&self, path: &CStr) -> Option<Library> {
        let path = OsStr::from_bytes(path.to_bytes());
        // SAFETY: loading runs the library's initializers; the caller chose to
        // trust this image.  RTLD_GLOBAL lets the runtime's own dependencies
        // (profilers, native components) see its exports.
        match unsafe { Library::open(Some(path), RTLD_LAZY | RTLD_GLOBAL) } {
            Ok(library) => Some(library),
            Err(e) => {
                self.record(&e);
                None
            }
        }
    }

    fn get_symbol(&self, library: &Library, name: &CStr) -> Option<NonNull<c_void>> {
        // SAFETY: the symbol is read as an untyped address and never called
        // here.  Callers give it a type before use.
        match unsafe { library.get::<*mut c_void>(name.to_bytes_with_nul()) } {
            Ok(symbol) => NonNull::new(*symbol),
            Err(e) => {
                self.record(&e);
                None
            }
        }
    }

    fn dup_env(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }

    fn dirname(&self, path: &OsStr) -> OsString {
        dirname(path)
    }

    fn file_exists(&self, path: &OsStr) -> bool {
        // metadata() follows symlinks, like stat(2).
        std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn last_error(&self) -> String {
        self.last_error
            .borrow_mut()
            .take()
            .unwrap_or_else(|| "no loader error recorded".to_owned())
    }

    fn to_native_string(&self, arg: &OsStr) -> Option<CString> {
        CString::new(arg.as_bytes()).ok()
    }
}

/// `/`-separated directory prefix of `path`; `./` when there is none.
pub(crate) fn dirname(path: &OsStr) -> OsString {
    let bytes = path.as_bytes();
    match dirname_len(bytes, |b| b == b'/') {
        Some(len) => OsStr::from_bytes(&bytes[..len]).to_owned(),
        None => OsString::from("./"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
