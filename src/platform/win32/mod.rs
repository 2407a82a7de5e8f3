// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is one of exactly two sub-trees in the codebase where `unsafe` code is
// permitted for OS FFI (the other is `platform::posix`).  Every `unsafe` block
// MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// The ANSI loader entry points are used on purpose: the hosting ABI takes
// narrow `char*` paths, so library and program paths cross it in the same
// encoding.  `to_native_string` converts to the active ANSI code page and
// refuses arguments that code page cannot represent.

#![allow(unsafe_code)]

mod library;

use std::{
    cell::Cell,
    ffi::{c_void, CStr, CString, OsStr, OsString},
    os::windows::ffi::{OsStrExt, OsStringExt},
    ptr::NonNull,
};

use windows::{
    core::{HRESULT, PCSTR, PCWSTR},
    Win32::{
        Foundation::{GetLastError, SetLastError, BOOL, WIN32_ERROR},
        Globalization::{GetACP, WideCharToMultiByte, CP_ACP, CP_UTF8, WC_NO_BEST_FIT_CHARS},
        Storage::FileSystem::{GetFileAttributesW, FILE_ATTRIBUTE_DIRECTORY, INVALID_FILE_ATTRIBUTES},
    },
};

pub(crate) use library::Win32Library;

use super::{dirname_len, Platform};

/// `LoadLibraryA`-based platform.
///
/// `GetLastError()` is thread-local state that any later API call may
/// overwrite, so the code is captured into `last_error` at the point of
/// failure and formatted on demand.
#[derive(Debug, Default)]
pub(crate) struct Win32Platform {
    last_error: Cell<HRESULT>,
}

impl Win32Platform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `GetLastError()` for a later `last_error()`.
    ///
    /// Call immediately after the Win32 function that signalled failure.
    fn capture_last_error(&self) {
        // SAFETY: GetLastError reads thread-local state set by the last Win32
        // call.  It is always safe to call and never fails.
        let code = unsafe { GetLastError() };
        self.last_error.set(HRESULT::from_win32(code.0));
    }
}

impl Platform for Win32Platform {
    type Library = Win32Library;

    fn init(&self) {
        // SAFETY: SetLastError only writes thread-local state.
        unsafe { SetLastError(WIN32_ERROR(0)) };
        self.last_error.set(HRESULT(0));
    }

    fn load_library(&self, path: &CStr) -> Option<Win32Library> {
        match Win32Library::open(path) {
            Ok(lib) => Some(lib),
            Err(e) => {
                self.last_error.set(e.code());
                None
            }
        }
    }

    fn get_symbol(&self, library: &Win32Library, name: &CStr) -> Option<NonNull<c_void>> {
        let sym = library.symbol(name);
        if sym.is_none() {
            self.capture_last_error();
        }
        sym
    }

    fn dup_env(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }

    fn dirname(&self, path: &OsStr) -> OsString {
        dirname(path)
    }

    fn file_exists(&self, path: &OsStr) -> bool {
        let wide: Vec<u16> = path.encode_wide().chain(std::iter::once(0)).collect();
        // SAFETY: wide is a valid null-terminated UTF-16 string that outlives
        // the call.
        let attr = unsafe { GetFileAttributesW(PCWSTR(wide.as_ptr())) };
        attr != INVALID_FILE_ATTRIBUTES && attr & FILE_ATTRIBUTE_DIRECTORY.0 == 0
    }

    fn last_error(&self) -> String {
        let code = self.last_error.get();
        let message = code.message();
        let message = message.trim_end();
        if message.is_empty() {
            format!("error {:#010x}", code.0 as u32)
        } else {
            message.to_owned()
        }
    }

    fn to_native_string(&self, arg: &OsStr) -> Option<CString> {
        // SAFETY: GetACP only reads process state.
        if unsafe { GetACP() } == CP_UTF8 {
            return CString::new(arg.to_str()?).ok();
        }
        let wide: Vec<u16> = arg.encode_wide().collect();
        if wide.is_empty() {
            return Some(CString::default());
        }
        let narrow = to_ansi(&wide)?;
        CString::new(narrow).ok()
    }
}

/// Convert UTF-16 to the ANSI code page.  `None` when any character has no
/// exact mapping; best-fit substitutes would name a different file.
fn to_ansi(wide: &[u16]) -> Option<Vec<u8>> {
    let mut used_default = BOOL(0);
    // SAFETY: sizing call.  wide is a live slice and used_default outlives the
    // call.
    let len = unsafe {
        WideCharToMultiByte(
            CP_ACP,
            WC_NO_BEST_FIT_CHARS,
            wide,
            None,
            PCSTR::null(),
            Some(&mut used_default as *mut BOOL),
        )
    };
    if len <= 0 || used_default.as_bool() {
        return None;
    }

    let mut narrow = vec![0u8; usize::try_from(len).ok()?];
    // SAFETY: narrow has exactly the size the sizing call reported.
    let written = unsafe {
        WideCharToMultiByte(
            CP_ACP,
            WC_NO_BEST_FIT_CHARS,
            wide,
            Some(&mut narrow),
            PCSTR::null(),
            Some(&mut used_default as *mut BOOL),
        )
    };
    if written <= 0 || used_default.as_bool() {
        return None;
    }
    narrow.truncate(usize::try_from(written).ok()?);
    Some(narrow)
}

/// Directory prefix of `path`, split on `/` or `\`; `.\` when there is none.
pub(crate) fn dirname(path: &OsStr) -> OsString {
    let wide: Vec<u16> = path.encode_wide().collect();
    let is_separator = |u: u16| u == u16::from(b'/') || u == u16::from(b'\\');
    match dirname_len(&wide, is_separator) {
        Some(len) => OsString::from_wide(&wide[..len]),
        // `C:x.dll` is relative to the current directory of drive C:.
        None if is_drive_prefix(&wide) => OsString::from_wide(&wide[..2]),
        None => OsString::from(r".\"),
    }
}

fn is_drive_prefix(wide: &[u16]) -> bool {
    wide.len() >= 2
        && wide[1] == u16::from(b':')
        && u8::try_from(wide[0]).is_ok_and(|b| b.is_ascii_alphabetic())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
