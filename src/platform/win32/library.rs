// ── Module handle ─────────────────────────────────────────────────────────────
//
// `Win32Library` owns the single `LoadLibraryA` call for the hosting DLL.
// `FreeLibrary` runs on `Drop`; the launcher leaks the handle once the
// runtime has been entered, so in practice `Drop` only runs on early exits.

#![allow(unsafe_code)]

use std::{
    ffi::{c_void, CStr},
    ptr::NonNull,
};

use windows::{
    core::PCSTR,
    Win32::{
        Foundation::HMODULE,
        System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryA},
    },
};

/// RAII handle to a DLL loaded with `LoadLibraryA`.
#[derive(Debug)]
pub(crate) struct Win32Library(HMODULE);

impl Win32Library {
    /// Load `path` with the default DLL search order.
    ///
    /// The error carries the loader's code as an HRESULT.
    pub(crate) fn open(path: &CStr) -> windows::core::Result<Self> {
        // SAFETY: path is a valid null-terminated ANSI string that outlives
        // the call.  DllMain runs here; the caller chose to trust this image.
        let module = unsafe { LoadLibraryA(PCSTR(path.as_ptr().cast())) }?;
        Ok(Self(module))
    }

    /// `GetProcAddress` lookup.  `None` when the export is absent.
    pub(crate) fn symbol(&self, name: &CStr) -> Option<NonNull<c_void>> {
        // SAFETY: self.0 is a live module handle; name is a null-terminated
        // export name.  The returned FARPROC is only converted to a pointer
        // here, never called.
        let proc = unsafe { GetProcAddress(self.0, PCSTR(name.as_ptr().cast())) }?;
        NonNull::new(proc as *mut c_void)
    }
}

impl Drop for Win32Library {
    fn drop(&mut self) {
        // SAFETY: self.0 was returned by a successful LoadLibraryA and has not
        // been freed since.  No resolved entry point is called afterwards.
        unsafe {
            let _ = FreeLibrary(self.0);
        }
    }
}
