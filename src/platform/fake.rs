// ── In-memory platform for tests ──────────────────────────────────────────────
//
// Environment, filesystem and exported symbols are plain maps, so launcher
// tests can describe a hosting library without building one.  Every
// `file_exists` query and every `report_error` message is logged so tests can
// assert probing order and diagnostics.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    ffi::{c_void, CStr, CString, OsStr, OsString},
    fmt,
    ptr::NonNull,
};

use super::{native_dirname, Platform};

/// Handle returned by `FakePlatform::load_library`.
#[derive(Debug)]
pub(crate) struct FakeLibrary;

#[derive(Debug, Default)]
pub(crate) struct FakePlatform {
    /// When `false`, every `load_library` fails.
    pub(crate) loadable: bool,
    pub(crate) env: HashMap<String, OsString>,
    pub(crate) files: HashSet<OsString>,
    pub(crate) symbols: HashMap<String, NonNull<c_void>>,
    /// Paths passed to `file_exists`, in call order.
    pub(crate) probed: RefCell<Vec<OsString>>,
    /// Paths passed to `load_library`, in call order.
    pub(crate) loaded: RefCell<Vec<String>>,
    /// `report_error` output, without the `mdh: ` prefix.
    pub(crate) reported: RefCell<Vec<String>>,
    last_error: RefCell<Option<String>>,
}

impl FakePlatform {
    /// A platform on which any library path loads and exports nothing.
    pub(crate) fn new() -> Self {
        Self {
            loadable: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_env(mut self, name: &str, value: impl AsRef<OsStr>) -> Self {
        self.env.insert(name.to_owned(), value.as_ref().to_owned());
        self
    }

    pub(crate) fn with_file(mut self, path: impl AsRef<OsStr>) -> Self {
        self.files.insert(path.as_ref().to_owned());
        self
    }

    /// Make every `load_library` call fail.
    pub(crate) fn failing_loads(mut self) -> Self {
        self.loadable = false;
        self
    }

    pub(crate) fn without_symbol(mut self, name: &str) -> Self {
        self.symbols.remove(name);
        self
    }

    /// Export `ptr` under `name`.
    pub(crate) fn with_symbol(mut self, name: &str, ptr: *mut c_void) -> Self {
        if let Some(ptr) = NonNull::new(ptr) {
            self.symbols.insert(name.to_owned(), ptr);
        }
        self
    }
}

impl Platform for FakePlatform {
    type Library = FakeLibrary;

    fn init(&self) {
        self.last_error.borrow_mut().take();
    }

    fn load_library(&self, path: &CStr) -> Option<FakeLibrary> {
        let path = path.to_string_lossy().into_owned();
        self.loaded.borrow_mut().push(path.clone());
        if self.loadable {
            Some(FakeLibrary)
        } else {
            *self.last_error.borrow_mut() =
                Some(format!("{path}: cannot open shared object file"));
            None
        }
    }

    fn get_symbol(&self, _library: &FakeLibrary, name: &CStr) -> Option<NonNull<c_void>> {
        let name = name.to_string_lossy();
        let sym = self.symbols.get(name.as_ref()).copied();
        if sym.is_none() {
            *self.last_error.borrow_mut() = Some(format!("undefined symbol: {name}"));
        }
        sym
    }

    fn dup_env(&self, name: &str) -> Option<OsString> {
        self.env.get(name).cloned()
    }

    fn dirname(&self, path: &OsStr) -> OsString {
        native_dirname(path)
    }

    fn file_exists(&self, path: &OsStr) -> bool {
        self.probed.borrow_mut().push(path.to_owned());
        self.files.contains(path)
    }

    fn last_error(&self) -> String {
        self.last_error
            .borrow_mut()
            .take()
            .unwrap_or_else(|| "no loader error recorded".to_owned())
    }

    fn to_native_string(&self, arg: &OsStr) -> Option<CString> {
        CString::new(arg.as_encoded_bytes()).ok()
    }

    fn report_error(&self, message: fmt::Arguments<'_>) {
        let detail = self.last_error();
        self.reported.borrow_mut().push(format!("{message}: {detail}"));
    }
}
