// ── Stub hosting library ──────────────────────────────────────────────────────
//
// `extern "C"` functions with the hosting ABI signatures that record each call
// in a thread-local log.  Tests export them through `FakePlatform` and then
// assert on `take_calls()`.  The test harness runs each test on its own
// thread, so logs never mix.

use std::{
    cell::{Cell, RefCell},
    ffi::{c_char, c_int, c_void, CStr},
    ptr::NonNull,
};

use super::abi::{
    self, MonoAssembly, MonoAssemblySetRootDirFn, MonoDebugDomainCreateFn, MonoDebugFormat,
    MonoDebugInitFn, MonoDomain, MonoDomainAssemblyOpenFn, MonoEnvironmentExitcodeGetFn,
    MonoJitCleanupFn, MonoJitExecFn, MonoJitInitFn, MonoMainFn, MonoVmInitializeFn,
};
use crate::platform::fake::FakePlatform;

/// What `mono_main` returns.
pub(crate) const MAIN_RESULT: c_int = 42;
/// What `mono_jit_exec` returns.
pub(crate) const EXEC_RESULT: c_int = 3;
/// What `mono_environment_exitcode_get` returns.
pub(crate) const EXIT_CODE: c_int = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Main(Vec<String>),
    Initialize(Vec<(String, String)>),
    SetRootDir(String),
    JitInit(String),
    DebugInit(MonoDebugFormat),
    DebugDomainCreate,
    AssemblyOpen(String),
    Exec(Vec<String>),
    ExitCodeGet,
    Cleanup,
}

thread_local! {
    static CALLS: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
    static INITIALIZE_RESULT: Cell<c_int> = const { Cell::new(0) };
}

fn record(call: Call) {
    CALLS.with(|calls| calls.borrow_mut().push(call));
}

/// Drain the calls recorded on this thread.
pub(crate) fn take_calls() -> Vec<Call> {
    CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
}

/// Make `monovm_initialize` return `code` on this thread.
pub(crate) fn set_initialize_result(code: c_int) {
    INITIALIZE_RESULT.with(|r| r.set(code));
}

/// # Safety
/// `ptr` must point at a NUL-terminated string.
unsafe fn string(ptr: *const c_char) -> String {
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// # Safety
/// `argv` must hold `argc` C strings followed by a null entry.
unsafe fn collect_args(argc: c_int, argv: *mut *mut c_char) -> Vec<String> {
    let count = usize::try_from(argc).unwrap_or(0);
    let mut out: Vec<String> = (0..count).map(|i| string(*argv.add(i))).collect();
    if !(*argv.add(count)).is_null() {
        out.push("<argv not null-terminated>".to_owned());
    }
    out
}

// ── Stub entry points ─────────────────────────────────────────────────────────

unsafe extern "C" fn mono_main(argc: c_int, argv: *mut *mut c_char) -> c_int {
    record(Call::Main(collect_args(argc, argv)));
    MAIN_RESULT
}

unsafe extern "C" fn monovm_initialize(
    count: c_int,
    keys: *const *const c_char,
    values: *const *const c_char,
) -> c_int {
    let count = usize::try_from(count).unwrap_or(0);
    let props = (0..count)
        .map(|i| (string(*keys.add(i)), string(*values.add(i))))
        .collect();
    record(Call::Initialize(props));
    INITIALIZE_RESULT.with(Cell::get)
}

unsafe extern "C" fn mono_jit_init(file: *const c_char) -> *mut MonoDomain {
    record(Call::JitInit(string(file)));
    NonNull::<MonoDomain>::dangling().as_ptr()
}

unsafe extern "C" fn mono_jit_init_failing(file: *const c_char) -> *mut MonoDomain {
    record(Call::JitInit(string(file)));
    std::ptr::null_mut()
}

unsafe extern "C" fn mono_domain_assembly_open(
    _domain: *mut MonoDomain,
    name: *const c_char,
) -> *mut MonoAssembly {
    record(Call::AssemblyOpen(string(name)));
    NonNull::<MonoAssembly>::dangling().as_ptr()
}

unsafe extern "C" fn mono_domain_assembly_open_failing(
    _domain: *mut MonoDomain,
    name: *const c_char,
) -> *mut MonoAssembly {
    record(Call::AssemblyOpen(string(name)));
    std::ptr::null_mut()
}

unsafe extern "C" fn mono_assembly_setrootdir(root_dir: *const c_char) {
    record(Call::SetRootDir(string(root_dir)));
}

unsafe extern "C" fn mono_debug_init(format: MonoDebugFormat) {
    record(Call::DebugInit(format));
}

unsafe extern "C" fn mono_debug_domain_create(_domain: *mut MonoDomain) {
    record(Call::DebugDomainCreate);
}

unsafe extern "C" fn mono_jit_exec(
    _domain: *mut MonoDomain,
    _assembly: *mut MonoAssembly,
    argc: c_int,
    argv: *mut *mut c_char,
) -> c_int {
    record(Call::Exec(collect_args(argc, argv)));
    EXEC_RESULT
}

unsafe extern "C" fn mono_environment_exitcode_get() -> c_int {
    record(Call::ExitCodeGet);
    EXIT_CODE
}

unsafe extern "C" fn mono_jit_cleanup(_domain: *mut MonoDomain) {
    record(Call::Cleanup);
}

// ── Export helpers ────────────────────────────────────────────────────────────

fn name(sym: &CStr) -> &str {
    sym.to_str().unwrap_or_default()
}

/// Extension methods that export stub groups from a `FakePlatform`.
pub(crate) trait ExportStubs: Sized {
    fn export(self, sym: &CStr, ptr: *mut c_void) -> Self;

    fn with_mono_main(self) -> Self {
        self.export(abi::MONO_MAIN, mono_main as MonoMainFn as *mut c_void)
    }

    fn with_monovm_initialize(self) -> Self {
        self.export(abi::MONOVM_INITIALIZE, monovm_initialize as MonoVmInitializeFn as *mut c_void)
    }

    /// `mono_jit_init`, `mono_domain_assembly_open` and `mono_jit_exec`.
    fn with_embedding_required(self) -> Self {
        self.export(abi::MONO_JIT_INIT, mono_jit_init as MonoJitInitFn as *mut c_void)
            .export(
                abi::MONO_DOMAIN_ASSEMBLY_OPEN,
                mono_domain_assembly_open as MonoDomainAssemblyOpenFn as *mut c_void,
            )
            .export(abi::MONO_JIT_EXEC, mono_jit_exec as MonoJitExecFn as *mut c_void)
    }

    fn with_failing_jit_init(self) -> Self {
        self.export(abi::MONO_JIT_INIT, mono_jit_init_failing as MonoJitInitFn as *mut c_void)
    }

    fn with_failing_assembly_open(self) -> Self {
        self.export(
            abi::MONO_DOMAIN_ASSEMBLY_OPEN,
            mono_domain_assembly_open_failing as MonoDomainAssemblyOpenFn as *mut c_void,
        )
    }

    fn with_set_root_dir(self) -> Self {
        self.export(
            abi::MONO_ASSEMBLY_SETROOTDIR,
            mono_assembly_setrootdir as MonoAssemblySetRootDirFn as *mut c_void,
        )
    }

    fn with_debug_init(self) -> Self {
        self.export(abi::MONO_DEBUG_INIT, mono_debug_init as MonoDebugInitFn as *mut c_void)
    }

    fn with_debug_domain_create(self) -> Self {
        self.export(
            abi::MONO_DEBUG_DOMAIN_CREATE,
            mono_debug_domain_create as MonoDebugDomainCreateFn as *mut c_void,
        )
    }

    fn with_exit_code_get(self) -> Self {
        self.export(
            abi::MONO_ENVIRONMENT_EXITCODE_GET,
            mono_environment_exitcode_get as MonoEnvironmentExitcodeGetFn as *mut c_void,
        )
    }

    fn with_cleanup(self) -> Self {
        self.export(abi::MONO_JIT_CLEANUP, mono_jit_cleanup as MonoJitCleanupFn as *mut c_void)
    }
}

impl ExportStubs for FakePlatform {
    fn export(self, sym: &CStr, ptr: *mut c_void) -> Self {
        self.with_symbol(name(sym), ptr)
    }
}
