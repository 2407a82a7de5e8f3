// ── Mono hosting ABI ──────────────────────────────────────────────────────────
//
// C signatures and export names of the hosting entry points mdh looks up.
// Only the subset mdh calls is listed.  Add new entries here before they are
// resolved anywhere else.

use std::ffi::{c_char, c_int, CStr};

// ── Opaque runtime types ──────────────────────────────────────────────────────

/// `MonoDomain`: a runtime context.  Never dereferenced on this side.
#[repr(C)]
pub(crate) struct MonoDomain {
    _opaque: [u8; 0],
}

/// `MonoAssembly`: a loaded managed image.  Never dereferenced on this side.
#[repr(C)]
pub(crate) struct MonoAssembly {
    _opaque: [u8; 0],
}

/// `MonoDebugFormat` (a C enum, passed as `int`).
///
/// Values: `NONE = 0`, `MONO = 1`, `DEBUGGER = 2` (deprecated).
pub(crate) type MonoDebugFormat = c_int;

/// Portable PDB / mdb symbol format understood by the soft debugger.
pub(crate) const MONO_DEBUG_FORMAT_MONO: MonoDebugFormat = 1;

// ── Entry point signatures ────────────────────────────────────────────────────

/// All-in-one entry: behaves like the `mono` executable's `main`.
pub(crate) type MonoMainFn = unsafe extern "C" fn(argc: c_int, argv: *mut *mut c_char) -> c_int;

/// dotnet/runtime MonoVM initializer taking parallel key / value arrays.
pub(crate) type MonoVmInitializeFn = unsafe extern "C" fn(
    property_count: c_int,
    property_keys: *const *const c_char,
    property_values: *const *const c_char,
) -> c_int;

pub(crate) type MonoJitInitFn = unsafe extern "C" fn(file: *const c_char) -> *mut MonoDomain;

pub(crate) type MonoDomainAssemblyOpenFn =
    unsafe extern "C" fn(domain: *mut MonoDomain, name: *const c_char) -> *mut MonoAssembly;

pub(crate) type MonoAssemblySetRootDirFn = unsafe extern "C" fn(root_dir: *const c_char);

pub(crate) type MonoDebugInitFn = unsafe extern "C" fn(format: MonoDebugFormat);

pub(crate) type MonoDebugDomainCreateFn = unsafe extern "C" fn(domain: *mut MonoDomain);

pub(crate) type MonoJitExecFn = unsafe extern "C" fn(
    domain: *mut MonoDomain,
    assembly: *mut MonoAssembly,
    argc: c_int,
    argv: *mut *mut c_char,
) -> c_int;

pub(crate) type MonoEnvironmentExitcodeGetFn = unsafe extern "C" fn() -> c_int;

pub(crate) type MonoJitCleanupFn = unsafe extern "C" fn(domain: *mut MonoDomain);

// ── Export names ──────────────────────────────────────────────────────────────

pub(crate) const MONO_MAIN: &CStr = c"mono_main";
pub(crate) const MONOVM_INITIALIZE: &CStr = c"monovm_initialize";
pub(crate) const MONO_JIT_INIT: &CStr = c"mono_jit_init";
pub(crate) const MONO_DOMAIN_ASSEMBLY_OPEN: &CStr = c"mono_domain_assembly_open";
pub(crate) const MONO_ASSEMBLY_SETROOTDIR: &CStr = c"mono_assembly_setrootdir";
pub(crate) const MONO_DEBUG_INIT: &CStr = c"mono_debug_init";
pub(crate) const MONO_DEBUG_DOMAIN_CREATE: &CStr = c"mono_debug_domain_create";
pub(crate) const MONO_JIT_EXEC: &CStr = c"mono_jit_exec";
pub(crate) const MONO_ENVIRONMENT_EXITCODE_GET: &CStr = c"mono_environment_exitcode_get";
pub(crate) const MONO_JIT_CLEANUP: &CStr = c"mono_jit_cleanup";

// ── Property names ────────────────────────────────────────────────────────────

/// `monovm_initialize` property holding the trusted platform assembly list.
pub(crate) const TRUSTED_PLATFORM_ASSEMBLIES: &CStr = c"TRUSTED_PLATFORM_ASSEMBLIES";
