// ── Hosting API capability records ────────────────────────────────────────────
//
// Resolves the Mono hosting entry points from a loaded library and exposes
// them behind safe call wrappers.  This is the only module outside
// `platform::*` where `unsafe` is permitted: it holds the transmutes from
// symbol addresses to typed function pointers and the calls through them.
// Every `unsafe` block MUST carry a `// SAFETY:` comment.
//
// ── Trust model ───────────────────────────────────────────────────────────────
//
// The hosting library is named by the user on the command line and its
// initializers have already run by the time anything here executes.  Its
// exports are taken to honour the signatures in `abi`; the wrappers are safe
// on that assumption and uphold the rest (valid, NUL-terminated strings and
// argv arrays that outlive each call, non-null handles passed back).

#![allow(unsafe_code)]

pub(crate) mod abi;
pub(crate) mod marshal;

#[cfg(test)]
pub(crate) mod stubs;

use std::{
    ffi::{c_int, c_void, CStr},
    ptr::NonNull,
};

use abi::{
    MonoAssembly, MonoAssemblySetRootDirFn, MonoDebugDomainCreateFn, MonoDebugInitFn, MonoDomain,
    MonoDomainAssemblyOpenFn, MonoEnvironmentExitcodeGetFn, MonoJitCleanupFn, MonoJitExecFn,
    MonoJitInitFn, MonoMainFn, MonoVmInitializeFn, MONO_DEBUG_FORMAT_MONO,
};
use marshal::{ArgVector, Properties};

use crate::{
    error::{HostError, Result},
    platform::Platform,
};

/// Look `$name` up and reinterpret it as the function pointer type `$ty`.
macro_rules! resolve {
    ($platform:expr, $library:expr, $name:expr => $ty:ty) => {
        $platform.get_symbol($library, $name).map(|sym| {
            // SAFETY: per the hosting ABI the export `$name` is a function
            // with signature `$ty`.  Code and data pointers have the same
            // size on every target `build.rs` admits.
            unsafe { std::mem::transmute::<*mut c_void, $ty>(sym.as_ptr()) }
        })
    };
}

/// Turn a missing required symbol into a linkage error.
///
/// Must run directly after the failed lookup so `last_error` still describes
/// it.
fn require<P: Platform, T>(platform: &P, found: Option<T>, name: &CStr) -> Result<T> {
    found.ok_or_else(|| HostError::MissingSymbol {
        symbol: name.to_string_lossy().into_owned(),
        detail: platform.last_error(),
    })
}

// ── Runtime handles ───────────────────────────────────────────────────────────

/// A runtime context returned by `mono_jit_init`.  Owned by the runtime.
#[derive(Debug)]
pub(crate) struct Domain(NonNull<MonoDomain>);

/// A managed image returned by `mono_domain_assembly_open`.  Owned by the
/// runtime.
#[derive(Debug)]
pub(crate) struct Assembly(NonNull<MonoAssembly>);

// ── EntryPoints ───────────────────────────────────────────────────────────────

/// The two optional entry points of newer runtimes.
///
/// `monovm_initialize` (dotnet/runtime) must run before anything else touches
/// the runtime; `mono_main` then does everything the legacy sequence does.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct EntryPoints {
    initialize: Option<MonoVmInitializeFn>,
    main: Option<MonoMainFn>,
}

impl EntryPoints {
    pub(crate) fn probe<P: Platform>(platform: &P, library: &P::Library) -> Self {
        Self {
            initialize: resolve!(platform, library, abi::MONOVM_INITIALIZE => MonoVmInitializeFn),
            main: resolve!(platform, library, abi::MONO_MAIN => MonoMainFn),
        }
    }

    pub(crate) fn has_initialize(&self) -> bool {
        self.initialize.is_some()
    }

    pub(crate) fn has_main(&self) -> bool {
        self.main.is_some()
    }

    /// `monovm_initialize(n, keys, values)`.  `None` if not exported.
    pub(crate) fn initialize(&self, properties: &Properties) -> Option<c_int> {
        let initialize = self.initialize?;
        let (keys, values) = properties.raw();
        let count = c_int::try_from(properties.len()).unwrap_or(c_int::MAX);
        // SAFETY: keys and values each hold `count` pointers to NUL-terminated
        // strings owned by `properties`, which outlives the call.  The runtime
        // copies what it keeps.
        Some(unsafe { initialize(count, keys.as_ptr(), values.as_ptr()) })
    }

    /// `mono_main(argc, argv)`.  `None` if not exported.
    pub(crate) fn main(&self, args: &mut ArgVector) -> Option<c_int> {
        let main = self.main?;
        // SAFETY: argv is a null-terminated array of `argc` writable C strings
        // owned by `args`, which outlives the call.
        Some(unsafe { main(args.argc(), args.argv()) })
    }
}

// ── Embedding ─────────────────────────────────────────────────────────────────

/// The classic embedding API: `mono_jit_init` → `mono_domain_assembly_open`
/// → `mono_jit_exec` → `mono_jit_cleanup`, plus optional helpers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Embedding {
    jit_init: MonoJitInitFn,
    assembly_open: MonoDomainAssemblyOpenFn,
    exec: MonoJitExecFn,
    debug_init: Option<MonoDebugInitFn>,
    debug_domain_create: Option<MonoDebugDomainCreateFn>,
    exit_code_get: Option<MonoEnvironmentExitcodeGetFn>,
    cleanup: Option<MonoJitCleanupFn>,
    set_root_dir: Option<MonoAssemblySetRootDirFn>,
}

impl Embedding {
    /// Resolve the embedding API.  Fails on the first missing required
    /// symbol.
    pub(crate) fn resolve<P: Platform>(platform: &P, library: &P::Library) -> Result<Self> {
        let jit_init = require(
            platform,
            resolve!(platform, library, abi::MONO_JIT_INIT => MonoJitInitFn),
            abi::MONO_JIT_INIT,
        )?;
        let assembly_open = require(
            platform,
            resolve!(platform, library, abi::MONO_DOMAIN_ASSEMBLY_OPEN => MonoDomainAssemblyOpenFn),
            abi::MONO_DOMAIN_ASSEMBLY_OPEN,
        )?;
        let exec = require(
            platform,
            resolve!(platform, library, abi::MONO_JIT_EXEC => MonoJitExecFn),
            abi::MONO_JIT_EXEC,
        )?;

        Ok(Self {
            jit_init,
            assembly_open,
            exec,
            debug_init: resolve!(platform, library, abi::MONO_DEBUG_INIT => MonoDebugInitFn),
            debug_domain_create: resolve!(
                platform, library, abi::MONO_DEBUG_DOMAIN_CREATE => MonoDebugDomainCreateFn
            ),
            exit_code_get: resolve!(
                platform, library, abi::MONO_ENVIRONMENT_EXITCODE_GET => MonoEnvironmentExitcodeGetFn
            ),
            cleanup: resolve!(platform, library, abi::MONO_JIT_CLEANUP => MonoJitCleanupFn),
            // Resolved last: if it is missing, the pending loader error is the
            // one a later "setter missing" diagnostic reports.
            set_root_dir: resolve!(
                platform, library, abi::MONO_ASSEMBLY_SETROOTDIR => MonoAssemblySetRootDirFn
            ),
        })
    }

    pub(crate) fn has_debugger(&self) -> bool {
        self.debug_init.is_some() && self.debug_domain_create.is_some()
    }

    pub(crate) fn has_exit_code(&self) -> bool {
        self.exit_code_get.is_some()
    }

    pub(crate) fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// `mono_assembly_setrootdir(dir)`.  `false` if not exported.
    pub(crate) fn set_root_dir(&self, dir: &CStr) -> bool {
        let Some(set_root_dir) = self.set_root_dir else {
            return false;
        };
        // SAFETY: dir is NUL-terminated and outlives the call; the runtime
        // copies it.
        unsafe { set_root_dir(dir.as_ptr()) };
        true
    }

    /// `mono_jit_init(file)`.  `None` if the runtime returned null.
    pub(crate) fn jit_init(&self, file: &CStr) -> Option<Domain> {
        // SAFETY: file is NUL-terminated and outlives the call.
        let domain = unsafe { (self.jit_init)(file.as_ptr()) };
        NonNull::new(domain).map(Domain)
    }

    /// `mono_debug_init(MONO_DEBUG_FORMAT_MONO)` then
    /// `mono_debug_domain_create(domain)`.
    ///
    /// Does nothing and returns `false` unless both are exported.
    pub(crate) fn attach_debugger(&self, domain: &Domain) -> bool {
        let (Some(debug_init), Some(debug_domain_create)) = (self.debug_init, self.debug_domain_create)
        else {
            return false;
        };
        // SAFETY: domain is the non-null handle mono_jit_init returned and
        // has not been cleaned up.
        unsafe {
            debug_init(MONO_DEBUG_FORMAT_MONO);
            debug_domain_create(domain.0.as_ptr());
        }
        true
    }

    /// `mono_domain_assembly_open(domain, name)`.  `None` if the runtime
    /// returned null.
    pub(crate) fn open_assembly(&self, domain: &Domain, name: &CStr) -> Option<Assembly> {
        // SAFETY: domain is live; name is NUL-terminated and outlives the
        // call.
        let assembly = unsafe { (self.assembly_open)(domain.0.as_ptr(), name.as_ptr()) };
        NonNull::new(assembly).map(Assembly)
    }

    /// `mono_jit_exec(domain, assembly, argc, argv)`.
    pub(crate) fn exec(&self, domain: &Domain, assembly: &Assembly, args: &mut ArgVector) -> c_int {
        // SAFETY: both handles came from this runtime and are live; argv is a
        // null-terminated array of `argc` writable C strings owned by `args`.
        unsafe { (self.exec)(domain.0.as_ptr(), assembly.0.as_ptr(), args.argc(), args.argv()) }
    }

    /// `mono_environment_exitcode_get()`.  `None` if not exported.
    pub(crate) fn exit_code(&self) -> Option<c_int> {
        let exit_code_get = self.exit_code_get?;
        // SAFETY: takes no arguments; valid any time after mono_jit_init.
        Some(unsafe { exit_code_get() })
    }

    /// `mono_jit_cleanup(domain)`, consuming the handle.  `false` if not
    /// exported.
    pub(crate) fn cleanup(&self, domain: Domain) -> bool {
        let Some(cleanup) = self.cleanup else {
            return false;
        };
        // SAFETY: domain is live and is not used again; it is moved in.
        unsafe { cleanup(domain.0.as_ptr()) };
        true
    }
}
