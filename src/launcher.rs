// ── Hosting protocol driver ───────────────────────────────────────────────────
//
// One run of the launcher:
//
//   load library → probe entry points → monovm_initialize (if exported)
//     → mono_main (if exported)                                   → exit code
//     → otherwise the classic embedding sequence                  → exit code
//
// Every OS interaction goes through `Platform`; every call into the runtime
// goes through the `host` wrappers.  No `unsafe` here.

use std::{
    ffi::{CString, OsStr, OsString},
    mem::ManuallyDrop,
};

use tracing::{debug, info, trace, warn};

use crate::{
    cli,
    config::{MDH_TPA_ENV, MONO_PATH_ENV, TPA_ENV},
    error::{HostError, Result},
    host::{
        abi,
        marshal::{ArgVector, Properties},
        Embedding, EntryPoints,
    },
    platform::Platform,
};

// ── Corlib probing ────────────────────────────────────────────────────────────

/// Corlib file names tried next to the hosting library, in order.
const CORLIB_NAMES: [&str; 2] = ["System.Private.CoreLib", "mscorlib"];

const CORLIB_EXTENSION: &str = ".dll";

// ── Launcher ──────────────────────────────────────────────────────────────────

pub(crate) struct Launcher<'p, P: Platform> {
    platform: &'p P,
}

impl<'p, P: Platform> Launcher<'p, P> {
    pub(crate) fn new(platform: &'p P) -> Self {
        Self { platform }
    }

    /// Run the managed program described by `args` (the full process argv).
    ///
    /// Returns the managed exit code.  Any `Err` means no managed code ran,
    /// or the runtime could not be brought up.
    pub(crate) fn run(&self, args: &[OsString]) -> Result<i32> {
        let invocation = cli::parse(args)?;

        // Never unloaded: runtime threads may still execute code from the
        // image after the entrypoint returns, and the process exits next.
        let library = ManuallyDrop::new(self.load(invocation.library)?);

        let entry = EntryPoints::probe(self.platform, &*library);
        debug!(
            monovm_initialize = entry.has_initialize(),
            mono_main = entry.has_main(),
            "probed entry points"
        );

        if entry.has_initialize() {
            let properties = self.runtime_properties(invocation.library);
            self.initialize(&entry, &properties)?;
        }

        // argv[1..], indices reported relative to the full argv.
        let forwarded = self.encode_args(invocation.forwarded, 1)?;

        if let Some(code) = entry.main(&mut ArgVector::new(forwarded.clone())) {
            info!(code, "mono_main returned");
            return Ok(code);
        }

        self.run_embedded(&library, forwarded)
    }

    fn load(&self, path: &OsStr) -> Result<P::Library> {
        let shown = path.to_string_lossy().into_owned();
        let c_path = self
            .platform
            .to_native_string(path)
            .ok_or(HostError::InvalidArgument { index: 1 })?;
        match self.platform.load_library(&c_path) {
            Some(library) => {
                info!(path = %shown, "loaded hosting library");
                Ok(library)
            }
            None => Err(HostError::Load {
                path: shown,
                detail: self.platform.last_error(),
            }),
        }
    }

    fn encode_args(&self, args: &[OsString], first_index: usize) -> Result<Vec<CString>> {
        args.iter()
            .enumerate()
            .map(|(i, arg)| {
                self.platform
                    .to_native_string(arg)
                    .ok_or(HostError::InvalidArgument { index: first_index + i })
            })
            .collect()
    }

    // ── monovm_initialize ─────────────────────────────────────────────────────

    /// Properties for `monovm_initialize`: the trusted platform assembly list
    /// when one can be found, otherwise none.
    fn runtime_properties(&self, library: &OsStr) -> Properties {
        let mut properties = Properties::new();
        let Some(tpa) = self.trusted_platform_assemblies(library) else {
            warn!("no trusted platform assemblies found; initializing without properties");
            return properties;
        };
        match self.platform.to_native_string(&tpa) {
            Some(value) => properties.push(abi::TRUSTED_PLATFORM_ASSEMBLIES, value),
            None => warn!(
                value = %tpa.to_string_lossy(),
                "trusted platform assemblies value is not representable; ignoring it"
            ),
        }
        properties
    }

    /// First hit wins: launcher override, generic variable, then a corlib
    /// file next to the hosting library.
    fn trusted_platform_assemblies(&self, library: &OsStr) -> Option<OsString> {
        for var in [MDH_TPA_ENV, TPA_ENV] {
            if let Some(value) = self.platform.dup_env(var) {
                debug!(source = var, "trusted platform assemblies from environment");
                return Some(value);
            }
        }

        let dir = self.platform.dirname(library);
        CORLIB_NAMES
            .iter()
            .map(|name| {
                let mut candidate = dir.clone();
                candidate.push(name);
                candidate.push(CORLIB_EXTENSION);
                candidate
            })
            .find(|candidate| {
                let found = self.platform.file_exists(candidate);
                trace!(candidate = %candidate.to_string_lossy(), found, "probing for corlib");
                found
            })
    }

    fn initialize(&self, entry: &EntryPoints, properties: &Properties) -> Result<()> {
        for (key, value) in properties.iter() {
            debug!(key = %key.to_string_lossy(), value = %value.to_string_lossy(), "runtime property");
        }
        match entry.initialize(properties) {
            Some(0) => {
                info!(properties = properties.len(), "monovm_initialize succeeded");
                Ok(())
            }
            Some(code) => Err(HostError::Initialize { code }),
            None => Ok(()),
        }
    }

    // ── Classic embedding API ─────────────────────────────────────────────────

    fn run_embedded(&self, library: &P::Library, forwarded: Vec<CString>) -> Result<i32> {
        // argv[2..]: the program path first.
        let program_args: Vec<CString> = forwarded.into_iter().skip(1).collect();
        let Some(program) = program_args.first().cloned() else {
            return Err(HostError::Usage { help: false });
        };
        let program_display = program.to_string_lossy().into_owned();

        let embedding = Embedding::resolve(self.platform, library)?;
        debug!(
            debugger = embedding.has_debugger(),
            exit_code = embedding.has_exit_code(),
            cleanup = embedding.has_cleanup(),
            "resolved embedding API"
        );

        self.apply_mono_path(&embedding);

        let domain = embedding
            .jit_init(&program)
            .ok_or_else(|| HostError::NoDomain { program: program_display.clone() })?;

        if embedding.attach_debugger(&domain) {
            debug!("debugger support attached to domain");
        }

        let assembly = embedding
            .open_assembly(&domain, &program)
            .ok_or_else(|| HostError::AssemblyOpen { program: program_display.clone() })?;

        info!(program = %program_display, "executing assembly");
        let mut result = embedding.exec(&domain, &assembly, &mut ArgVector::new(program_args));
        debug!(result, "mono_jit_exec returned");

        // The runtime tracks Environment.ExitCode separately from Main's
        // return value; prefer it when exported.
        if let Some(code) = embedding.exit_code() {
            debug!(code, "mono_environment_exitcode_get");
            result = code;
        }

        if !embedding.cleanup(domain) {
            warn!("mono_jit_cleanup is not exported; skipping runtime cleanup");
        }

        Ok(result)
    }

    /// Hand `MONO_PATH` to `mono_assembly_setrootdir` when both exist.
    fn apply_mono_path(&self, embedding: &Embedding) {
        let Some(root) = self.platform.dup_env(MONO_PATH_ENV) else {
            return;
        };
        let Some(c_root) = self.platform.to_native_string(&root) else {
            warn!(value = %root.to_string_lossy(), "{MONO_PATH_ENV} is not representable; ignoring it");
            return;
        };
        if embedding.set_root_dir(&c_root) {
            debug!(root = %root.to_string_lossy(), "assembly root directory set");
        } else {
            self.platform.report_error(format_args!(
                "{MONO_PATH_ENV} is set but '{}' is not available; ignoring it",
                abi::MONO_ASSEMBLY_SETROOTDIR.to_string_lossy()
            ));
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
