/// mdh build script.
///
/// The platform layer ships two loader backends: `dlopen` for unix targets and
/// `LoadLibraryA` for Windows.  Anything else has no backend to select.
fn main() {
    // Hard gate: fail loudly on an unsupported target rather than producing a
    // binary with no platform implementation.
    let family = std::env::var("CARGO_CFG_TARGET_FAMILY").unwrap_or_default();
    let supported = family
        .split(',')
        .any(|f| f == "unix" || f == "windows");
    if !supported {
        let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
        panic!(
            "mdh only builds for unix or Windows targets \
             (CARGO_CFG_TARGET_FAMILY = {family:?}, CARGO_CFG_TARGET_OS = {target_os:?})"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
