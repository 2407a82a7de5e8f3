// ── Leveled diagnostics ───────────────────────────────────────────────────────
//
// Builds the stderr subscriber for the run.  `main` installs it with
// `tracing::subscriber::with_default`, scoped to the launcher call, so no
// global logger is ever registered.

use tracing::Subscriber;

use crate::config::Config;

/// A plain-text stderr subscriber filtered to `config`'s verbosity.
pub(crate) fn subscriber(config: &Config) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_max_level(config.level_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish()
}
