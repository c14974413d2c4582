//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter used when neither the caller nor `RUST_LOG` provides one.
pub const DEFAULT_FILTER: &str = "debug,wgpu_core=info,wgpu_hal=info,naga=info";

/// Install the global subscriber with [`DEFAULT_FILTER`], or `RUST_LOG` if set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Install the global subscriber with an explicit directive string.
///
/// Invalid directives fall back to [`DEFAULT_FILTER`].
pub fn init_with_filter(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter '{}': {}", filter, err);
        EnvFilter::new(DEFAULT_FILTER)
    });
    install(filter);
}

fn install(filter: EnvFilter) {
    // A subscriber may already be installed (tests, host applications).
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("global tracing subscriber already installed, keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_with_filter("warn");
        init();
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        init_with_filter("lumora=[[[");
    }
}
