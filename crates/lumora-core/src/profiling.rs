//! Profiling utilities based on the `puffin` crate.

use std::sync::OnceLock;

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

use crate::config::ProfilingMode;

/// Address the profiling server listens on.
pub const PUFFIN_ADDRESS: &str = "0.0.0.0:8585";

static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

/// Enable profiling according to `mode`.
///
/// # Example
/// ```no_run
/// use lumora_core::config::ProfilingMode;
/// use lumora_core::profiling::init_profiling;
///
/// init_profiling(ProfilingMode::WithWebserver);
/// ```
pub fn init_profiling(mode: ProfilingMode) {
    match mode {
        ProfilingMode::Off => puffin::set_scopes_on(false),
        ProfilingMode::On => puffin::set_scopes_on(true),
        ProfilingMode::WithWebserver => {
            puffin::set_scopes_on(true);

            if PROFILING_SERVER.get().is_some() {
                return;
            }

            match puffin_http::Server::new(PUFFIN_ADDRESS) {
                Ok(server) => {
                    tracing::info!("Puffin profiler server started on http://{}", PUFFIN_ADDRESS);
                    let _ = PROFILING_SERVER.set(server);
                }
                Err(e) => {
                    tracing::error!("Failed to start puffin server: {}", e);
                }
            }
        }
    }
}

/// Mark the start of a new frame for profiling.
///
/// Call this once per frame, before the materials are updated.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
