//! Logger setup for the CLI, the bench tool and the browser build.
//!
//! Library code only emits through the `log` macros:
//! - `info`: word list loaded (size, rejects, timing), round started, round over.
//! - `warn`: the word list could not be loaded and the session keeps running without it.
//! - `debug`: board generation per seed, each solve with its timing, accepted words,
//!   and solve requests that were dropped or arrived for an old board.

#[cfg(not(target_arch = "wasm32"))]
use log::LevelFilter;

/// Route `log` output to stderr (native) or the browser console (wasm32).
///
/// `debug_enabled` comes from `MOGGLE_DEBUG` in the CLI and from the caller in the
/// browser build. Natively, a `RUST_LOG` filter takes precedence, e.g.
/// `RUST_LOG=moggle::solver=debug` to see only solve timings.
///
/// Only the first call installs a logger; later calls do nothing.
pub fn init_logger(debug_enabled: bool) {
    #[cfg(target_arch = "wasm32")]
    {
        let level = if debug_enabled { log::Level::Debug } else { log::Level::Info };

        if let Err(e) = console_log::init_with_level(level) {
            let msg = format!("moggle: console logging unavailable ({e})");
            web_sys::console::error_1(&msg.into());
            return;
        }
        log::debug!("Browser console logging at {level:?}");
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let level = if debug_enabled { LevelFilter::Debug } else { LevelFilter::Info };

        let mut builder = env_logger::Builder::new();
        builder.filter(None, level).format_timestamp(None).format_target(false);

        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }

        if builder.try_init().is_ok() {
            log::debug!("Logging to stderr at {level:?}");
        }
    }
}
