// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # bondgraph's Logging Framework
//!
//! The library crates log through the [`log`] facade and never install a logger themselves.
//! Executables call [`init`] once at startup, which hands the records to [`env_logger`].
//!
//! By default, the logging level is set to [`Info`](log::Level::Info) for debug builds, and
//! [`Warn`](log::Level::Warn) for release builds. This can be overridden by setting the `RUST_LOG`
//! environment variable, like so:
//!
//! ```sh
//! $> RUST_LOG=bondgraph_bonds=trace cargo run -- structure.xyz
//! ```

/// Initializes logging for the listed crates at the build profile's default level.
pub fn init(crates: &[&'static str]) {
    init_with_level(crates, default_level());
}

/// [`Info`](log::LevelFilter::Info) in debug builds, [`Warn`](log::LevelFilter::Warn) in release.
pub fn default_level() -> log::LevelFilter {
    if cfg!(debug_assertions) {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    }
}

/// Initializes logging so that records from `crates` at `log_level` or above are written to
/// stderr. `RUST_LOG`, when set, replaces this filter entirely. Calling this a second time leaves
/// the first logger in place.
pub fn init_with_level(crates: &[&'static str], log_level: log::LevelFilter) {
    let filter = filter_string(crates, log_level);
    let env = env_logger::Env::default().default_filter_or(filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

// Builds the filter string that would have been set in RUST_LOG.
fn filter_string(crates: &[&'static str], log_level: log::LevelFilter) -> String {
    let level_str = log_level.as_str().to_ascii_lowercase();
    crates
        .iter()
        .map(|pkg_name| format!("{}={}", pkg_name, level_str))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_per_crate_filters() {
        assert_eq!(
            filter_string(&["bondgraph", "bondgraph_bonds"], log::LevelFilter::Debug),
            "bondgraph=debug,bondgraph_bonds=debug"
        );
        assert_eq!(filter_string(&[], log::LevelFilter::Warn), "");
        assert_eq!(filter_string(&["a"], log::LevelFilter::Off), "a=off");
    }

    #[test]
    fn initializing_twice_is_harmless() {
        init(&["bondgraph_logging"]);
        init(&["bondgraph_logging"]);
    }
}

// End of File
