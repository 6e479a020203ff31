//! Logger setup for the binary.

use log::LevelFilter;

/// Initializes `env_logger` on stderr.
///
/// `RUST_LOG` wins when set. Otherwise only this crate logs: warnings by
/// default, everything down to debug with `verbose`.
pub fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        builder.filter(None, LevelFilter::Off);
        builder.filter(Some("yolomark"), level);
    }

    builder.format_timestamp(None);
    builder.format_target(false);

    // A second init (e.g. from tests driving `run` twice) is harmless.
    let _ = builder.try_init();
}
