use std::io;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

pub(crate) fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Plain `[LEVEL] message` lines, only for our own records.
fn config() -> Config {
    ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .add_filter_allow_str("ingrid")
        .build()
}

/// Sends log records to stderr, stdout carries the parsed keys.
///
/// Only the first call installs the logger.
pub(crate) fn init(verbose: bool) {
    let _ = WriteLogger::init(level_for(verbose), config(), io::stderr());
}

#[cfg(test)]
mod tests {
    use super::*;

    mod level_for {
        use super::*;

        #[test]
        fn verbose_means_debug() {
            assert_eq!(level_for(true), LevelFilter::Debug);
            assert_eq!(level_for(false), LevelFilter::Info);
        }
    }

    mod init {
        use super::*;

        #[test]
        #[serial_test::serial]
        fn verbose_enables_debug() {
            init(true);

            assert_eq!(log::max_level(), LevelFilter::Debug);
            assert!(log::log_enabled!(log::Level::Debug));
        }
    }
}
