use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Diagnostics go to stderr so they never interleave with the summary on stdout.
pub fn init(verbose: bool) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    if TermLogger::init(level_for(verbose), config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("Warning: Logger already initialized");
    }
}
