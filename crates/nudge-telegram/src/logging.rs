//! Tracing setup for both binaries.

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber whose filter widens with each `-v`.
///
/// `RUST_LOG`, when set, wins over the verbosity count.
pub fn init_tracing(binary: &str, verbose: u8) {
    let filter = match verbose {
        0 => format!("{binary}=info,nudge_telegram=info,nudge_orchestrator=info,nudge_agent=info,nudge_core=info,teloxide=warn"),
        1 => format!("{binary}=debug,nudge_telegram=debug,nudge_orchestrator=debug,nudge_agent=debug,nudge_core=debug,nudge_persistence=debug,teloxide=info"),
        2 => format!("{binary}=trace,nudge_telegram=trace,nudge_orchestrator=trace,nudge_agent=trace,nudge_core=trace,nudge_persistence=trace,teloxide=debug"),
        _ => "trace".to_string(),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
