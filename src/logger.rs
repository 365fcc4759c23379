use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the CLI subscriber. `RUST_LOG` takes precedence over `verbose`.
///
/// Output goes to stderr so stdout only carries the checkout summary.
pub fn init_cli_logger(verbose: bool) {
    let default_filter = if verbose { "nftcart=debug" } else { "nftcart=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}
