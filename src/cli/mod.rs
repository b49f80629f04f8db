/// Source selection for the inspection job
pub mod datasets;

/// Compute backend selection
pub mod backend;

/// Initialize `pretty_env_logger`, defaulting to the `info` level when `RUST_LOG` is unset
pub fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}
