use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// JSON logs to stdout. `RUST_LOG` overrides the default filter.
///
/// The enclosing `request` span is flattened into each line so every event
/// carries its `trace_id`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,actix_web=info,sqlx=warn,sea_orm=warn,migration=info")
    });

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .json()
        .with_current_span(true)
        .with_span_list(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
