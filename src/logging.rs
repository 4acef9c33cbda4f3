use cfg_if::cfg_if;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Default filter when RUST_LOG is unset
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        /// Route tracing to the browser console
        pub fn init() {
            let wasm_layer = tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfig::default());

            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(wasm_layer)
                .try_init();

            #[cfg(feature = "console_error_panic_hook")]
            console_error_panic_hook::set_once();
        }
    } else {
        use std::env;
        use std::ffi::OsStr;
        use std::io;
        use std::path::Path;

        use once_cell::sync::OnceCell;
        use tracing_appender::non_blocking::WorkerGuard;
        use tracing_subscriber::fmt;

        /// Log file used when RUST_LOG_FILE is unset; rotated daily
        pub const DEFAULT_LOG_FILE: &str = "logs/isocraft.log";

        static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

        /// Compact stderr output plus a daily rolling log file
        pub fn init() {
            let console_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .compact();

            let log_path = env::var("RUST_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
            let log_path = Path::new(&log_path);
            let directory = log_path.parent().unwrap_or(Path::new("."));
            let file_name = log_path.file_name().unwrap_or(OsStr::new("isocraft.log"));

            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name));
            let _ = FILE_GUARD.set(guard);

            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .compact();

            // a second init (tests, embedding hosts) keeps the first subscriber
            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(console_layer)
                .with(file_layer)
                .try_init();

            std::panic::set_hook(Box::new(|info| {
                let location = info
                    .location()
                    .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = info.payload().downcast_ref::<String>() {
                    s.clone()
                } else {
                    "<non-string panic>".to_string()
                };
                let backtrace = std::backtrace::Backtrace::force_capture();
                tracing::error!("panic at {}: {}\nBacktrace:\n{:?}", location, message, backtrace);
            }));
        }
    }
}
