//! Tracing subscriber assembly: console layer (pretty or JSON) plus an
//! optional rotating JSON file sink.

use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::cli::FILE_GUARD;

pub fn init_tracing(json: bool, level: &str, file: Option<&str>, rotation: Option<&str>) {
    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    let mut layers = vec![console];

    if let Some(path) = file {
        let path = Path::new(path);
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let name = path.file_name().unwrap_or(path.as_os_str());
        let appender = match rotation {
            Some("daily") => {
                tracing_appender::rolling::daily(dir.unwrap_or(Path::new(".")), name)
            }
            Some("hourly") => {
                tracing_appender::rolling::hourly(dir.unwrap_or(Path::new(".")), name)
            }
            _ => tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(fmt::layer().json().with_writer(writer).boxed());
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .init();
}
