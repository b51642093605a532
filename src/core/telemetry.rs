use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Settings;

/// Noisy dependencies are capped unless `RUST_LOG` says otherwise.
const DEPENDENCY_DIRECTIVES: &[&str] = &["sqlx=warn", "hyper=warn", "tower_http=info"];

pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&settings.telemetry().log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(fmt::format::FmtSpan::CLOSE);

    let installed = if settings.telemetry().json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|err| anyhow::anyhow!(err.to_string()))
}

fn default_filter(level: &str) -> EnvFilter {
    let mut directives = vec![level.to_string()];
    directives.extend(DEPENDENCY_DIRECTIVES.iter().map(|item| item.to_string()));
    EnvFilter::new(directives.join(","))
}

#[cfg(test)]
mod tests {
    use super::default_filter;

    #[test]
    fn default_filter_keeps_requested_level() {
        let rendered = default_filter("debug").to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("sqlx=warn"));
    }
}
