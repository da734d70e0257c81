use anyhow::Context as _;

/// Default when `RUST_LOG` is unset: crate logs at info, plus the request
/// traces `nextread-app` emits through its trace layer.
const DEFAULT_DIRECTIVES: &str = "info,tower_http=debug";

pub fn init() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_DIRECTIVES;

    #[test]
    fn default_directives_parse() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_DIRECTIVES).is_ok());
    }
}
