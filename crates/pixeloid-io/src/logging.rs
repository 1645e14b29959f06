use crate::settings::EditorSettings;

/// Install `env_logger` with the filter from `settings`.
///
/// `RUST_LOG`, when set, takes precedence. Returns false if a logger was
/// already installed, in which case nothing changes.
pub fn init_logging(settings: &EditorSettings) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&settings.log_filter);
    if let Ok(env) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env);
    }

    match builder.try_init() {
        Ok(()) => {
            log::debug!("Logging initialised with filter '{}'", settings.log_filter);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let settings = EditorSettings::default();
        init_logging(&settings);
        assert!(!init_logging(&settings));
    }
}
