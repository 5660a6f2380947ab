//! Logging support.
//!
//! Builds `tracing` filter directives from the logging configuration,
//! including per-component level overrides.

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level and
/// any component-specific log levels configured in the LoggingConfig, in the
/// format: "base_level,vigil::component1=level1,vigil::component2=level2"
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",vigil::{}={}", component, level));
        }
    }

    filter_str
}
