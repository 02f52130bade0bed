//! CLI command implementations.

pub(crate) mod plugins;
pub(crate) mod render;

pub(crate) use plugins::PluginsArgs;
pub(crate) use render::RenderArgs;

use haik_config::Config;
use haik_markdown::{HaikMarkdown, HaikMarkdownConfig, MarkdownRenderer};
use haik_plugins::{bootstrap_repository, flat_ui_repository};

/// Build an engine with the bundled plugins minus the disabled ones.
pub(crate) fn build_engine(config: &Config) -> HaikMarkdown {
    let disabled = &config.plugins.disabled;
    if !disabled.is_empty() {
        tracing::info!(plugins = ?disabled, "Disabling plugins");
    }

    let renderer = MarkdownRenderer::new()
        .with_hard_wrap(config.markdown.hard_wrap)
        .with_code_class_prefix(config.markdown.code_class_prefix.clone())
        .with_gfm(config.markdown.gfm);

    let engine_config = HaikMarkdownConfig::new()
        .with_param_separator(config.plugins.param_separator.clone())
        .with_max_depth(config.plugins.max_depth);

    HaikMarkdown::new()
        .with_config(engine_config)
        .with_base(renderer)
        .with_repository(bootstrap_repository().without(disabled))
        .with_repository(flat_ui_repository().without(disabled))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_build_engine_registers_bundled_plugins() {
        let engine = build_engine(&Config::default());
        assert_eq!(
            engine.all_plugins(),
            vec!["alert", "cols", "icon", "section", "tile"]
        );
    }

    #[test]
    fn test_build_engine_skips_disabled_plugins() {
        let mut config = Config::default();
        config.plugins.disabled = vec!["Section".to_owned(), "tile".to_owned()];

        let engine = build_engine(&config);

        assert_eq!(engine.all_plugins(), vec!["alert", "cols", "icon"]);
        assert_eq!(
            engine.transform(":::section\nx\n:::"),
            "<p>:::section\nx\n:::</p>\n"
        );
    }

    #[test]
    fn test_build_engine_applies_markdown_settings() {
        let mut config = Config::default();
        config.markdown.hard_wrap = true;
        config.plugins.param_separator = "+++".to_owned();

        let engine = build_engine(&config);

        assert_eq!(engine.transform("a\nb"), "<p>a<br>\nb</p>\n");
        assert_eq!(engine.config().param_separator(), "+++");
    }
}
