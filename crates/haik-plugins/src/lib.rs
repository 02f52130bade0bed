//! Bundled plugins for `haik-markdown`.
//!
//! Two repositories are provided:
//! - [`bootstrap_repository`]: `alert`, `icon`, `cols` and `section`, producing
//!   Bootstrap 3 markup
//! - [`flat_ui_repository`]: `tile`, a Flat UI flavour of `cols`
//!
//! # Example
//!
//! ```
//! use haik_markdown::HaikMarkdown;
//! use haik_plugins::{bootstrap_repository, flat_ui_repository};
//!
//! let engine = HaikMarkdown::new()
//!     .with_repository(bootstrap_repository())
//!     .with_repository(flat_ui_repository());
//!
//! let html = engine.transform("Search /(icon search)");
//! assert_eq!(
//!     html,
//!     "<p>Search <i class=\"haik-plugin-icon glyphicon glyphicon-search\"></i></p>\n"
//! );
//! ```

mod alert;
mod attributes;
mod cols;
mod icon;
mod section;
mod tile;

use haik_markdown::FactoryRepository;

pub use alert::AlertPlugin;
pub use cols::ColsPlugin;
pub use icon::IconPlugin;
pub use section::SectionPlugin;
pub use tile::TilePlugin;

/// Repository with the Bootstrap plugins.
#[must_use]
pub fn bootstrap_repository() -> FactoryRepository {
    FactoryRepository::new()
        .with_plugin("alert", || Box::new(AlertPlugin::new()))
        .with_plugin("icon", || Box::new(IconPlugin::new()))
        .with_plugin("cols", || Box::new(ColsPlugin::new()))
        .with_plugin("section", || Box::new(SectionPlugin::new()))
}

/// Repository with the Flat UI plugins.
#[must_use]
pub fn flat_ui_repository() -> FactoryRepository {
    FactoryRepository::new().with_plugin("tile", || Box::new(TilePlugin::new()))
}

#[cfg(test)]
mod tests {
    use haik_markdown::{HaikMarkdown, PluginRepository};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_repositories_list_their_plugins() {
        assert_eq!(
            bootstrap_repository().get_all(),
            vec!["alert", "cols", "icon", "section"]
        );
        assert_eq!(flat_ui_repository().get_all(), vec!["tile"]);
    }

    #[test]
    fn test_engine_aggregates_both_repositories() {
        let engine = HaikMarkdown::new()
            .with_repository(bootstrap_repository())
            .with_repository(flat_ui_repository());

        assert_eq!(
            engine.all_plugins(),
            vec!["alert", "cols", "icon", "section", "tile"]
        );
        assert!(engine.has_plugin("Tile"));
        assert!(!engine.has_plugin("thumbnails"));
    }
}
