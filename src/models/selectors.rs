// src/models/selectors.rs

//! CSS selectors and text patterns for scraping a show page.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors and regex patterns used to pull fields out of a show
/// page. Every field has a default matching the current site markup, so
/// a layout change can be absorbed with a config edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelectors {
    /// Selector for the show title element
    #[serde(default = "defaults::name_selector")]
    pub name_selector: String,

    /// Selector for description fragments (all matches are joined)
    #[serde(default = "defaults::description_selector")]
    pub description_selector: String,

    /// Selector for the aggregate rating value
    #[serde(default = "defaults::rating_value_selector")]
    pub rating_value_selector: String,

    /// Selector for the rating vote count
    #[serde(default = "defaults::rating_count_selector")]
    pub rating_count_selector: String,

    /// Selector for the cell holding air day and status in `<b>` tags
    #[serde(default = "defaults::airs_status_selector")]
    pub airs_status_selector: String,

    /// Selector for the general-information table (matched as raw HTML)
    #[serde(default = "defaults::general_info_selector")]
    pub general_info_selector: String,

    /// Selector for the episode list container
    #[serde(default = "defaults::episode_list_selector")]
    pub episode_list_selector: String,

    /// Selector for the cast column container
    #[serde(default = "defaults::cast_column_selector")]
    pub cast_column_selector: String,

    /// Selector for actor entries inside the cast container
    #[serde(default = "defaults::actor_selector")]
    pub actor_selector: String,

    /// Pattern for the premiere date in the general-info HTML
    #[serde(default = "defaults::premiere_pattern")]
    pub premiere_pattern: String,

    /// Pattern for the classification in the general-info HTML
    #[serde(default = "defaults::classification_pattern")]
    pub classification_pattern: String,

    /// Pattern for the genre list in the general-info HTML
    #[serde(default = "defaults::genre_pattern")]
    pub genre_pattern: String,

    /// Pattern for the network in the general-info HTML
    #[serde(default = "defaults::network_pattern")]
    pub network_pattern: String,

    /// Pattern for the air time; the time is capture group 2
    #[serde(default = "defaults::air_time_pattern")]
    pub air_time_pattern: String,

    /// Pattern for the runtime in the general-info HTML
    #[serde(default = "defaults::runtime_pattern")]
    pub runtime_pattern: String,

    /// Pattern for season headers in the episode list
    #[serde(default = "defaults::season_pattern")]
    pub season_pattern: String,

    /// Pattern for the character name in a cast text node
    #[serde(default = "defaults::character_pattern")]
    pub character_pattern: String,
}

impl PageSelectors {
    /// Reject selectors or patterns overridden to an empty string.
    ///
    /// An empty CSS selector fails to compile, but an empty regex
    /// compiles and matches everything, which would silently misfile
    /// fields mid-crawl.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name_selector", &self.name_selector),
            ("description_selector", &self.description_selector),
            ("rating_value_selector", &self.rating_value_selector),
            ("rating_count_selector", &self.rating_count_selector),
            ("airs_status_selector", &self.airs_status_selector),
            ("general_info_selector", &self.general_info_selector),
            ("episode_list_selector", &self.episode_list_selector),
            ("cast_column_selector", &self.cast_column_selector),
            ("actor_selector", &self.actor_selector),
            ("premiere_pattern", &self.premiere_pattern),
            ("classification_pattern", &self.classification_pattern),
            ("genre_pattern", &self.genre_pattern),
            ("network_pattern", &self.network_pattern),
            ("air_time_pattern", &self.air_time_pattern),
            ("runtime_pattern", &self.runtime_pattern),
            ("season_pattern", &self.season_pattern),
            ("character_pattern", &self.character_pattern),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("selectors.{name} is empty")));
            }
        }
        Ok(())
    }
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            name_selector: defaults::name_selector(),
            description_selector: defaults::description_selector(),
            rating_value_selector: defaults::rating_value_selector(),
            rating_count_selector: defaults::rating_count_selector(),
            airs_status_selector: defaults::airs_status_selector(),
            general_info_selector: defaults::general_info_selector(),
            episode_list_selector: defaults::episode_list_selector(),
            cast_column_selector: defaults::cast_column_selector(),
            actor_selector: defaults::actor_selector(),
            premiere_pattern: defaults::premiere_pattern(),
            classification_pattern: defaults::classification_pattern(),
            genre_pattern: defaults::genre_pattern(),
            network_pattern: defaults::network_pattern(),
            air_time_pattern: defaults::air_time_pattern(),
            runtime_pattern: defaults::runtime_pattern(),
            season_pattern: defaults::season_pattern(),
            character_pattern: defaults::character_pattern(),
        }
    }
}

mod defaults {
    pub fn name_selector() -> String {
        "td.section_post_header span".into()
    }
    pub fn description_selector() -> String {
        r#"span[itemprop="description"]"#.into()
    }
    pub fn rating_value_selector() -> String {
        r#"span[itemprop="ratingValue"]"#.into()
    }
    pub fn rating_count_selector() -> String {
        r#"span[itemprop="ratingCount"]"#.into()
    }
    pub fn airs_status_selector() -> String {
        "td.show_info_airs_status".into()
    }
    pub fn general_info_selector() -> String {
        "table.section_thread_post.show_info_description".into()
    }
    pub fn episode_list_selector() -> String {
        // The site carries the episode box layout inline, so the style
        // attribute is the only stable handle on it.
        r#"div[style="width: 537px; height: 250px; overflow-y: auto;"]"#.into()
    }
    pub fn cast_column_selector() -> String {
        "td.show_info_tvnews_column div".into()
    }
    pub fn actor_selector() -> String {
        r#"div[itemprop="actor"]"#.into()
    }
    pub fn premiere_pattern() -> String {
        r"Series Premiere: ((\w+|,| )+)".into()
    }
    pub fn classification_pattern() -> String {
        r"Classification: ((\w+ ?)+)".into()
    }
    pub fn genre_pattern() -> String {
        r"Genre: ([\w+\| ]+)".into()
    }
    pub fn network_pattern() -> String {
        r"Network: (\w+ ?\w+?)+".into()
    }
    pub fn air_time_pattern() -> String {
        r"Airs: (\w+,? ?)+ at (\d{2}:\d{2} (am|pm))".into()
    }
    pub fn runtime_pattern() -> String {
        r"Runtime: (\d+ Minutes)".into()
    }
    pub fn season_pattern() -> String {
        r"Season (\d+)".into()
    }
    pub fn character_pattern() -> String {
        r" as (.*)".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_validate() {
        assert!(PageSelectors::default().validate().is_ok());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let selectors = PageSelectors {
            season_pattern: String::new(),
            ..PageSelectors::default()
        };
        assert!(selectors.validate().is_err());
    }

    #[test]
    fn test_whitespace_selector_rejected() {
        let selectors = PageSelectors {
            name_selector: "  ".to_string(),
            ..PageSelectors::default()
        };
        assert!(selectors.validate().is_err());
    }
}
