//! Show record data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single episode within a season.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    /// Position within the season, starting at 1
    pub number: u32,

    /// Episode title
    pub name: String,

    /// Release date as printed on the page
    pub release_date: String,
}

/// A TV-series record scraped from a show page.
///
/// Produced once per page and written immutably to both sinks. Seasons
/// and cast use ordered maps so serialized output is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Show {
    /// Show title
    pub name: String,

    /// Lifecycle status, e.g. "Returning Series"
    pub status: String,

    /// Aggregate rating value
    pub rating_value: f64,

    /// Number of rating votes
    pub rating_count: u64,

    /// Source page URL
    pub url: String,

    /// Description fragments joined with newlines
    pub description: String,

    /// Premiere date as free text
    pub premiere: String,

    /// Classification, e.g. "Scripted"
    pub classification: String,

    /// Genre list
    pub genres: Vec<String>,

    /// Broadcasting network
    pub network: String,

    /// Weekdays the show airs on
    pub air_days: Vec<String>,

    /// Air time, e.g. "10:00 pm"
    pub air_time: String,

    /// Runtime, e.g. "60 Minutes"
    pub runtime: String,

    /// Episodes grouped by season number
    pub seasons: BTreeMap<u32, Vec<Episode>>,

    /// Actor name mapped to character name
    pub cast: BTreeMap<String, String>,
}

impl Show {
    /// Stable document-store identifier derived from the source URL.
    pub fn document_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.url.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// File name for the JSON export, with path separators neutralized.
    pub fn export_filename(&self) -> String {
        format!("{}.json", self.name.replace('/', "-"))
    }

    /// Total number of episodes across all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.values().map(|eps| eps.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_show() -> Show {
        let mut seasons = BTreeMap::new();
        seasons.insert(
            1,
            vec![Episode {
                number: 1,
                name: "Pilot".to_string(),
                release_date: "Sep 21, 2009".to_string(),
            }],
        );

        let mut cast = BTreeMap::new();
        cast.insert("Jon Smith".to_string(), "The Captain".to_string());

        Show {
            name: "Example Show".to_string(),
            status: "Returning Series".to_string(),
            rating_value: 8.5,
            rating_count: 1024,
            url: "https://eztv.ag/shows/1-example-show/".to_string(),
            description: "An example.".to_string(),
            premiere: "September 21, 2009".to_string(),
            classification: "Scripted".to_string(),
            genres: vec!["Drama".to_string(), "Comedy".to_string()],
            network: "ABC".to_string(),
            air_days: vec!["Monday".to_string()],
            air_time: "10:00 pm".to_string(),
            runtime: "60 Minutes".to_string(),
            seasons,
            cast,
        }
    }

    #[test]
    fn test_document_id_is_stable() {
        let show = sample_show();
        let id = show.document_id();
        assert_eq!(id.len(), 64);
        assert_eq!(id, show.document_id());
    }

    #[test]
    fn test_document_id_depends_on_url() {
        let show = sample_show();
        let mut other = sample_show();
        other.url = "https://eztv.ag/shows/2-other-show/".to_string();
        assert_ne!(show.document_id(), other.document_id());
    }

    #[test]
    fn test_export_filename_neutralizes_slashes() {
        let mut show = sample_show();
        show.name = "Whose Line Is It Anyway? US/UK".to_string();
        assert_eq!(show.export_filename(), "Whose Line Is It Anyway? US-UK.json");
    }

    #[test]
    fn test_episode_count() {
        let mut show = sample_show();
        show.seasons.insert(
            2,
            vec![
                Episode {
                    number: 1,
                    name: "Return".to_string(),
                    release_date: "Sep 20, 2010".to_string(),
                },
                Episode {
                    number: 2,
                    name: "Again".to_string(),
                    release_date: "Sep 27, 2010".to_string(),
                },
            ],
        );
        assert_eq!(show.episode_count(), 3);
    }

    #[test]
    fn test_seasons_serialize_with_numeric_keys() {
        let show = sample_show();
        let value = serde_json::to_value(&show).unwrap();
        assert_eq!(value["seasons"]["1"][0]["name"], "Pilot");
        assert_eq!(value["cast"]["Jon Smith"], "The Captain");
    }
}
