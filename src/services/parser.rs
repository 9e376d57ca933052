// src/services/parser.rs

//! Show page parser.
//!
//! Extracts a [`Show`] record from one show page. Required fields
//! (title, rating, episode list, cast column) fail the whole page;
//! everything else degrades to an empty value with a warning.

use std::collections::BTreeMap;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Episode, PageSelectors, Show};

const EPISODE_SEPARATOR: &str = " -- ";

/// Parser for show pages, with selectors and patterns compiled once.
pub struct ShowPageParser {
    name_sel: Selector,
    description_sel: Selector,
    rating_value_sel: Selector,
    rating_count_sel: Selector,
    airs_status_sel: Selector,
    general_info_sel: Selector,
    episode_list_sel: Selector,
    cast_column_sel: Selector,
    actor_sel: Selector,
    bold_sel: Selector,

    premiere_re: Regex,
    classification_re: Regex,
    genre_re: Regex,
    network_re: Regex,
    air_time_re: Regex,
    runtime_re: Regex,
    season_re: Regex,
    character_re: Regex,
}

/// Fields recovered from the general-information table.
struct GeneralInfo {
    premiere: String,
    classification: String,
    genres: Vec<String>,
    network: String,
    air_time: String,
    runtime: String,
}

impl ShowPageParser {
    /// Compile all selectors and patterns from configuration.
    pub fn new(selectors: &PageSelectors) -> Result<Self> {
        Ok(Self {
            name_sel: parse_selector(&selectors.name_selector)?,
            description_sel: parse_selector(&selectors.description_selector)?,
            rating_value_sel: parse_selector(&selectors.rating_value_selector)?,
            rating_count_sel: parse_selector(&selectors.rating_count_selector)?,
            airs_status_sel: parse_selector(&selectors.airs_status_selector)?,
            general_info_sel: parse_selector(&selectors.general_info_selector)?,
            episode_list_sel: parse_selector(&selectors.episode_list_selector)?,
            cast_column_sel: parse_selector(&selectors.cast_column_selector)?,
            actor_sel: parse_selector(&selectors.actor_selector)?,
            bold_sel: parse_selector("b")?,
            premiere_re: compile_pattern(&selectors.premiere_pattern)?,
            classification_re: compile_pattern(&selectors.classification_pattern)?,
            genre_re: compile_pattern(&selectors.genre_pattern)?,
            network_re: compile_pattern(&selectors.network_pattern)?,
            air_time_re: compile_pattern(&selectors.air_time_pattern)?,
            runtime_re: compile_pattern(&selectors.runtime_pattern)?,
            season_re: compile_pattern(&selectors.season_pattern)?,
            character_re: compile_pattern(&selectors.character_pattern)?,
        })
    }

    /// Parse a show page into a record.
    ///
    /// Extraction errors carry the show name as context once the title
    /// has been recovered, so callers can ledger failed pages by name.
    pub fn parse(&self, html: &str, url: &str) -> Result<Show> {
        let document = Html::parse_document(html);

        let name = self.required_text(&document, &self.name_sel, url, "name")?;

        let description = document
            .select(&self.description_sel)
            .map(|el| element_text(&el))
            .collect::<Vec<_>>()
            .join("\n");

        let rating_text = self.required_text(&document, &self.rating_value_sel, &name, "rating value")?;
        let rating_value: f64 = rating_text.parse().map_err(|_| {
            AppError::extract(&name, format!("unparsable rating value {rating_text:?}"))
        })?;

        let count_text = self
            .required_text(&document, &self.rating_count_sel, &name, "rating count")?
            .replace(',', "");
        let rating_count: u64 = count_text.parse().map_err(|_| {
            AppError::extract(&name, format!("unparsable rating count {count_text:?}"))
        })?;

        let (air_days, status) = self.parse_airs_status(&document);
        let general = self.parse_general_info(&document, &name);
        let seasons = self.parse_episodes(&document, &name)?;
        let cast = self.parse_cast(&document, &name)?;

        Ok(Show {
            name,
            status,
            rating_value,
            rating_count,
            url: url.to_string(),
            description,
            premiere: general.premiere,
            classification: general.classification,
            genres: general.genres,
            network: general.network,
            air_days,
            air_time: general.air_time,
            runtime: general.runtime,
            seasons,
            cast,
        })
    }

    fn required_text(
        &self,
        document: &Html,
        selector: &Selector,
        context: &str,
        field: &str,
    ) -> Result<String> {
        document
            .select(selector)
            .next()
            .map(|el| element_text(&el))
            .ok_or_else(|| AppError::extract(context, format!("missing {field} element")))
    }

    /// Air days and status live in the first two `<b>` tags of the
    /// airing cell. Anything less leaves both fields empty.
    fn parse_airs_status(&self, document: &Html) -> (Vec<String>, String) {
        let Some(cell) = document.select(&self.airs_status_sel).next() else {
            return (Vec::new(), String::new());
        };

        let bolds: Vec<String> = cell.select(&self.bold_sel).map(|el| element_text(&el)).collect();
        if bolds.len() < 2 {
            return (Vec::new(), String::new());
        }

        let air_days = bolds[0]
            .split(", ")
            .map(|day| day.trim().to_string())
            .filter(|day| !day.is_empty())
            .collect();
        (air_days, bolds[1].clone())
    }

    /// The general-information table is free text with `<br>` breaks,
    /// so fields are recovered with patterns over its raw HTML.
    fn parse_general_info(&self, document: &Html, name: &str) -> GeneralInfo {
        let html = document
            .select(&self.general_info_sel)
            .next()
            .map(|el| el.html())
            .unwrap_or_default();

        let genres_raw = self.capture_or_empty(&self.genre_re, &html, 1, "Genre", name);
        let genres = if genres_raw.is_empty() {
            Vec::new()
        } else {
            genres_raw
                .split(" | ")
                .map(|genre| genre.trim().to_string())
                .filter(|genre| !genre.is_empty())
                .collect()
        };

        GeneralInfo {
            premiere: self.capture_or_empty(&self.premiere_re, &html, 1, "Series Premiere", name),
            classification: self.capture_or_empty(
                &self.classification_re,
                &html,
                1,
                "Classification",
                name,
            ),
            genres,
            network: self.capture_or_empty(&self.network_re, &html, 1, "Network", name),
            air_time: self.capture_or_empty(&self.air_time_re, &html, 2, "Airs", name),
            runtime: self.capture_or_empty(&self.runtime_re, &html, 1, "Runtime", name),
        }
    }

    fn capture_or_empty(
        &self,
        pattern: &Regex,
        haystack: &str,
        group: usize,
        field: &str,
        name: &str,
    ) -> String {
        match pattern.captures(haystack).and_then(|caps| caps.get(group)) {
            Some(capture) => capture.as_str().trim().to_string(),
            None => {
                log::warn!("'{}' not found for show '{}'. Using empty value.", field, name);
                String::new()
            }
        }
    }

    /// Parse the episode list container.
    ///
    /// The container interleaves season divider `<div>`s and episode
    /// text nodes of the form `"S01E01 -- Sep 21, 2009 -- Pilot"`.
    /// Episode numbers restart at 1 for every season; lines before the
    /// first divider count as season 1.
    fn parse_episodes(&self, document: &Html, context: &str) -> Result<BTreeMap<u32, Vec<Episode>>> {
        let container = document
            .select(&self.episode_list_sel)
            .next()
            .ok_or_else(|| AppError::extract(context, "missing episode list container"))?;

        let mut seasons: BTreeMap<u32, Vec<Episode>> = BTreeMap::new();
        let mut season_number: u32 = 1;
        let mut episode_number: u32 = 1;

        for child in container.children() {
            if let Some(element) = ElementRef::wrap(child) {
                if element.value().name() != "div" {
                    continue;
                }
                let text = element_text(&element);
                let header = self
                    .season_re
                    .captures(&text)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse::<u32>().ok());
                match header {
                    Some(number) => {
                        season_number = number;
                        episode_number = 1;
                        seasons.entry(season_number).or_default();
                    }
                    None => log::debug!("Ignoring non-season divider {text:?}"),
                }
            } else if let Some(text) = child.value().as_text() {
                let line = text.trim();
                if line.is_empty() {
                    continue;
                }

                let parts: Vec<&str> = line.split(EPISODE_SEPARATOR).collect();
                if parts.len() < 3 {
                    log::debug!("Skipping malformed episode line {line:?}");
                    continue;
                }

                seasons.entry(season_number).or_default().push(Episode {
                    number: episode_number,
                    name: parts[parts.len() - 1].trim().to_string(),
                    release_date: parts[1].trim().to_string(),
                });
                episode_number += 1;
            }
        }

        Ok(seasons)
    }

    /// Parse the cast column.
    ///
    /// Entries alternate an actor `<div>` and a bare text node holding
    /// `" as <character>"`. Pairs missing their text node are skipped.
    fn parse_cast(&self, document: &Html, context: &str) -> Result<BTreeMap<String, String>> {
        let column = document
            .select(&self.cast_column_sel)
            .next()
            .ok_or_else(|| AppError::extract(context, "missing cast column"))?;

        let first_actor = column
            .select(&self.actor_sel)
            .next()
            .ok_or_else(|| AppError::extract(context, "missing first cast entry"))?;

        let mut cast = BTreeMap::new();

        let first_text = first_actor
            .next_sibling()
            .and_then(|node| node.value().as_text().map(|t| t.to_string()));
        let first_character = match first_text {
            Some(text) => self.clean_character_name(&text, context),
            None => {
                log::warn!("No character text after first cast entry for '{context}'");
                String::new()
            }
        };
        cast.insert(clean_actor_name(&element_text(&first_actor)), first_character);

        // Scan from the first actor's sibling; the first character text
        // node (when present) falls through the element check, and an
        // element there is the next actor entry.
        let mut node = first_actor.next_sibling();
        while let Some(current) = node {
            let next = current.next_sibling();

            if let Some(element) = ElementRef::wrap(current) {
                if element.value().name() == "div" {
                    let actor = clean_actor_name(&element_text(&element));
                    match next.and_then(|n| n.value().as_text().map(|t| t.to_string())) {
                        Some(text) => {
                            cast.insert(actor, self.clean_character_name(&text, context));
                        }
                        None => {
                            log::warn!("No character text for cast entry '{actor}' on '{context}'");
                        }
                    }
                }
            }

            node = next;
        }

        Ok(cast)
    }

    fn clean_character_name(&self, text: &str, context: &str) -> String {
        match self.character_re.captures(text).and_then(|caps| caps.get(1)) {
            Some(capture) => capture.as_str().trim().to_string(),
            None => {
                log::warn!("No character name in cast text {text:?} for '{context}'");
                String::new()
            }
        }
    }
}

/// Collect and trim the text content of an element.
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Actor names drop periods so initials and suffixes compare stably.
fn clean_actor_name(name: &str) -> String {
    name.replace('.', "")
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn compile_pattern(p: &str) -> Result<Regex> {
    Regex::new(p).map_err(|e| AppError::pattern(p, e))
}
