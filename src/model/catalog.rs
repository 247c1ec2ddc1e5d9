use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::serde_utils::{
    opt_i64_from_string_or_number, opt_string_or_number_string, string_or_number_string,
    string_or_number_u32,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CatalogKind {
    Movie,
    Series,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Series => write!(f, "series"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(alias = "category_id", default, deserialize_with = "string_or_number_string")]
    pub id: String,
    #[serde(alias = "category_name", default, deserialize_with = "string_or_number_string")]
    pub name: String,
    #[serde(alias = "parent_id", default, deserialize_with = "opt_i64_from_string_or_number")]
    pub parent_id: Option<i64>,
}

/// One VOD stream row from `get_vod_streams`. Unrecognized remote fields
/// are kept in `extra` untouched, they are never interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieEntry {
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub stream_id: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub name: String,
    #[serde(rename = "title", default, deserialize_with = "opt_string_or_number_string")]
    pub alternate_title: Option<String>,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub category_id: String,
    // raw value, defaulting to "mp4" happens at command generation
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub container_extension: String,
    // epoch-seconds numeral or a free-form date string, never trusted
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub added: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesEntry {
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub series_id: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub name: String,
    #[serde(rename = "title", default, deserialize_with = "opt_string_or_number_string")]
    pub alternate_title: Option<String>,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub category_id: String,
    #[serde(default, deserialize_with = "opt_string_or_number_string")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number_string")]
    pub last_modified: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodeEntry {
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number_u32")]
    pub episode_num: u32,
    #[serde(default, deserialize_with = "opt_string_or_number_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub container_extension: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesInfoMeta {
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub plot: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub cast: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub director: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub genre: String,
    #[serde(
        default,
        alias = "releaseDate",
        alias = "releasedate",
        deserialize_with = "string_or_number_string"
    )]
    pub release_date: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub rating: String,
}

/// Normalized `get_series_info` response. Season labels are opaque strings
/// from the remote API; `IndexMap` keeps their insertion order, which is
/// the only ordering contract the command generator relies on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesDetail {
    #[serde(default)]
    pub info: SeriesInfoMeta,
    #[serde(default)]
    pub episodes: IndexMap<String, Vec<EpisodeEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieInfoMeta {
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub movie_image: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub plot: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub genre: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub cast: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub director: String,
    #[serde(
        default,
        alias = "releaseDate",
        alias = "releasedate",
        deserialize_with = "string_or_number_string"
    )]
    pub release_date: String,
    #[serde(default, deserialize_with = "string_or_number_string")]
    pub rating: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetail {
    #[serde(default)]
    pub info: MovieInfoMeta,
    #[serde(default)]
    pub movie_data: MovieEntry,
}

/// Common view over movie and series rows so search does not care which
/// catalog it filters.
pub trait CatalogEntry {
    fn entry_id(&self) -> &str;
    fn name(&self) -> &str;
    fn alternate_title(&self) -> Option<&str>;
    /// Timestamp source for the date lower-bound filter.
    fn added_raw(&self) -> Option<&str>;

    /// `name` if non-empty, else the alternate title, else a placeholder
    /// synthesized from the id.
    fn display_name(&self) -> String {
        if !self.name().is_empty() {
            return self.name().to_string();
        }
        match self.alternate_title() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.placeholder_name(),
        }
    }

    fn placeholder_name(&self) -> String;
}

impl CatalogEntry for MovieEntry {
    fn entry_id(&self) -> &str {
        &self.stream_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn alternate_title(&self) -> Option<&str> {
        self.alternate_title.as_deref()
    }

    fn added_raw(&self) -> Option<&str> {
        if self.added.is_empty() {
            None
        } else {
            Some(&self.added)
        }
    }

    fn placeholder_name(&self) -> String {
        format!("movie_{}", self.stream_id)
    }
}

impl CatalogEntry for SeriesEntry {
    fn entry_id(&self) -> &str {
        &self.series_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn alternate_title(&self) -> Option<&str> {
        self.alternate_title.as_deref()
    }

    fn added_raw(&self) -> Option<&str> {
        self.last_modified.as_deref().filter(|v| !v.is_empty())
    }

    fn placeholder_name(&self) -> String {
        format!("series_{}", self.series_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_entry_parses_mixed_id_types() {
        let raw = r#"{"stream_id": 42, "name": "A", "category_id": "7", "added": 1700000000, "cover": "x.png"}"#;
        let movie: MovieEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(movie.stream_id, "42");
        assert_eq!(movie.added, "1700000000");
        assert!(movie.extra.contains_key("cover"));
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let named: MovieEntry = serde_json::from_str(r#"{"stream_id": 1, "name": "N"}"#).unwrap();
        assert_eq!(named.display_name(), "N");

        let titled: MovieEntry =
            serde_json::from_str(r#"{"stream_id": 2, "name": "", "title": "T"}"#).unwrap();
        assert_eq!(titled.display_name(), "T");

        let bare: MovieEntry = serde_json::from_str(r#"{"stream_id": 3}"#).unwrap();
        assert_eq!(bare.display_name(), "movie_3");
    }

    #[test]
    fn test_series_detail_keeps_season_insertion_order() {
        let raw = r#"{
            "info": {"name": "Show", "rating": 7.5},
            "episodes": {
                "10": [{"id": "1", "episode_num": "1", "container_extension": "mkv"}],
                "2": [{"id": "2", "episode_num": 2}]
            }
        }"#;
        let detail: SeriesDetail = serde_json::from_str(raw).unwrap();
        let seasons: Vec<&String> = detail.episodes.keys().collect();
        assert_eq!(seasons, vec!["10", "2"]);
        assert_eq!(detail.episodes["10"][0].episode_num, 1);
        assert_eq!(detail.info.rating, "7.5");
    }

    #[test]
    fn test_episode_num_string_or_number() {
        let ep: EpisodeEntry =
            serde_json::from_str(r#"{"id": 9, "episode_num": "12", "title": null}"#).unwrap();
        assert_eq!(ep.episode_num, 12);
        assert_eq!(ep.title, None);
    }
}
