use std::collections::{HashMap, HashSet};

use crate::model::xtream_const::XC_DEFAULT_CONTAINER_EXTENSION;
use crate::model::{CatalogEntry, EpisodeEntry, MovieEntry, SeriesDetail, ServerCredential};

// Contract with the external downloader, reproduced verbatim.
const ARIA2C_BASE: &str = "aria2c --continue --max-connection-per-server=4 --split=4 --show-console-readout=true --user-agent=\"XCIPTV\"";

const FORBIDDEN_PATH_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces every character that is unsafe in a filesystem name with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_PATH_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

fn effective_extension(raw: &str) -> &str {
    if raw.is_empty() {
        XC_DEFAULT_CONTAINER_EXTENSION
    } else {
        raw
    }
}

/// Which episodes the user picked, keyed season label -> episode ids.
/// Lives outside the catalog entities; they are never mutated.
#[derive(Debug, Clone, Default)]
pub struct EpisodeSelection {
    selected: HashMap<String, HashSet<String>>,
}

impl EpisodeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, season: &str, episode_id: &str) {
        self.selected
            .entry(season.to_string())
            .or_default()
            .insert(episode_id.to_string());
    }

    pub fn select_all(detail: &SeriesDetail) -> Self {
        let mut selection = Self::new();
        for (season, episodes) in &detail.episodes {
            for episode in episodes {
                selection.select(season, &episode.id);
            }
        }
        selection
    }

    pub fn is_selected(&self, season: &str, episode_id: &str) -> bool {
        self.selected
            .get(season)
            .is_some_and(|ids| ids.contains(episode_id))
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(HashSet::is_empty)
    }
}

/// One download command line for a movie.
pub fn movie_command(server: &ServerCredential, movie: &MovieEntry) -> String {
    let extension = effective_extension(&movie.container_extension);
    let output_file = format!("{}.{extension}", sanitize_name(&movie.display_name()));
    let download_url = format!(
        "{}/movie/{}/{}/{}.{extension}",
        server.url.trim_end_matches('/'),
        server.username,
        server.password,
        movie.stream_id
    );
    format!("{ARIA2C_BASE} -o \"{output_file}\" \"{download_url}\"")
}

/// Download command lines for the selected episodes of one series, plus
/// the directory-creation lines when `create_folders` is set.
///
/// Output order follows the season insertion order of `detail` and the
/// episode insertion order within each season; nothing is re-sorted.
/// An empty selection yields an empty vec.
pub fn series_commands(
    server: &ServerCredential,
    detail: &SeriesDetail,
    series_name: &str,
    selection: &EpisodeSelection,
    create_folders: bool,
) -> Vec<String> {
    let picked: Vec<(&String, Vec<&EpisodeEntry>)> = detail
        .episodes
        .iter()
        .map(|(season, episodes)| {
            let chosen = episodes
                .iter()
                .filter(|episode| selection.is_selected(season, &episode.id))
                .collect::<Vec<_>>();
            (season, chosen)
        })
        .filter(|(_, chosen)| !chosen.is_empty())
        .collect();

    if picked.is_empty() {
        return Vec::new();
    }

    let sanitized_series = sanitize_name(series_name);
    let base_url = server.url.trim_end_matches('/');
    let mut commands = Vec::new();

    if create_folders {
        commands.push(format!("mkdir -p \"{sanitized_series}\""));
    }

    for (season, episodes) in picked {
        let season_dir = format!("{sanitized_series}/Season {season}");
        if create_folders {
            commands.push(format!("mkdir -p \"{season_dir}\""));
        }
        for episode in episodes {
            let extension = effective_extension(&episode.container_extension);
            let episode_code = format!("S{season}E{:02}", episode.episode_num);
            let download_url = format!(
                "{base_url}/series/{}/{}/{}.{extension}",
                server.username, server.password, episode.id
            );
            let command = if create_folders {
                format!(
                    "{ARIA2C_BASE} -d \"{season_dir}\" -o \"{episode_code}.{extension}\" \"{download_url}\""
                )
            } else {
                format!(
                    "{ARIA2C_BASE} -o \"{sanitized_series}_{episode_code}.{extension}\" \"{download_url}\""
                )
            };
            commands.push(command);
        }
    }
    commands
}
