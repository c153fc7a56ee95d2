use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use flagtour::validate;
use serde::{Deserialize, Serialize};

/// A named track as stored in a track file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Track {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    pub grid: Vec<Vec<String>>,
}

impl Track {
    /// Falls back to the id when the file gives no name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrackFile {
    Grid(Vec<Vec<String>>),
    Tracks { tracks: Vec<Track> },
}

/// Read every track in `path`: either `{ "tracks": [...] }` or a single bare grid, which is named after the file.
pub fn load(path: &Path) -> anyhow::Result<Vec<Track>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: TrackFile = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    Ok(match file {
        TrackFile::Grid(grid) => {
            let id = path.file_stem().map_or_else(|| "track".to_owned(), |stem| stem.to_string_lossy().into_owned());
            vec![Track { id, name: None, grid }]
        }
        TrackFile::Tracks { tracks } => tracks,
    })
}

/// [`load`], failing on the first track that does not validate.
pub fn load_validated(path: &Path) -> anyhow::Result<Vec<Track>> {
    let tracks = load(path)?;
    for track in &tracks {
        let validation = validate(&track.grid);
        if !validation.valid {
            bail!("invalid track '{}': {}", track.id, validation.message);
        }
    }

    Ok(tracks)
}

/// The track called `id`, or every track when `id` is [`None`].
pub fn select(tracks: Vec<Track>, id: Option<&str>) -> anyhow::Result<Vec<Track>> {
    let Some(id) = id else {
        return Ok(tracks);
    };

    match tracks.into_iter().find(|track| track.id == id) {
        Some(track) => Ok(vec![track]),
        None => bail!("no track with id '{id}'"),
    }
}
