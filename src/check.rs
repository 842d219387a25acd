//! Asset checker
//!
//! Authoring aid behind `wallcast check`. The page itself never validates
//! its data; this module is where a site author finds out, before
//! publishing, that a clip is missing or a scenario uses an unknown
//! context.
//!
//! # What gets checked
//!
//! 1. **Audio-refs**: every clip the data file points at must exist under
//!    the site root and be decodable (probed with symphonia, the same way
//!    the browser will need to play it). Remote URLs are skipped.
//! 2. **Contexts**: each scenario context should be one of the five known
//!    categories, otherwise its impact cell is blank and it sorts last.
//! 3. **Orphans**: audio files under `assets/` that nothing references.
//!
//! Probing runs in parallel (rayon); findings come back in data-file order.

use crate::catalog;
use crate::loader::{self, DirFetcher, Fetcher, LoadError};
use crate::model::{AudioData, AudioRef};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use walkdir::WalkDir;

/// Extensions treated as audio when looking for orphans.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "flac", "wav", "wave", "aiff", "aif", "mp3", "m4a", "aac", "ogg", "opus", "webm",
];

/// Error type for the checker itself (not for problems it finds)
#[derive(Debug)]
pub enum CheckError {
    Load(LoadError),
    Io(std::io::Error),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Load(e) => write!(f, "Could not load data: {}", e),
            CheckError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<LoadError> for CheckError {
    fn from(e: LoadError) -> Self {
        CheckError::Load(e)
    }
}

impl From<std::io::Error> for CheckError {
    fn from(e: std::io::Error) -> Self {
        CheckError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;

/// Stream parameters read from a clip's container.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaInfo {
    pub sample_rate: Option<u32>,
    pub channels: Option<usize>,
    pub duration_secs: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    EmptyRef { origin: String },
    Missing { origin: String, src: String },
    Undecodable { origin: String, src: String, reason: String },
    UnknownContext { context: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::EmptyRef { origin } => write!(f, "empty audio-ref at {}", origin),
            Finding::Missing { origin, src } => write!(f, "missing {} ({})", src, origin),
            Finding::Undecodable { origin, src, reason } => {
                write!(f, "undecodable {} ({}): {}", src, origin, reason)
            }
            Finding::UnknownContext { context } => {
                write!(f, "unknown scenario context '{}' (no impact, sorts last)", context)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub refs_checked: usize,
    pub remote_skipped: usize,
    pub findings: Vec<Finding>,
    /// Audio files under `assets/` with no reference, relative to the root.
    pub orphans: Vec<PathBuf>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.orphans.is_empty()
    }
}

/// Load the data file under `root` and check it.
pub fn check_site(root: &Path, data_path: &str, progress: Option<&ProgressBar>) -> Result<CheckReport> {
    let body = DirFetcher::new(root).fetch(data_path)?;
    let data = loader::parse(&body)?;
    check_data(root, &data, progress)
}

pub fn check_data(root: &Path, data: &AudioData, progress: Option<&ProgressBar>) -> Result<CheckReport> {
    let refs = data.audio_refs();
    if let Some(pb) = progress {
        pb.set_length(refs.len() as u64);
    }

    let mut report = CheckReport::default();
    let mut referenced = HashSet::new();
    let mut local = Vec::new();

    for r in &refs {
        if is_remote(r.src) {
            report.remote_skipped += 1;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            continue;
        }
        if let Some(rel) = normalize_ref(r.src) {
            referenced.insert(rel);
        }
        local.push(r);
    }
    report.refs_checked = local.len();

    let results: Vec<Option<Finding>> = local
        .par_iter()
        .map(|r| {
            let finding = check_ref(root, r);
            if let Some(pb) = progress {
                pb.inc(1);
                pb.set_message(r.src.to_string());
            }
            finding
        })
        .collect();
    report.findings.extend(results.into_iter().flatten());

    let mut seen = HashSet::new();
    for scenario in &data.case3.scenarios {
        if !catalog::is_known(&scenario.context) && seen.insert(scenario.context.as_str()) {
            report.findings.push(Finding::UnknownContext { context: scenario.context.clone() });
        }
    }

    report.orphans = find_orphans(root, &referenced);
    Ok(report)
}

fn check_ref(root: &Path, r: &AudioRef<'_>) -> Option<Finding> {
    let rel = match normalize_ref(r.src) {
        Some(rel) => rel,
        None if r.src.trim().is_empty() => return Some(Finding::EmptyRef { origin: r.origin.clone() }),
        None => {
            return Some(Finding::Missing { origin: r.origin.clone(), src: r.src.to_string() });
        }
    };

    let path = root.join(&rel);
    if !path.is_file() {
        return Some(Finding::Missing { origin: r.origin.clone(), src: r.src.to_string() });
    }

    match probe_media(&path) {
        Ok(_) => None,
        Err(reason) => Some(Finding::Undecodable {
            origin: r.origin.clone(),
            src: r.src.to_string(),
            reason,
        }),
    }
}

/// Probe a clip's container and make sure a decoder exists for its track.
pub fn probe_media(path: &Path) -> std::result::Result<MediaInfo, String> {
    let file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| e.to_string())?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| "no audio track".to_string())?;

    symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| e.to_string())?;

    let params = &track.codec_params;
    let duration_secs = match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Some(frames as f64 / rate as f64),
        _ => None,
    };

    Ok(MediaInfo {
        sample_rate: params.sample_rate,
        channels: params.channels.map(|c| c.count()),
        duration_secs,
    })
}

fn is_remote(src: &str) -> bool {
    let lower = src.trim().to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("data:")
}

/// Site-relative path of a local audio-ref, or `None` if it can't name a
/// file inside the root (empty, or escapes with `..`).
pub fn normalize_ref(src: &str) -> Option<PathBuf> {
    let trimmed = src.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or("");
    let relative = without_query.trim_start_matches("./").trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let mut out = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

fn find_orphans(root: &Path, referenced: &HashSet<PathBuf>) -> Vec<PathBuf> {
    let assets = root.join("assets");
    if !assets.is_dir() {
        return Vec::new();
    }

    let mut orphans: Vec<PathBuf> = WalkDir::new(&assets)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .filter(|rel| !referenced.contains(rel))
        .collect();
    orphans.sort();
    orphans
}
