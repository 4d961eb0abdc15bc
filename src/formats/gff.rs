//! GFF3 annotation reader.
//!
//! Reads feature lines (nine tab-separated columns) into [`Feature`]s mapped
//! onto the browser's track types. Comment, blank and malformed lines are
//! skipped rather than rejected. Coordinates are kept as written (1-based,
//! closed); features come back sorted by `(start, end)`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::model::{Feature, FeatureType, Strand};

/// Longest name kept after sanitising.
const MAX_NAME_LEN: usize = 64;
/// How much of the attribute column is used when no name key is present.
const FALLBACK_NAME_LEN: usize = 32;
/// Attribute keys tried for a display name, in priority order.
const NAME_KEYS: [&str; 4] = ["Name", "gene", "locus_tag", "ID"];

#[derive(Error, Debug)]
pub enum GffError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),
}

pub type GffResult<T> = Result<T, GffError>;

/// Maps a GFF type column onto a track type.
pub fn map_feature_type(raw: &str) -> FeatureType {
    match raw.trim().to_lowercase().as_str() {
        "gene" => FeatureType::Gene,
        "cds" => FeatureType::Cds,
        "mrna" | "transcript" => FeatureType::Mrna,
        _ => FeatureType::Regulatory,
    }
}

/// Reads annotations from a GFF3 file.
pub fn read_gff_file<P: AsRef<Path>>(path: P) -> GffResult<Vec<Feature>> {
    let file = File::open(path)?;
    read_gff(BufReader::new(file))
}

/// Reads annotations from GFF3 text.
pub fn read_gff_str(content: &str) -> Vec<Feature> {
    sort_by_position(content.lines().filter_map(parse_line).collect())
}

/// Reads annotations from a reader.
pub fn read_gff<R: BufRead>(reader: R) -> GffResult<Vec<Feature>> {
    let mut features = Vec::new();
    for line in reader.lines() {
        if let Some(feature) = parse_line(&line?) {
            features.push(feature);
        }
    }
    Ok(sort_by_position(features))
}

fn sort_by_position(mut features: Vec<Feature>) -> Vec<Feature> {
    features.sort_by_key(|f| (f.start, f.end));
    features
}

fn parse_line(line: &str) -> Option<Feature> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 9 {
        log::trace!("Skipping GFF line with {} columns", parts.len());
        return None;
    }

    let mut start: u64 = parts[3].trim().parse().ok()?;
    let mut end: u64 = parts[4].trim().parse().ok()?;
    if start < 1 || end < 1 {
        return None;
    }
    if end < start {
        std::mem::swap(&mut start, &mut end);
    }

    let strand = match Strand::parse(parts[6]) {
        Strand::Unstranded => Strand::Forward,
        s => s,
    };

    Some(Feature::new(
        map_feature_type(parts[2]),
        name_from_attributes(parts[8]),
        start,
        end,
        strand,
    ))
}

/// Picks a display name from a GFF attribute column.
pub fn name_from_attributes(attributes: &str) -> String {
    let value_of = |key: &str| {
        attributes.split(';').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            let v = v.trim();
            (k.trim() == key && !v.is_empty()).then_some(v)
        })
    };

    match NAME_KEYS.iter().find_map(|&key| value_of(key)) {
        Some(value) => sanitize_label(value),
        None => sanitize_label(&attributes.chars().take(FALLBACK_NAME_LEN).collect::<String>()),
    }
}

/// Keeps `[A-Za-z0-9_.-]`, truncated; `unknown` if nothing is left.
pub fn sanitize_label(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .take(MAX_NAME_LEN)
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
