//! FASTA reader for reference genomes.
//!
//! Only the first record is used: its identifier becomes the genome id and
//! its bases, upper-cased and restricted to `A/C/G/T/N`, become the sequence.
//!
//! ## FASTA Format
//!
//! ```text
//! >chromosome_1 optional description
//! ACGTACGTACGT...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// Identifier used when the header is empty.
pub const UNKNOWN_GENOME_ID: &str = "unknown_genome";

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA file: missing '>' header")]
    MissingHeader,

    #[error("Empty or invalid sequence after cleanup")]
    EmptySequence,
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// The first record of a FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub sequence: String,
}

/// Reads the first record of a FASTA file.
///
/// # Examples
///
/// ```no_run
/// use genoview::formats::fasta::read_fasta_file;
///
/// let record = read_fasta_file("genome.fna").unwrap();
/// println!("{}: {} bp", record.id, record.sequence.len());
/// ```
pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<FastaRecord> {
    let file = File::open(path)?;
    read_fasta(BufReader::new(file))
}

/// Reads the first record from a reader.
///
/// Handles single-line and multi-line sequences; blank lines are skipped.
pub fn read_fasta<R: BufRead>(reader: R) -> FastaResult<FastaRecord> {
    let mut header: Option<String> = None;
    let mut sequence = String::new();
    let mut saw_content = false;

    for line_result in reader.lines() {
        let line = line_result?;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        match (&header, line.strip_prefix('>')) {
            (None, Some(rest)) => {
                header = Some(rest.trim().to_string());
            }
            (None, None) => {
                saw_content = true;
                break;
            }
            // Next record: only the first one is kept.
            (Some(_), Some(_)) => break,
            (Some(_), None) => {
                sequence.extend(
                    line.chars()
                        .map(|c| c.to_ascii_uppercase())
                        .filter(|c| matches!(c, 'A' | 'C' | 'G' | 'T' | 'N')),
                );
            }
        }
    }

    let Some(header) = header else {
        return Err(if saw_content {
            FastaError::MissingHeader
        } else {
            FastaError::EmptyFile
        });
    };

    if sequence.is_empty() {
        return Err(FastaError::EmptySequence);
    }

    // Identifier is everything before the first space
    let id = header
        .split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_GENOME_ID.to_string());

    sequence.shrink_to_fit();
    Ok(FastaRecord { id, sequence })
}

/// Reads the first record from a string.
pub fn read_fasta_str(content: &str) -> FastaResult<FastaRecord> {
    read_fasta(content.as_bytes())
}
