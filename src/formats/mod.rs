//! Genome file loading.
//!
//! Builds an in-memory [`Genome`] from:
//! - FASTA (.fna, .fa, .fasta): the first record is the reference sequence
//! - GFF3 (.gff, .gff3): optional annotations
//!
//! Feature coordinates are not checked against the sequence length; features
//! past the end are simply never inside a window.

pub mod fasta;
pub mod gff;

use std::path::Path;

use thiserror::Error;

use crate::provider::memory::Genome;

/// Errors that can occur while loading a genome.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("FASTA error: {0}")]
    FastaError(#[from] fasta::FastaError),

    #[error("GFF error: {0}")]
    GffError(#[from] gff::GffError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Loads a genome from a FASTA file and optional GFF3 file.
pub fn load_genome<P: AsRef<Path>>(fasta_path: P, gff_path: Option<P>) -> LoadResult<Genome> {
    let record = fasta::read_fasta_file(&fasta_path)?;
    let features = match gff_path {
        Some(path) => gff::read_gff_file(path)?,
        None => Vec::new(),
    };
    log::info!(
        "Loaded genome {} ({} bp, {} features) from {}",
        record.id,
        record.sequence.len(),
        features.len(),
        fasta_path.as_ref().display()
    );
    Ok(Genome {
        id: record.id,
        sequence: record.sequence,
        features,
    })
}

/// Loads a genome from FASTA and optional GFF3 text.
pub fn load_genome_from_content(fasta_text: &str, gff_text: Option<&str>) -> LoadResult<Genome> {
    let record = fasta::read_fasta_str(fasta_text)?;
    let features = gff_text.map(gff::read_gff_str).unwrap_or_default();
    Ok(Genome {
        id: record.id,
        sequence: record.sequence,
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_content() {
        let genome = load_genome_from_content(
            ">chrT test\nACGTACGTAC\n",
            Some("chrT\t.\tgene\t2\t8\t.\t+\t.\tName=tst\n"),
        )
        .unwrap();
        assert_eq!(genome.id, "chrT");
        assert_eq!(genome.len(), 10);
        assert_eq!(genome.features.len(), 1);
        assert_eq!(genome.features[0].name, "tst");
    }

    #[test]
    fn test_load_without_annotations() {
        let genome = load_genome_from_content(">c\nAC\n", None).unwrap();
        assert!(genome.features.is_empty());
    }

    #[test]
    fn test_load_invalid_fasta() {
        let result = load_genome_from_content("no header\n", None);
        assert!(matches!(result, Err(LoadError::FastaError(_))));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let fna = dir.path().join("g.fna");
        let gff = dir.path().join("g.gff");
        std::fs::write(&fna, ">g1\nAAAACCCCGGGGTTTT\n").unwrap();
        std::fs::write(&gff, "g1\t.\tCDS\t3\t9\t.\t-\t0\tID=c1\n").unwrap();

        let genome = load_genome(&fna, Some(&gff)).unwrap();
        assert_eq!(genome.id, "g1");
        assert_eq!(genome.features[0].name, "c1");
    }

    #[test]
    fn test_missing_gff_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let fna = dir.path().join("g.fna");
        std::fs::write(&fna, ">g1\nACGT\n").unwrap();
        let missing = dir.path().join("absent.gff");
        assert!(matches!(
            load_genome(&fna, Some(&missing)),
            Err(LoadError::GffError(_))
        ));
    }
}
