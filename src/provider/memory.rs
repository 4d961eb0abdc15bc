//! In-memory genome provider.
//!
//! Holds one genome (sequence + annotations) loaded from FASTA and GFF3 and
//! answers every query by scanning it. Features are returned in genomic
//! coordinates.

use std::path::Path;

use crate::formats::{self, LoadResult};
use crate::model::Feature;
use crate::projection::FeatureRecord;

use super::{GenomeInfo, GenomeProvider, ProviderError, ProviderResult};

/// A loaded genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    pub id: String,
    pub sequence: String,
    pub features: Vec<Feature>,
}

impl Genome {
    pub fn len(&self) -> u64 {
        self.sequence.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    genome: Option<Genome>,
}

impl MemoryProvider {
    /// A provider with nothing loaded; every query fails with `NoActiveGenome`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(genome: Genome) -> Self {
        Self {
            genome: Some(genome),
        }
    }

    /// Loads a genome from a FASTA file and optional GFF3 annotations.
    pub fn from_files<P: AsRef<Path>>(fasta: P, gff: Option<P>) -> LoadResult<Self> {
        Ok(Self::new(formats::load_genome(fasta, gff)?))
    }

    /// Loads a genome from in-memory FASTA and GFF3 text.
    pub fn from_content(fasta: &str, gff: Option<&str>) -> LoadResult<Self> {
        Ok(Self::new(formats::load_genome_from_content(fasta, gff)?))
    }

    pub fn genome(&self) -> Option<&Genome> {
        self.genome.as_ref()
    }

    fn active(&self) -> ProviderResult<&Genome> {
        self.genome.as_ref().ok_or(ProviderError::NoActiveGenome)
    }
}

impl GenomeProvider for MemoryProvider {
    fn genome_info(&self) -> ProviderResult<GenomeInfo> {
        let genome = self.active()?;
        Ok(GenomeInfo {
            id: genome.id.clone(),
            length: genome.len(),
            has_annotations: !genome.features.is_empty(),
        })
    }

    fn query_features_in_window(
        &self,
        start: u64,
        end: u64,
        _canvas_width_px: u32,
    ) -> ProviderResult<Vec<FeatureRecord>> {
        let genome = self.active()?;
        let end = end.min(genome.len());
        Ok(genome
            .features
            .iter()
            .filter(|f| !(f.end < start || f.start > end))
            .cloned()
            .map(FeatureRecord::Genomic)
            .collect())
    }

    fn query_feature_by_name(&self, name: &str) -> ProviderResult<Option<Feature>> {
        let genome = self.active()?;
        let wanted = name.trim().to_lowercase();
        Ok(genome
            .features
            .iter()
            .find(|f| f.name.to_lowercase() == wanted)
            .cloned())
    }

    fn query_full_feature_list(&self) -> ProviderResult<Vec<Feature>> {
        Ok(self.active()?.features.clone())
    }

    fn query_sequence_slice(&self, start: u64, end: u64) -> ProviderResult<String> {
        let genome = self.active()?;
        let start = start.min(genome.len()) as usize;
        let end = end.min(genome.len()) as usize;
        if end <= start {
            return Ok(String::new());
        }
        Ok(genome.sequence[start..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureType, Strand};

    fn provider() -> MemoryProvider {
        MemoryProvider::new(Genome {
            id: "chr1".into(),
            sequence: "ACGTACGTAC".repeat(100),
            features: vec![
                Feature::new(FeatureType::Gene, "alpha", 10, 200, Strand::Forward),
                Feature::new(FeatureType::Cds, "beta", 300, 400, Strand::Reverse),
                Feature::new(FeatureType::Gene, "Gamma", 900, 1000, Strand::Forward),
            ],
        })
    }

    #[test]
    fn test_genome_info() {
        let info = provider().genome_info().unwrap();
        assert_eq!(info.id, "chr1");
        assert_eq!(info.length, 1000);
        assert!(info.has_annotations);
    }

    #[test]
    fn test_features_in_window() {
        let records = provider().query_features_in_window(150, 350, 800).unwrap();
        let names: Vec<String> = records
            .iter()
            .map(|r| match r {
                FeatureRecord::Genomic(f) => f.name.clone(),
                FeatureRecord::Scaled { feature, .. } => feature.name.clone(),
            })
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_feature_by_name_is_case_insensitive() {
        let p = provider();
        assert_eq!(p.query_feature_by_name(" gamma ").unwrap().unwrap().start, 900);
        assert!(p.query_feature_by_name("delta").unwrap().is_none());
    }

    #[test]
    fn test_sequence_slice_is_clamped() {
        let p = provider();
        assert_eq!(p.query_sequence_slice(0, 4).unwrap(), "ACGT");
        assert_eq!(p.query_sequence_slice(998, 5000).unwrap(), "AC");
        assert_eq!(p.query_sequence_slice(50, 10).unwrap(), "");
    }

    #[test]
    fn test_empty_provider_errors() {
        let p = MemoryProvider::empty();
        assert_eq!(p.genome_info(), Err(ProviderError::NoActiveGenome));
        assert_eq!(p.query_full_feature_list(), Err(ProviderError::NoActiveGenome));
    }
}
