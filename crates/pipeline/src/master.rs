//! The merged, one-row-per-nominee master table.

use crate::features::EngineeredFeatures;
use crate::matcher::MatchStats;
use data_loader::{NomineeRecord, ReviewRecord};
use std::collections::BTreeMap;

/// Dense award flags after the merge has filled absence with 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AwardFlags {
    pub won: u8,
    pub nominated: u8,
}

/// One nominee with everything joined onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterRow {
    pub nominee: NomineeRecord,
    /// `None` when the review lookup had no row for this nominee
    pub review: Option<ReviewRecord>,
    /// One entry for every award column of the table, filled with 0
    pub awards: BTreeMap<String, AwardFlags>,
    pub features: EngineeredFeatures,
}

impl MasterRow {
    pub fn new(nominee: NomineeRecord, review: Option<ReviewRecord>) -> Self {
        Self {
            nominee,
            review,
            awards: BTreeMap::new(),
            features: EngineeredFeatures::default(),
        }
    }

    pub fn award(&self, award: &str) -> AwardFlags {
        self.awards.get(award).copied().unwrap_or_default()
    }
}

/// What happened during a build, for logging and the CLI summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub nominees: usize,
    pub reviews_joined: usize,
    /// Review rows with no nominee to attach to
    pub reviews_dropped: usize,
    pub mentions_in: usize,
    pub mentions_discarded: usize,
    pub pivot_rows: usize,
    pub matching: MatchStats,
    /// Matched rows folded into another spelling of the same nominee
    pub spellings_coalesced: usize,
    /// Nominees that received at least one award row
    pub nominees_with_awards: usize,
}

/// The finished dataset.
#[derive(Debug, Clone, Default)]
pub struct MasterTable {
    /// Award ids in column order
    pub award_columns: Vec<String>,
    pub rows: Vec<MasterRow>,
    pub report: MergeReport,
}

impl MasterTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
