use serde::{Deserialize, Serialize};

use crate::{CanonicalProduct, MappingOutcome, RejectionReason};

/// A record that failed mapping, identified for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub record_identifier: String,
    pub reason: RejectionReason,
}

/// Final tally of one feed run.
///
/// Only [`ReportBuilder::finish`] produces a report, so a `MappingReport`
/// always describes a run whose record loop completed.
/// `mapped_count + rejections.len() + structural_skips == total_records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    /// Every parsed unit, including structural skips.
    pub total_records: usize,
    pub mapped_count: usize,
    /// Units dropped before mapping because they lacked the fields needed to
    /// even attempt it.
    pub structural_skips: usize,
    pub rejections: Vec<Rejection>,
    /// Mapped products in feed order.
    pub products: Vec<CanonicalProduct>,
}

impl MappingReport {
    /// Report for a feed whose body was empty.
    #[must_use]
    pub fn empty() -> Self {
        ReportBuilder::default().finish()
    }

    /// The one-line result message handed back to callers.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Mapped {} products successfully.", self.mapped_count)
    }
}

/// Accumulates outcomes in parse order while a run is in progress.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    total_records: usize,
    structural_skips: usize,
    rejections: Vec<Rejection>,
    products: Vec<CanonicalProduct>,
}

impl ReportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skip(&mut self) {
        self.total_records += 1;
        self.structural_skips += 1;
    }

    pub fn record_outcome(&mut self, outcome: MappingOutcome) {
        self.total_records += 1;
        match outcome {
            MappingOutcome::Mapped(product) => self.products.push(product),
            MappingOutcome::Rejected { record, reason } => self.rejections.push(Rejection {
                record_identifier: record.identifier(),
                reason,
            }),
        }
    }

    #[must_use]
    pub fn finish(self) -> MappingReport {
        MappingReport {
            total_records: self.total_records,
            mapped_count: self.products.len(),
            structural_skips: self.structural_skips,
            rejections: self.rejections,
            products: self.products,
        }
    }
}
