//! Synthetic healthcare-insurance portfolio: entity tables, the seeded
//! generator that builds them, and the writer that lays them out on disk.

pub mod catalog;
pub mod domain;
mod generator;
mod writer;

pub use domain::{
    CallInteraction, CallStatus, CallType, Claim, ClaimStatus, CorporateClient, Gender, Member,
    MemberStatus, PortfolioSummary, PreAuthStatus, PreAuthorization, Provider,
};
pub use generator::{DatasetGenerator, GenerationProfile};
pub use writer::{DatasetManifest, DatasetWriter, DATASET_WORKBOOK, SUMMARY_FILE};

use crate::config::GenerationConfig;
use crate::tabular::TableError;
use crate::workflows::roster::{ProviderRosterImporter, RosterImportError};
use crate::workflows::scoring::{mean, round2, IviScore};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("provider roster is empty; claims cannot reference a provider")]
    EmptyRoster,
    #[error("year {year} cannot be represented as a calendar date")]
    InvalidCalendar { year: i32 },
    #[error(transparent)]
    Roster(#[from] RosterImportError),
    #[error("failed to write dataset: {0}")]
    Output(#[from] TableError),
}

/// Every table produced by one generation run. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub clients: Vec<CorporateClient>,
    pub members: Vec<Member>,
    pub providers: Vec<Provider>,
    pub claims: Vec<Claim>,
    pub preauths: Vec<PreAuthorization>,
    pub calls: Vec<CallInteraction>,
    pub scores: Vec<IviScore>,
}

impl Dataset {
    pub fn summary(&self, generated_at: DateTime<Utc>) -> PortfolioSummary {
        let mut risk_distribution = BTreeMap::new();
        for score in &self.scores {
            *risk_distribution
                .entry(score.risk_category.label().to_string())
                .or_insert(0) += 1;
        }

        let avg_ivi_score = mean(self.scores.iter().map(|score| score.ivi_score)).unwrap_or(0.0);

        let approved_claims = self
            .claims
            .iter()
            .filter(|claim| claim.status == ClaimStatus::Approved)
            .count();
        let approved_preauths = self
            .preauths
            .iter()
            .filter(|preauth| preauth.status == PreAuthStatus::Approved)
            .count();

        let total_approved: f64 = self.claims.iter().map(|claim| claim.approved_amount).sum();

        PortfolioSummary {
            total_companies: self.clients.len(),
            total_members: self.members.len(),
            total_claims: self.claims.len(),
            total_preauths: self.preauths.len(),
            total_calls: self.calls.len(),
            total_providers: self.providers.len(),
            avg_ivi_score: round2(avg_ivi_score),
            risk_distribution,
            total_claimed_amount: self.claims.iter().map(|claim| claim.claimed_amount).sum(),
            total_approved_amount: total_approved.trunc() as u64,
            claim_approval_rate: round2(share(approved_claims, self.claims.len())),
            preauth_approval_rate: round2(share(approved_preauths, self.preauths.len())),
            avg_satisfaction: mean(
                self.calls
                    .iter()
                    .filter_map(|call| call.satisfaction_score.map(f64::from)),
            )
            .map(round2),
            generated_at,
        }
    }
}

/// Where the provider roster of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    External(std::path::PathBuf),
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub seed: u64,
    pub roster_source: RosterSource,
    pub dataset: Dataset,
    pub summary: PortfolioSummary,
    pub manifest: DatasetManifest,
}

/// Loads the configured roster, generates the portfolio and writes it to the data directory.
pub fn run(
    config: &GenerationConfig,
    generated_at: DateTime<Utc>,
) -> Result<GenerationReport, GenerationError> {
    let (roster, roster_source) = match &config.provider_roster {
        Some(path) => {
            let providers = ProviderRosterImporter::from_path(path)?;
            info!(path = %path.display(), count = providers.len(), "loaded provider roster");
            (Some(providers), RosterSource::External(path.clone()))
        }
        None => (None, RosterSource::Synthetic),
    };

    let dataset = DatasetGenerator::new(config.seed).generate(roster)?;
    let summary = dataset.summary(generated_at);
    let manifest = DatasetWriter::new(&config.data_dir).write(&dataset, &summary)?;
    info!(
        directory = %manifest.directory.display(),
        files = manifest.files.len(),
        "dataset written"
    );

    Ok(GenerationReport {
        seed: config.seed,
        roster_source,
        dataset,
        summary,
        manifest,
    })
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
