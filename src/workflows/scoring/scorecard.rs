use super::statistics::ClientStatistics;
use crate::workflows::dataset::CorporateClient;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HEALTH_WEIGHT: f64 = 0.35;
pub const EXPERIENCE_WEIGHT: f64 = 0.35;
pub const UTILIZATION_WEIGHT: f64 = 0.30;

/// Loss ratio at which utilization scores a full 100.
pub const TARGET_LOSS_RATIO: f64 = 70.0;

pub const LOW_RISK_FLOOR: f64 = 70.0;
pub const MEDIUM_RISK_FLOOR: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    High,
    Medium,
    Low,
}

impl RiskCategory {
    /// Most to least urgent.
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    pub fn from_score(score: f64) -> Self {
        if score >= LOW_RISK_FLOOR {
            Self::Low
        } else if score >= MEDIUM_RISK_FLOOR {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrounded sub-scores, each already clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub health: f64,
    pub experience: f64,
    pub utilization: f64,
}

impl ComponentScores {
    pub fn from_statistics(stats: &ClientStatistics) -> Self {
        let health = 100.0
            - stats.chronic_rate()
            - stats.avg_claims_per_member() * 5.0
            - stats.high_cost_claim_rate() * 0.5;

        // Not weight-normalized: high satisfaction with few complaints overshoots and is clamped.
        let experience = stats.avg_satisfaction() * 20.0
            - stats.complaint_rate() * 2.0
            - stats.rejection_rate()
            + stats.preauth_approval_rate() * 0.3;

        let utilization = 100.0 - (stats.loss_ratio() - TARGET_LOSS_RATIO) * 2.0;

        Self {
            health: clamp_score(health),
            experience: clamp_score(experience),
            utilization: clamp_score(utilization),
        }
    }

    pub fn composite(&self) -> f64 {
        self.health * HEALTH_WEIGHT
            + self.experience * EXPERIENCE_WEIGHT
            + self.utilization * UTILIZATION_WEIGHT
    }

    /// Classifies the unrounded composite, so a client at 69.996 stays Medium
    /// even though it reports as 70.
    pub fn risk_category(&self) -> RiskCategory {
        RiskCategory::from_score(self.composite())
    }
}

/// Output row per client, as written to `ivi_scores.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IviScore {
    #[serde(rename = "CONT_NO")]
    pub cont_no: String,
    #[serde(rename = "COMPANY_NAME")]
    pub company_name: String,
    #[serde(rename = "SECTOR")]
    pub sector: String,
    #[serde(rename = "REGION")]
    pub region: String,
    #[serde(rename = "EMPLOYEE_COUNT")]
    pub employee_count: usize,
    #[serde(rename = "TOTAL_CLAIMS")]
    pub total_claims: usize,
    #[serde(rename = "TOTAL_CLAIMED")]
    pub total_claimed: u64,
    #[serde(rename = "TOTAL_APPROVED")]
    pub total_approved: f64,
    #[serde(rename = "H_SCORE")]
    pub h_score: f64,
    #[serde(rename = "E_SCORE")]
    pub e_score: f64,
    #[serde(rename = "U_SCORE")]
    pub u_score: f64,
    #[serde(rename = "IVI_SCORE")]
    pub ivi_score: f64,
    #[serde(rename = "RISK_CATEGORY")]
    pub risk_category: RiskCategory,
    #[serde(rename = "CHRONIC_RATE")]
    pub chronic_rate: f64,
    #[serde(rename = "COMPLAINT_RATE")]
    pub complaint_rate: f64,
    #[serde(rename = "REJECTION_RATE")]
    pub rejection_rate: f64,
    #[serde(rename = "LOSS_RATIO")]
    pub loss_ratio: f64,
}

/// Scores one client. Both the composite and the risk category come from
/// unrounded components; rounding applies to the reported values only.
pub fn score_client(client: &CorporateClient, stats: &ClientStatistics) -> IviScore {
    let components = ComponentScores::from_statistics(stats);
    let ivi_score = round2(components.composite());

    IviScore {
        cont_no: client.cont_no.clone(),
        company_name: client.company_name.clone(),
        sector: client.sector.clone(),
        region: client.region.clone(),
        employee_count: stats.member_count,
        total_claims: stats.claim_count,
        total_claimed: stats.total_claimed,
        total_approved: round2(stats.total_approved),
        h_score: round2(components.health),
        e_score: round2(components.experience),
        u_score: round2(components.utilization),
        ivi_score,
        risk_category: components.risk_category(),
        chronic_rate: round2(stats.chronic_rate()),
        complaint_rate: round2(stats.complaint_rate()),
        rejection_rate: round2(stats.rejection_rate()),
        loss_ratio: round2(stats.loss_ratio()),
    }
}

pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean, or `None` for an empty sequence.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}
