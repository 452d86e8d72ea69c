//! Intelligent Value Index scoring.
//!
//! Each client is scored from its own members, claims, pre-authorizations and
//! calls only. The score blends three clamped sub-scores:
//!
//! * Health (35%): penalizes chronic prevalence, claim frequency and high-cost claims.
//! * Experience (35%): satisfaction, complaints, claim rejections, pre-auth approvals.
//! * Utilization (30%): distance of the loss ratio above the 70% target.

mod scorecard;
mod statistics;

pub use scorecard::{
    clamp_score, mean, round2, score_client, ComponentScores, IviScore, RiskCategory,
    EXPERIENCE_WEIGHT, HEALTH_WEIGHT, LOW_RISK_FLOOR, MEDIUM_RISK_FLOOR, TARGET_LOSS_RATIO,
    UTILIZATION_WEIGHT,
};
pub use statistics::{
    ClientStatistics, DEFAULT_PREAUTH_APPROVAL_RATE, DEFAULT_SATISFACTION,
    HIGH_COST_CLAIM_THRESHOLD, ZERO_PREMIUM_LOSS_RATIO,
};

use crate::workflows::dataset::{
    CallInteraction, Claim, CorporateClient, Member, PreAuthorization,
};
use std::collections::HashMap;

/// Scores every client in one pass over each table. Output order follows `clients`.
pub fn score_portfolio(
    clients: &[CorporateClient],
    members: &[Member],
    claims: &[Claim],
    preauths: &[PreAuthorization],
    calls: &[CallInteraction],
) -> Vec<IviScore> {
    let mut by_client: HashMap<&str, ClientStatistics> = clients
        .iter()
        .map(|client| (client.cont_no.as_str(), ClientStatistics::for_client(client)))
        .collect();

    for member in members {
        if let Some(stats) = by_client.get_mut(member.cont_no.as_str()) {
            stats.record_member(member);
        }
    }
    for claim in claims {
        if let Some(stats) = by_client.get_mut(claim.cont_no.as_str()) {
            stats.record_claim(claim);
        }
    }
    for preauth in preauths {
        if let Some(stats) = by_client.get_mut(preauth.cont_no.as_str()) {
            stats.record_preauth(preauth);
        }
    }
    for call in calls {
        if let Some(stats) = by_client.get_mut(call.cont_no.as_str()) {
            stats.record_call(call);
        }
    }

    clients
        .iter()
        .filter_map(|client| {
            by_client
                .get(client.cont_no.as_str())
                .map(|stats| score_client(client, stats))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_stats() -> ClientStatistics {
        ClientStatistics {
            premium_amount: 10_000_000,
            ..ClientStatistics::default()
        }
    }

    #[test]
    fn empty_client_has_full_health_and_defaults() {
        let stats = base_stats();
        assert_eq!(stats.chronic_rate(), 0.0);
        assert_eq!(stats.avg_claims_per_member(), 0.0);
        assert_eq!(stats.preauth_approval_rate(), 50.0);
        assert_eq!(stats.avg_satisfaction(), 3.0);

        let components = ComponentScores::from_statistics(&stats);
        assert_eq!(components.health, 100.0);
        // 3 * 20 + 50 * 0.3
        assert!((components.experience - 75.0).abs() < 1e-9);
        // zero approved claims: loss ratio 0 overshoots and clamps
        assert_eq!(components.utilization, 100.0);
    }

    #[test]
    fn target_loss_ratio_scores_full_utilization() {
        let stats = ClientStatistics {
            total_approved: 7_000_000.0,
            ..base_stats()
        };
        assert!((stats.loss_ratio() - 70.0).abs() < 1e-9);
        assert_eq!(ComponentScores::from_statistics(&stats).utilization, 100.0);
    }

    #[test]
    fn utilization_drops_two_points_per_loss_ratio_point() {
        let stats = ClientStatistics {
            total_approved: 8_000_000.0,
            ..base_stats()
        };
        let utilization = ComponentScores::from_statistics(&stats).utilization;
        assert!((utilization - 80.0).abs() < 1e-9);

        let ruinous = ClientStatistics {
            total_approved: 20_000_000.0,
            ..base_stats()
        };
        assert_eq!(ComponentScores::from_statistics(&ruinous).utilization, 0.0);
    }

    #[test]
    fn zero_premium_assumes_full_loss_ratio() {
        let stats = ClientStatistics::default();
        assert_eq!(stats.loss_ratio(), 100.0);
        assert!((ComponentScores::from_statistics(&stats).utilization - 40.0).abs() < 1e-9);
    }

    #[test]
    fn health_penalties_combine_and_clamp() {
        let stats = ClientStatistics {
            member_count: 10,
            chronic_members: 2,
            claim_count: 20,
            high_cost_claims: 4,
            ..base_stats()
        };
        // 100 - 20 - 2 * 5 - 20 * 0.5
        assert!((ComponentScores::from_statistics(&stats).health - 60.0).abs() < 1e-9);

        let heavy = ClientStatistics {
            member_count: 1,
            chronic_members: 1,
            claim_count: 30,
            ..base_stats()
        };
        assert_eq!(ComponentScores::from_statistics(&heavy).health, 0.0);
    }

    #[test]
    fn experience_uses_rates_and_clamps_overshoot() {
        let stats = ClientStatistics {
            member_count: 50,
            complaint_calls: 5,
            claim_count: 100,
            rejected_claims: 10,
            satisfaction_total: 16,
            satisfaction_responses: 4,
            preauth_count: 10,
            approved_preauths: 6,
            ..base_stats()
        };
        // 4 * 20 - 10 * 2 - 10 + 60 * 0.3
        assert!((ComponentScores::from_statistics(&stats).experience - 68.0).abs() < 1e-9);

        let delighted = ClientStatistics {
            member_count: 50,
            satisfaction_total: 5,
            satisfaction_responses: 1,
            preauth_count: 1,
            approved_preauths: 1,
            ..base_stats()
        };
        assert_eq!(ComponentScores::from_statistics(&delighted).experience, 100.0);
    }

    #[test]
    fn risk_category_steps_at_fifty_and_seventy() {
        assert_eq!(RiskCategory::from_score(100.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(70.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(69.99), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(50.0), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(49.99), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(0.0), RiskCategory::High);
    }

    #[test]
    fn risk_category_reads_the_unrounded_composite() {
        let components = ComponentScores {
            health: 69.996,
            experience: 69.996,
            utilization: 69.996,
        };
        assert_eq!(round2(components.composite()), 70.0);
        assert_eq!(components.risk_category(), RiskCategory::Medium);
    }

    #[test]
    fn risk_category_is_monotonic() {
        let mut previous = RiskCategory::from_score(0.0);
        for step in 0..=10_000 {
            let current = RiskCategory::from_score(step as f64 / 100.0);
            assert!(current >= previous, "category regressed at {}", step);
            previous = current;
        }
    }

    #[test]
    fn composite_weights_sum_to_one() {
        let components = ComponentScores {
            health: 80.0,
            experience: 60.0,
            utilization: 40.0,
        };
        assert!((HEALTH_WEIGHT + EXPERIENCE_WEIGHT + UTILIZATION_WEIGHT - 1.0).abs() < 1e-12);
        assert!((components.composite() - 61.0).abs() < 1e-9);
    }

    #[test]
    fn single_pass_matches_per_client_collection() {
        let dataset = crate::workflows::dataset::DatasetGenerator::new(5)
            .generate(None)
            .expect("generates");

        for (client, score) in dataset.clients.iter().zip(&dataset.scores) {
            let stats = ClientStatistics::collect(
                client,
                &dataset.members,
                &dataset.claims,
                &dataset.preauths,
                &dataset.calls,
            );
            assert_eq!(&score_client(client, &stats), score);
        }
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean([60.0, 80.0]), Some(70.0));
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(12.345_6), 12.35);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(70.0), 70.0);
    }
}
