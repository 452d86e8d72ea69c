use super::catalog::{
    Benefit, CallCategory, SensitiveMedication, BENEFITS, CALL_CATEGORIES, CHRONIC_CONDITIONS,
    CITIES, CLAIM_REJECTION_REASONS, COMPANY_NAMES, ICD_CODES, MARITAL_STATUSES, NATIONALITIES,
    NETWORKS, PREAUTH_DOCUMENTS, PREAUTH_REJECTION_REASONS, PROVIDER_PRACTICES, REGIONS, SECTORS,
    SENSITIVE_MEDICATIONS,
};
use super::domain::{
    CallInteraction, CallStatus, CallType, Claim, ClaimStatus, CorporateClient, Gender, Member,
    MemberStatus, PreAuthStatus, PreAuthorization, Provider,
};
use super::{Dataset, GenerationError};
use crate::workflows::scoring::{round2, score_portfolio};
use chrono::{Duration, NaiveDate};
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Volumes and calendar used for one synthetic portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationProfile {
    /// Claims, pre-auths and calls fall within this calendar year.
    pub activity_year: i32,
    /// Every contract ends on December 31st of this year.
    pub contract_end_year: i32,
    pub members_per_client: RangeInclusive<u32>,
    /// Share of members drawn for one pre-authorization each.
    pub preauth_share: f64,
    /// Share of members drawn for one to five calls each.
    pub call_share: f64,
    /// Roster size when no external roster is supplied.
    pub synthetic_providers: usize,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            activity_year: 2024,
            contract_end_year: 2025,
            members_per_client: 50..=200,
            preauth_share: 0.3,
            call_share: 0.4,
            synthetic_providers: 120,
        }
    }
}

/// Seeded generator for a complete synthetic portfolio.
///
/// All randomness flows from the owned `ChaCha20Rng`, so two generators built
/// from the same seed and roster produce identical datasets.
pub struct DatasetGenerator {
    rng: ChaCha20Rng,
    profile: GenerationProfile,
}

impl DatasetGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_profile(seed, GenerationProfile::default())
    }

    pub fn with_profile(seed: u64, profile: GenerationProfile) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            profile,
        }
    }

    /// Builds every table and scores each client. Without a roster, providers are synthesized first.
    pub fn generate(&mut self, roster: Option<Vec<Provider>>) -> Result<Dataset, GenerationError> {
        let calendar = Calendar::for_profile(&self.profile)?;
        let rng = &mut self.rng;

        let providers = match roster {
            Some(providers) => providers,
            None => {
                debug!(count = self.profile.synthetic_providers, "synthesizing provider roster");
                synthesize_roster(rng, self.profile.synthetic_providers)
            }
        };
        if providers.is_empty() {
            return Err(GenerationError::EmptyRoster);
        }

        let clients = generate_clients(rng, &calendar);
        info!(count = clients.len(), "generated corporate clients");

        let members = generate_members(rng, &clients, &self.profile.members_per_client);
        info!(count = members.len(), "generated members");

        let claims = generate_claims(rng, &members, &providers, &calendar);
        info!(count = claims.len(), "generated claims");

        let preauths =
            generate_preauths(rng, &members, &providers, &calendar, self.profile.preauth_share);
        info!(count = preauths.len(), "generated pre-authorizations");

        let calls = generate_calls(rng, &members, &calendar, self.profile.call_share);
        info!(count = calls.len(), "generated call center interactions");

        let scores = score_portfolio(&clients, &members, &claims, &preauths, &calls);
        info!(count = scores.len(), "calculated IVI scores");

        Ok(Dataset {
            clients,
            members,
            providers,
            claims,
            preauths,
            calls,
            scores,
        })
    }
}

/// Furthest any generated date lands past Jan 1 of the activity year: a
/// day-of-year draw plus the longest pre-authorization decision delay.
const LATEST_OFFSET_DAYS: i64 = 365 + 7;

struct Calendar {
    year_start: NaiveDate,
    contract_end: NaiveDate,
}

impl Calendar {
    /// Rejects years whose dates, or the offsets added to them, fall outside
    /// the representable range, so later date arithmetic cannot overflow.
    fn for_profile(profile: &GenerationProfile) -> Result<Self, GenerationError> {
        let invalid = GenerationError::InvalidCalendar {
            year: profile.activity_year,
        };
        let year_start = NaiveDate::from_ymd_opt(profile.activity_year, 1, 1)
            .filter(|start| {
                start
                    .checked_add_signed(Duration::days(LATEST_OFFSET_DAYS))
                    .is_some()
            })
            .ok_or(invalid)?;
        let contract_end = NaiveDate::from_ymd_opt(profile.contract_end_year, 12, 31).ok_or(
            GenerationError::InvalidCalendar {
                year: profile.contract_end_year,
            },
        )?;
        Ok(Self {
            year_start,
            contract_end,
        })
    }

    fn day_in_year<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        self.year_start + Duration::days(rng.gen_range(0..=365))
    }
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn pick_weighted<T: Copy, R: Rng + ?Sized>(rng: &mut R, options: &[(T, f64)]) -> T {
    let total: f64 = options.iter().map(|(_, weight)| weight).sum();
    let mut draw = rng.gen::<f64>() * total;
    for &(value, weight) in options {
        if draw < weight {
            return value;
        }
        draw -= weight;
    }
    options[options.len() - 1].0
}

/// Random subset of `0..len` holding `share` of the indices, in draw order.
fn sample_indices<R: Rng + ?Sized>(rng: &mut R, len: usize, share: f64) -> Vec<usize> {
    let amount = ((len as f64) * share.clamp(0.0, 1.0)).round() as usize;
    index::sample(rng, len, amount.min(len)).into_vec()
}

pub(crate) fn synthesize_roster<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Provider> {
    (1..=count)
        .map(|n| {
            let town = *pick(rng, &CITIES);
            let practice = *pick(rng, &PROVIDER_PRACTICES);
            Provider {
                prov_code: format!("PRV{:05}", n),
                prov_name: format!("{town} {practice} {n}"),
                provider_network: pick(rng, &NETWORKS).to_string(),
                provider_practice: practice.to_string(),
                provider_region: pick(rng, &REGIONS).to_string(),
                provider_town: town.to_string(),
            }
        })
        .collect()
}

fn generate_clients<R: Rng + ?Sized>(rng: &mut R, calendar: &Calendar) -> Vec<CorporateClient> {
    COMPANY_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| CorporateClient {
            cont_no: format!("CONT{}{:04}", calendar.year_start.format("%Y"), index + 1),
            company_name: name.to_string(),
            sector: pick(rng, &SECTORS).to_string(),
            region: pick(rng, &REGIONS).to_string(),
            network: pick(rng, &NETWORKS).to_string(),
            employee_count: rng.gen_range(500..=15_000),
            contract_start: calendar.year_start + Duration::days(rng.gen_range(0..=180)),
            contract_end: calendar.contract_end,
            premium_amount: rng.gen_range(5_000_000..=50_000_000),
        })
        .collect()
}

fn generate_members<R: Rng + ?Sized>(
    rng: &mut R,
    clients: &[CorporateClient],
    members_per_client: &RangeInclusive<u32>,
) -> Vec<Member> {
    let mut members = Vec::new();
    let mut next_id = 1_000u64;

    for client in clients {
        let count = rng.gen_range(members_per_client.clone());
        for _ in 0..count {
            let age: u8 = rng.gen_range(22..=65);
            let gender = if rng.gen_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            };

            let chronic_probability = 0.1 + f64::from(age - 22) * 0.01;
            let has_chronic = rng.gen::<f64>() < chronic_probability;
            let chronic_conditions = if has_chronic {
                let amount = rng.gen_range(1..=2);
                let picked: Vec<&str> = CHRONIC_CONDITIONS
                    .choose_multiple(rng, amount)
                    .copied()
                    .collect();
                Some(picked.join(", "))
            } else {
                None
            };

            members.push(Member {
                mbr_no: format!("MBR{:08}", next_id),
                cont_no: client.cont_no.clone(),
                company_name: client.company_name.clone(),
                gender,
                age,
                marital_status: pick(rng, &MARITAL_STATUSES).to_string(),
                nationality: pick(rng, &NATIONALITIES).to_string(),
                city: pick(rng, &CITIES).to_string(),
                plan_network: client.network.clone(),
                has_chronic,
                chronic_conditions,
                enrollment_date: client.contract_start + Duration::days(rng.gen_range(0..=30)),
                status: pick_weighted(
                    rng,
                    &[
                        (MemberStatus::Active, 0.95),
                        (MemberStatus::Suspended, 0.03),
                        (MemberStatus::Terminated, 0.02),
                    ],
                ),
            });
            next_id += 1;
        }
    }

    members
}

fn generate_claims<R: Rng + ?Sized>(
    rng: &mut R,
    members: &[Member],
    providers: &[Provider],
    calendar: &Calendar,
) -> Vec<Claim> {
    let mut claims = Vec::new();
    let mut next_id = 100_000u64;

    for member in members {
        let base = if member.has_chronic { 3 } else { 1 };
        let count = rng.gen_range(base..=base + 5);

        for _ in 0..count {
            let provider = pick(rng, providers);
            let (icd_code, diagnosis) = *pick(rng, &ICD_CODES);
            let benefit: Benefit = *pick(rng, &BENEFITS);
            let claim_date = calendar.day_in_year(rng);
            let claimed_amount = rng.gen_range(benefit.min_amount..=benefit.max_amount);

            let status = pick_weighted(
                rng,
                &[
                    (ClaimStatus::Approved, 0.75),
                    (ClaimStatus::Rejected, 0.10),
                    (ClaimStatus::Pending, 0.05),
                    (ClaimStatus::PartiallyApproved, 0.10),
                ],
            );

            // Pending claims carry the full claimed amount as approved.
            let approved_amount = match status {
                ClaimStatus::Approved | ClaimStatus::Pending => claimed_amount as f64,
                ClaimStatus::Rejected => 0.0,
                ClaimStatus::PartiallyApproved => {
                    round2(claimed_amount as f64 * rng.gen_range(0.5..0.9))
                }
            };

            let rejection_reason = (status == ClaimStatus::Rejected)
                .then(|| pick(rng, &CLAIM_REJECTION_REASONS).to_string());

            claims.push(Claim {
                claim_id: format!("CLM{:010}", next_id),
                mbr_no: member.mbr_no.clone(),
                cont_no: member.cont_no.clone(),
                company_name: member.company_name.clone(),
                prov_code: provider.prov_code.clone(),
                prov_name: provider.prov_name.clone(),
                provider_practice: provider.provider_practice.clone(),
                provider_region: provider.provider_region.clone(),
                claim_date,
                icd_code: icd_code.to_string(),
                diagnosis: diagnosis.to_string(),
                benefit_code: benefit.code.to_string(),
                benefit_desc: benefit.description.to_string(),
                claimed_amount,
                approved_amount,
                status,
                rejection_reason,
                processing_days: rng.gen_range(1..=14),
            });
            next_id += 1;
        }
    }

    claims
}

fn generate_preauths<R: Rng + ?Sized>(
    rng: &mut R,
    members: &[Member],
    providers: &[Provider],
    calendar: &Calendar,
    share: f64,
) -> Vec<PreAuthorization> {
    let mut preauths = Vec::new();
    let mut next_id = 50_000u64;

    for member_index in sample_indices(rng, members.len(), share) {
        let member = &members[member_index];
        let medication: SensitiveMedication = *pick(rng, &SENSITIVE_MEDICATIONS);
        let provider = pick(rng, providers);
        let request_date = calendar.day_in_year(rng);

        let submitted_count = rng.gen_range(1..=PREAUTH_DOCUMENTS.len());
        let submitted: Vec<&str> = PREAUTH_DOCUMENTS
            .choose_multiple(rng, submitted_count)
            .copied()
            .collect();
        let docs_complete = submitted.len() >= 3;

        let status = if !docs_complete {
            PreAuthStatus::Rejected
        } else if rng.gen::<f64>() > 0.3 {
            PreAuthStatus::Approved
        } else {
            *pick(
                rng,
                &[
                    PreAuthStatus::Approved,
                    PreAuthStatus::Rejected,
                    PreAuthStatus::Pending,
                ],
            )
        };

        let decision_date = (status != PreAuthStatus::Pending)
            .then(|| request_date + Duration::days(rng.gen_range(1..=7)));
        let rejection_reason = (status == PreAuthStatus::Rejected)
            .then(|| pick(rng, &PREAUTH_REJECTION_REASONS).to_string());

        preauths.push(PreAuthorization {
            preauth_id: format!("PA{:08}", next_id),
            mbr_no: member.mbr_no.clone(),
            cont_no: member.cont_no.clone(),
            company_name: member.company_name.clone(),
            prov_code: provider.prov_code.clone(),
            prov_name: provider.prov_name.clone(),
            medication_name: medication.name.to_string(),
            medication_category: medication.category.to_string(),
            estimated_cost: medication.estimated_cost,
            request_date,
            docs_submitted: submitted.join(", "),
            docs_complete,
            status,
            decision_date,
            rejection_reason,
        });
        next_id += 1;
    }

    preauths
}

fn generate_calls<R: Rng + ?Sized>(
    rng: &mut R,
    members: &[Member],
    calendar: &Calendar,
    share: f64,
) -> Vec<CallInteraction> {
    let mut calls = Vec::new();
    let mut next_id = 200_000u64;

    for member_index in sample_indices(rng, members.len(), share) {
        let member = &members[member_index];
        let count = rng.gen_range(1..=5);

        for _ in 0..count {
            let category: CallCategory = *pick(rng, &CALL_CATEGORIES);
            let crt_date = calendar.day_in_year(rng);
            let status = pick_weighted(
                rng,
                &[
                    (CallStatus::Closed, 0.8),
                    (CallStatus::Opened, 0.1),
                    (CallStatus::Wip, 0.1),
                ],
            );

            let upd_date = (status != CallStatus::Opened)
                .then(|| crt_date + Duration::days(rng.gen_range(0..=3)));
            let closed = status == CallStatus::Closed;
            let resolution_time_hours = closed.then(|| rng.gen_range(1..=72));
            let satisfaction_score =
                (closed && rng.gen::<f64>() > 0.3).then(|| rng.gen_range(1..=5));

            calls.push(CallInteraction {
                call_id: format!("CALL{:010}", next_id),
                mbr_no: member.mbr_no.clone(),
                cont_no: member.cont_no.clone(),
                company_name: member.company_name.clone(),
                call_cat: category.code.to_string(),
                call_type: if category.complaint {
                    CallType::Complaint
                } else {
                    CallType::Request
                },
                call_reason: category.reason.to_string(),
                crt_date,
                upd_date,
                status,
                resolution_time_hours,
                satisfaction_score,
            });
            next_id += 1;
        }
    }

    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn pick_weighted_respects_zero_weights() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..500 {
            let value = pick_weighted(&mut rng, &[("never", 0.0), ("always", 1.0)]);
            assert_eq!(value, "always");
        }
    }

    #[test]
    fn sample_indices_draws_distinct_share() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut drawn = sample_indices(&mut rng, 10, 0.3);
        assert_eq!(drawn.len(), 3);
        drawn.sort_unstable();
        drawn.dedup();
        assert_eq!(drawn.len(), 3);
        assert!(drawn.iter().all(|&index| index < 10));
        assert!(sample_indices(&mut rng, 0, 0.4).is_empty());
    }

    #[test]
    fn synthesized_roster_uses_catalog_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let roster = synthesize_roster(&mut rng, 12);
        assert_eq!(roster.len(), 12);
        assert_eq!(roster[0].prov_code, "PRV00001");
        assert!(roster
            .iter()
            .all(|provider| NETWORKS.contains(&provider.provider_network.as_str())
                && CITIES.contains(&provider.provider_town.as_str())));
    }

    #[test]
    fn invalid_calendar_is_rejected() {
        let profile = GenerationProfile {
            activity_year: i32::MAX,
            ..GenerationProfile::default()
        };
        let mut generator = DatasetGenerator::with_profile(1, profile);
        let error = generator.generate(None).expect_err("calendar out of range");
        assert!(matches!(error, GenerationError::InvalidCalendar { .. }));
    }

    #[test]
    fn last_representable_year_is_rejected() {
        let profile = GenerationProfile {
            activity_year: NaiveDate::MAX.year(),
            ..GenerationProfile::default()
        };
        let mut generator = DatasetGenerator::with_profile(1, profile);
        let error = generator.generate(None).expect_err("offsets overflow");
        assert!(matches!(error, GenerationError::InvalidCalendar { .. }));
    }

    #[test]
    fn empty_roster_is_rejected() {
        let mut generator = DatasetGenerator::new(1);
        let error = generator
            .generate(Some(Vec::new()))
            .expect_err("claims need providers");
        assert!(matches!(error, GenerationError::EmptyRoster));
    }
}
