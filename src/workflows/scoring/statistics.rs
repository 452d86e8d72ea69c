use crate::workflows::dataset::{
    CallInteraction, CallType, Claim, ClaimStatus, CorporateClient, Member, PreAuthStatus,
    PreAuthorization,
};

/// Claims with a claimed amount strictly above this count as high cost.
pub const HIGH_COST_CLAIM_THRESHOLD: u64 = 10_000;

/// Satisfaction assumed when a client has no rated calls.
pub const DEFAULT_SATISFACTION: f64 = 3.0;

/// Pre-authorization approval rate assumed when a client has no requests.
pub const DEFAULT_PREAUTH_APPROVAL_RATE: f64 = 50.0;

/// Loss ratio assumed when the premium is zero.
pub const ZERO_PREMIUM_LOSS_RATIO: f64 = 100.0;

/// Counters for one client's activity; every rate used by the scorecard derives from these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientStatistics {
    pub premium_amount: u64,
    pub member_count: usize,
    pub chronic_members: usize,
    pub claim_count: usize,
    pub high_cost_claims: usize,
    pub rejected_claims: usize,
    pub total_claimed: u64,
    pub total_approved: f64,
    pub complaint_calls: usize,
    pub satisfaction_total: u64,
    pub satisfaction_responses: usize,
    pub preauth_count: usize,
    pub approved_preauths: usize,
}

impl ClientStatistics {
    pub fn for_client(client: &CorporateClient) -> Self {
        Self {
            premium_amount: client.premium_amount,
            ..Self::default()
        }
    }

    /// Aggregates the records that belong to `client`; records citing other clients are skipped.
    pub fn collect(
        client: &CorporateClient,
        members: &[Member],
        claims: &[Claim],
        preauths: &[PreAuthorization],
        calls: &[CallInteraction],
    ) -> Self {
        let mut stats = Self::for_client(client);
        let owned = |cont_no: &str| cont_no == client.cont_no;

        members
            .iter()
            .filter(|member| owned(&member.cont_no))
            .for_each(|member| stats.record_member(member));
        claims
            .iter()
            .filter(|claim| owned(&claim.cont_no))
            .for_each(|claim| stats.record_claim(claim));
        preauths
            .iter()
            .filter(|preauth| owned(&preauth.cont_no))
            .for_each(|preauth| stats.record_preauth(preauth));
        calls
            .iter()
            .filter(|call| owned(&call.cont_no))
            .for_each(|call| stats.record_call(call));

        stats
    }

    pub fn record_member(&mut self, member: &Member) {
        self.member_count += 1;
        if member.has_chronic {
            self.chronic_members += 1;
        }
    }

    pub fn record_claim(&mut self, claim: &Claim) {
        self.claim_count += 1;
        self.total_claimed += claim.claimed_amount;
        self.total_approved += claim.approved_amount;
        if claim.claimed_amount > HIGH_COST_CLAIM_THRESHOLD {
            self.high_cost_claims += 1;
        }
        if claim.status == ClaimStatus::Rejected {
            self.rejected_claims += 1;
        }
    }

    pub fn record_preauth(&mut self, preauth: &PreAuthorization) {
        self.preauth_count += 1;
        if preauth.status == PreAuthStatus::Approved {
            self.approved_preauths += 1;
        }
    }

    pub fn record_call(&mut self, call: &CallInteraction) {
        if call.call_type == CallType::Complaint {
            self.complaint_calls += 1;
        }
        if let Some(score) = call.satisfaction_score {
            self.satisfaction_total += u64::from(score);
            self.satisfaction_responses += 1;
        }
    }

    pub fn chronic_rate(&self) -> f64 {
        percentage(self.chronic_members, self.member_count)
    }

    pub fn avg_claims_per_member(&self) -> f64 {
        ratio(self.claim_count as f64, self.member_count)
    }

    pub fn high_cost_claim_rate(&self) -> f64 {
        percentage(self.high_cost_claims, self.claim_count)
    }

    pub fn complaint_rate(&self) -> f64 {
        percentage(self.complaint_calls, self.member_count)
    }

    pub fn rejection_rate(&self) -> f64 {
        percentage(self.rejected_claims, self.claim_count)
    }

    pub fn avg_satisfaction(&self) -> f64 {
        if self.satisfaction_responses == 0 {
            DEFAULT_SATISFACTION
        } else {
            self.satisfaction_total as f64 / self.satisfaction_responses as f64
        }
    }

    pub fn preauth_approval_rate(&self) -> f64 {
        if self.preauth_count == 0 {
            DEFAULT_PREAUTH_APPROVAL_RATE
        } else {
            percentage(self.approved_preauths, self.preauth_count)
        }
    }

    pub fn loss_ratio(&self) -> f64 {
        if self.premium_amount == 0 {
            ZERO_PREMIUM_LOSS_RATIO
        } else {
            self.total_approved / self.premium_amount as f64 * 100.0
        }
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    ratio(part as f64, whole) * 100.0
}
