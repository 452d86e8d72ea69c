use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Suspended,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Approved,
    Rejected,
    Pending,
    #[serde(rename = "Partially Approved")]
    PartiallyApproved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreAuthStatus {
    Approved,
    Rejected,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallType {
    Request,
    Complaint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallStatus {
    Closed,
    Opened,
    Wip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateClient {
    #[serde(rename = "CONT_NO")]
    pub cont_no: String,
    #[serde(rename = "COMPANY_NAME")]
    pub company_name: String,
    #[serde(rename = "SECTOR")]
    pub sector: String,
    #[serde(rename = "REGION")]
    pub region: String,
    #[serde(rename = "NETWORK")]
    pub network: String,
    #[serde(rename = "EMPLOYEE_COUNT")]
    pub employee_count: u32,
    #[serde(rename = "CONTRACT_START")]
    pub contract_start: NaiveDate,
    #[serde(rename = "CONTRACT_END")]
    pub contract_end: NaiveDate,
    #[serde(rename = "PREMIUM_AMOUNT")]
    pub premium_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "MBR_NO")]
    pub mbr_no: String,
    #[serde(rename = "CONT_NO")]
    pub cont_no: String,
    #[serde(rename = "COMPANY_NAME")]
    pub company_name: String,
    #[serde(rename = "GENDER")]
    pub gender: Gender,
    #[serde(rename = "AGE")]
    pub age: u8,
    #[serde(rename = "MARITAL_STATUS")]
    pub marital_status: String,
    #[serde(rename = "NATIONALITY")]
    pub nationality: String,
    #[serde(rename = "CITY")]
    pub city: String,
    #[serde(rename = "PLAN_NETWORK")]
    pub plan_network: String,
    #[serde(rename = "HAS_CHRONIC")]
    pub has_chronic: bool,
    #[serde(rename = "CHRONIC_CONDITIONS")]
    pub chronic_conditions: Option<String>,
    #[serde(rename = "ENROLLMENT_DATE")]
    pub enrollment_date: NaiveDate,
    #[serde(rename = "STATUS")]
    pub status: MemberStatus,
}

/// Reference data row from the provider roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "PROV_CODE")]
    pub prov_code: String,
    #[serde(rename = "PROV_NAME")]
    pub prov_name: String,
    #[serde(rename = "PROVIDER_NETWORK")]
    pub provider_network: String,
    #[serde(rename = "PROVIDER_PRACTICE")]
    pub provider_practice: String,
    #[serde(rename = "PROVIDER_REGION")]
    pub provider_region: String,
    #[serde(rename = "PROVIDER_TOWN")]
    pub provider_town: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "CLAIM_ID")]
    pub claim_id: String,
    #[serde(rename = "MBR_NO")]
    pub mbr_no: String,
    #[serde(rename = "CONT_NO")]
    pub cont_no: String,
    #[serde(rename = "COMPANY_NAME")]
    pub company_name: String,
    #[serde(rename = "PROV_CODE")]
    pub prov_code: String,
    #[serde(rename = "PROV_NAME")]
    pub prov_name: String,
    #[serde(rename = "PROVIDER_PRACTICE")]
    pub provider_practice: String,
    #[serde(rename = "PROVIDER_REGION")]
    pub provider_region: String,
    #[serde(rename = "CLAIM_DATE")]
    pub claim_date: NaiveDate,
    #[serde(rename = "ICD_CODE")]
    pub icd_code: String,
    #[serde(rename = "DIAGNOSIS")]
    pub diagnosis: String,
    #[serde(rename = "BENEFIT_CODE")]
    pub benefit_code: String,
    #[serde(rename = "BENEFIT_DESC")]
    pub benefit_desc: String,
    #[serde(rename = "CLAIMED_AMOUNT")]
    pub claimed_amount: u64,
    #[serde(rename = "APPROVED_AMOUNT")]
    pub approved_amount: f64,
    #[serde(rename = "STATUS")]
    pub status: ClaimStatus,
    #[serde(rename = "REJECTION_REASON")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "PROCESSING_DAYS")]
    pub processing_days: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreAuthorization {
    #[serde(rename = "PREAUTH_ID")]
    pub preauth_id: String,
    #[serde(rename = "MBR_NO")]
    pub mbr_no: String,
    #[serde(rename = "CONT_NO")]
    pub cont_no: String,
    #[serde(rename = "COMPANY_NAME")]
    pub company_name: String,
    #[serde(rename = "PROV_CODE")]
    pub prov_code: String,
    #[serde(rename = "PROV_NAME")]
    pub prov_name: String,
    #[serde(rename = "MEDICATION_NAME")]
    pub medication_name: String,
    #[serde(rename = "MEDICATION_CATEGORY")]
    pub medication_category: String,
    #[serde(rename = "ESTIMATED_COST")]
    pub estimated_cost: u64,
    #[serde(rename = "REQUEST_DATE")]
    pub request_date: NaiveDate,
    #[serde(rename = "DOCS_SUBMITTED")]
    pub docs_submitted: String,
    #[serde(rename = "DOCS_COMPLETE")]
    pub docs_complete: bool,
    #[serde(rename = "STATUS")]
    pub status: PreAuthStatus,
    #[serde(rename = "DECISION_DATE")]
    pub decision_date: Option<NaiveDate>,
    #[serde(rename = "REJECTION_REASON")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInteraction {
    #[serde(rename = "CALL_ID")]
    pub call_id: String,
    #[serde(rename = "MBR_NO")]
    pub mbr_no: String,
    #[serde(rename = "CONT_NO")]
    pub cont_no: String,
    #[serde(rename = "COMPANY_NAME")]
    pub company_name: String,
    #[serde(rename = "CALL_CAT")]
    pub call_cat: String,
    #[serde(rename = "CALL_TYPE")]
    pub call_type: CallType,
    #[serde(rename = "CALL_REASON")]
    pub call_reason: String,
    #[serde(rename = "CRT_DATE")]
    pub crt_date: NaiveDate,
    #[serde(rename = "UPD_DATE")]
    pub upd_date: Option<NaiveDate>,
    #[serde(rename = "STATUS")]
    pub status: CallStatus,
    #[serde(rename = "RESOLUTION_TIME_HOURS")]
    pub resolution_time_hours: Option<u8>,
    #[serde(rename = "SATISFACTION_SCORE")]
    pub satisfaction_score: Option<u8>,
}

/// Portfolio-wide rollup written next to the generated tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_companies: usize,
    pub total_members: usize,
    pub total_claims: usize,
    pub total_preauths: usize,
    pub total_calls: usize,
    pub total_providers: usize,
    pub avg_ivi_score: f64,
    pub risk_distribution: BTreeMap<String, usize>,
    pub total_claimed_amount: u64,
    pub total_approved_amount: u64,
    pub claim_approval_rate: f64,
    pub preauth_approval_rate: f64,
    pub avg_satisfaction: Option<f64>,
    pub generated_at: DateTime<Utc>,
}
