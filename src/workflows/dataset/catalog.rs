//! Fixed reference lists the generator samples from.

pub const COMPANY_NAMES: [&str; 25] = [
    "Saudi Aramco",
    "SABIC",
    "STC",
    "Al Rajhi Bank",
    "Saudi Airlines",
    "ACWA Power",
    "Ma'aden",
    "Almarai",
    "Jarir Bookstore",
    "Mobily",
    "Zain KSA",
    "Bank AlJazira",
    "Riyad Bank",
    "SNB",
    "SABB",
    "Elm Company",
    "Tasnee",
    "Yanbu Cement",
    "Saudi Electricity",
    "Sadara",
    "Petro Rabigh",
    "Saudi Kayan",
    "Sipchem",
    "Advanced Petrochemical",
    "Sahara Petrochemical",
];

pub const SECTORS: [&str; 8] = [
    "Energy",
    "Banking",
    "Telecom",
    "Retail",
    "Manufacturing",
    "Technology",
    "Healthcare",
    "Transport",
];

pub const REGIONS: [&str; 5] = ["Central", "Western", "Eastern", "Northern", "Southern"];

pub const NETWORKS: [&str; 8] = ["NWM", "NW1", "NW2", "NW3", "NW4", "NW5", "NW6", "NW7"];

pub const CHRONIC_CONDITIONS: [&str; 5] = [
    "Diabetes",
    "Hypertension",
    "Asthma",
    "Heart Disease",
    "Obesity",
];

pub const MARITAL_STATUSES: [&str; 4] = ["S", "M", "D", "W"];

/// Saudi nationals are listed three times to weight the draw.
pub const NATIONALITIES: [&str; 8] = ["SA", "SA", "SA", "EG", "PK", "IN", "PH", "JO"];

pub const CITIES: [&str; 6] = ["Riyadh", "Jeddah", "Dammam", "Makkah", "Madinah", "Khobar"];

pub const ICD_CODES: [(&str, &str); 15] = [
    ("A09", "Infectious gastroenteritis and colitis"),
    ("E11", "Type 2 diabetes mellitus"),
    ("I10", "Essential hypertension"),
    ("J06", "Acute upper respiratory infections"),
    ("J18", "Pneumonia"),
    ("K21", "Gastro-esophageal reflux disease"),
    ("M54", "Dorsalgia (back pain)"),
    ("N39", "Urinary tract infection"),
    ("R10", "Abdominal and pelvic pain"),
    ("Z00", "General examination"),
    ("E66", "Obesity"),
    ("J45", "Asthma"),
    ("I25", "Chronic ischemic heart disease"),
    ("F32", "Depressive episode"),
    ("K29", "Gastritis and duodenitis"),
];

/// A claimable benefit and the claimed-amount range drawn for it.
#[derive(Debug, Clone, Copy)]
pub struct Benefit {
    pub code: &'static str,
    pub description: &'static str,
    pub min_amount: u64,
    pub max_amount: u64,
}

const fn benefit(code: &'static str, description: &'static str, min: u64, max: u64) -> Benefit {
    Benefit {
        code,
        description,
        min_amount: min,
        max_amount: max,
    }
}

pub const BENEFITS: [Benefit; 12] = [
    benefit("CON", "Consultation", 100, 500),
    benefit("LAB", "Laboratory", 200, 2_000),
    benefit("RAD", "Radiology", 500, 5_000),
    benefit("PHR", "Pharmacy", 50, 3_000),
    benefit("DEN", "Dental", 200, 5_000),
    benefit("OPT", "Optical", 100, 2_000),
    benefit("MAT", "Maternity", 5_000, 50_000),
    benefit("INP", "Inpatient", 10_000, 200_000),
    benefit("OUP", "Outpatient", 100, 5_000),
    benefit("EMR", "Emergency", 500, 20_000),
    benefit("PHY", "Physiotherapy", 200, 3_000),
    benefit("PSY", "Psychiatric", 300, 2_000),
];

pub const CLAIM_REJECTION_REASONS: [&str; 5] = [
    "Not covered under plan",
    "Pre-authorization required",
    "Duplicate claim",
    "Exceeded annual limit",
    "Provider not in network",
];

/// Medication that always goes through pre-authorization.
#[derive(Debug, Clone, Copy)]
pub struct SensitiveMedication {
    pub name: &'static str,
    pub category: &'static str,
    pub estimated_cost: u64,
}

const fn medication(name: &'static str, category: &'static str, cost: u64) -> SensitiveMedication {
    SensitiveMedication {
        name,
        category,
        estimated_cost: cost,
    }
}

pub const SENSITIVE_MEDICATIONS: [SensitiveMedication; 8] = [
    medication("Ozempic", "Obesity", 5_000),
    medication("Wegovy", "Obesity", 6_000),
    medication("Humira", "Biological", 15_000),
    medication("Enbrel", "Biological", 12_000),
    medication("Remicade", "Biological", 20_000),
    medication("Growth Hormone", "Hormone", 8_000),
    medication("Infant Formula", "Pediatric", 500),
    medication("Insulin Pump", "Diabetes", 25_000),
];

pub const PREAUTH_DOCUMENTS: [&str; 4] = [
    "Medical Report",
    "Lab Results",
    "BMI Certificate",
    "Prescription",
];

pub const PREAUTH_REJECTION_REASONS: [&str; 4] = [
    "Incomplete documentation",
    "Does not meet clinical criteria",
    "Alternative treatment available",
    "Exceeded coverage limit",
];

/// Call-center category code, whether it is a complaint, and the caller's reason.
#[derive(Debug, Clone, Copy)]
pub struct CallCategory {
    pub code: &'static str,
    pub complaint: bool,
    pub reason: &'static str,
}

const fn call(code: &'static str, complaint: bool, reason: &'static str) -> CallCategory {
    CallCategory {
        code,
        complaint,
        reason,
    }
}

pub const CALL_CATEGORIES: [CallCategory; 10] = [
    call("AC", false, "Claim inquiry"),
    call("AP", true, "Claim rejection"),
    call("MT", false, "Medical inquiry"),
    call("AR", false, "Authorization status"),
    call("BC", false, "Benefits inquiry"),
    call("BP", true, "Benefits dispute"),
    call("PR", false, "Provider search"),
    call("XC", false, "Card replacement"),
    call("XP", true, "Card issue"),
    call("VP", false, "Verification"),
];

/// Practice types used when no external provider roster is supplied.
pub const PROVIDER_PRACTICES: [&str; 6] = [
    "Hospital",
    "Polyclinic",
    "Pharmacy",
    "Laboratory",
    "Dental Center",
    "Optical Center",
];
