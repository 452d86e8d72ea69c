use super::{ColumnPresence, ExportDefaults, ExportError, JOIN_KEY};
use crate::tabular::{Table, TableError};
use crate::workflows::dataset::Provider;
use crate::workflows::scoring::{mean, round2, IviScore, RiskCategory};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

pub const PROVIDER_INFO_HEADERS: [&str; 6] = [
    "Prov Code",
    "Prov Name",
    "Provider Network",
    "Provider Practice",
    "Provider Region",
    "Provider Town",
];

const IMPORTANCE_COLUMNS: [&str; 2] = ["Importance", "IMPORTANCE"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetric {
    #[serde(rename = "Metric")]
    pub metric: &'static str,
    #[serde(rename = "Value")]
    pub value: f64,
    #[serde(rename = "Description")]
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDistributionRow {
    #[serde(rename = "Risk_Category")]
    pub risk_category: RiskCategory,
    #[serde(rename = "Company_Count")]
    pub company_count: usize,
    #[serde(rename = "Avg_IVI")]
    pub avg_ivi: f64,
    #[serde(rename = "Avg_H")]
    pub avg_h: f64,
    #[serde(rename = "Avg_E")]
    pub avg_e: f64,
    #[serde(rename = "Avg_U")]
    pub avg_u: f64,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderNetworkRow {
    #[serde(rename = "Network")]
    pub network: String,
    #[serde(rename = "Provider_Count")]
    pub provider_count: usize,
    #[serde(rename = "Most_Common_Practice")]
    pub most_common_practice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRegionRow {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Provider_Count")]
    pub provider_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaxMeasure {
    #[serde(rename = "Measure_Name")]
    pub measure_name: &'static str,
    #[serde(rename = "DAX_Formula")]
    pub dax_formula: String,
    #[serde(rename = "Description")]
    pub description: &'static str,
}

/// Portfolio headline figures. Projections fall back to the current mean plus
/// the default improvement when no prediction column is present.
pub fn summary_metrics(
    scores: &[IviScore],
    predictions: &Table,
    presence: &ColumnPresence,
    defaults: &ExportDefaults,
) -> Vec<SummaryMetric> {
    let mean_ivi = mean(scores.iter().map(|score| score.ivi_score)).unwrap_or(0.0);
    let count = |category: RiskCategory| {
        scores
            .iter()
            .filter(|score| score.risk_category == category)
            .count() as f64
    };

    let projected = match presence
        .future_ivi
        .as_deref()
        .and_then(|header| column_mean(predictions, header))
    {
        Some(value) => value,
        None => {
            warn!(
                improvement = defaults.improvement,
                "no future IVI predictions; projecting with the default improvement"
            );
            mean_ivi + defaults.improvement
        }
    };
    let improvement = presence
        .improvement
        .as_deref()
        .and_then(|header| column_mean(predictions, header))
        .unwrap_or(defaults.improvement);

    let metric = |metric: &'static str, value: f64, description: &'static str| SummaryMetric {
        metric,
        value: round2(value),
        description,
    };

    vec![
        metric(
            "Total Companies",
            scores.len() as f64,
            "Number of corporate clients evaluated",
        ),
        metric(
            "Average IVI Score",
            mean_ivi,
            "Average Intelligent Value Index score (0-100)",
        ),
        metric(
            "Average H Score (Health)",
            mean(scores.iter().map(|score| score.h_score)).unwrap_or(0.0),
            "Average Health Outcomes score (0-100)",
        ),
        metric(
            "Average E Score (Experience)",
            mean(scores.iter().map(|score| score.e_score)).unwrap_or(0.0),
            "Average Experience Quality score (0-100)",
        ),
        metric(
            "Average U Score (Utilization)",
            mean(scores.iter().map(|score| score.u_score)).unwrap_or(0.0),
            "Average Utilization Efficiency score (0-100)",
        ),
        metric(
            "High Risk Companies",
            count(RiskCategory::High),
            "Companies requiring immediate attention",
        ),
        metric(
            "Medium Risk Companies",
            count(RiskCategory::Medium),
            "Companies requiring monitoring",
        ),
        metric(
            "Low Risk Companies",
            count(RiskCategory::Low),
            "Companies performing well",
        ),
        metric(
            "Projected Future IVI",
            projected,
            "Predicted average IVI in 12 months",
        ),
        metric(
            "Expected Improvement",
            improvement,
            "Expected improvement in IVI points",
        ),
    ]
}

/// One row per populated category, most urgent first.
pub fn risk_distribution(scores: &[IviScore]) -> Vec<RiskDistributionRow> {
    let total = scores.len();
    RiskCategory::ordered()
        .into_iter()
        .filter_map(|category| {
            let members: Vec<&IviScore> = scores
                .iter()
                .filter(|score| score.risk_category == category)
                .collect();
            if members.is_empty() {
                return None;
            }

            let avg = |value: fn(&IviScore) -> f64| {
                round2(mean(members.iter().map(|score| value(score))).unwrap_or(0.0))
            };
            Some(RiskDistributionRow {
                risk_category: category,
                company_count: members.len(),
                avg_ivi: avg(|score| score.ivi_score),
                avg_h: avg(|score| score.h_score),
                avg_e: avg(|score| score.e_score),
                avg_u: avg(|score| score.u_score),
                percentage: round1(members.len() as f64 / total as f64 * 100.0),
            })
        })
        .collect()
}

/// Scores left-joined on `CONT_NO` with predictions and recommendations.
///
/// Present columns keep their source header and leave unmatched clients blank;
/// absent columns are synthesized from [`ExportDefaults`].
pub fn client_analysis(
    score_table: &Table,
    predictions: &Table,
    recommendations: &Table,
    presence: &ColumnPresence,
    defaults: &ExportDefaults,
) -> Result<Table, ExportError> {
    let key = score_table
        .column(JOIN_KEY)
        .ok_or(ExportError::MissingColumn {
            table: "ivi_scores",
            column: JOIN_KEY,
        })?;
    let ivi = score_table
        .column("IVI_SCORE")
        .ok_or(ExportError::MissingColumn {
            table: "ivi_scores",
            column: "IVI_SCORE",
        })?;

    let keys: Vec<String> = score_table
        .rows()
        .iter()
        .map(|row| row.get(key).cloned().unwrap_or_default())
        .collect();
    let mut analysis = score_table.clone();

    match presence.future_ivi.as_deref() {
        Some(header) => analysis.append_column(header, joined_column(&keys, predictions, header)),
        None => {
            let projected: Vec<String> = score_table
                .rows()
                .iter()
                .map(|row| {
                    row.get(ivi)
                        .and_then(|value| parse_finite(value))
                        .map(|value| format_number(round2(value + defaults.improvement)))
                        .unwrap_or_default()
                })
                .collect();
            analysis.append_column("FUTURE_IVI_SCORE", projected);
        }
    }

    match presence.improvement.as_deref() {
        Some(header) => analysis.append_column(header, joined_column(&keys, predictions, header)),
        None => analysis.append_column(
            "IMPROVEMENT",
            keys.iter().map(|_| format_number(defaults.improvement)),
        ),
    }

    match presence.recommendations.as_deref() {
        Some(header) => {
            analysis.append_column(header, joined_column(&keys, recommendations, header))
        }
        None => analysis.append_column(
            "RECOMMENDATIONS",
            keys.iter().map(|_| defaults.recommendation.clone()),
        ),
    }

    Ok(analysis)
}

/// Adds `Importance_Percent` (importance x 100, 2 decimals) when an importance column exists.
pub fn feature_importance(table: &Table) -> Table {
    let mut view = table.clone();
    match table.find_column(&IMPORTANCE_COLUMNS) {
        Some(index) => {
            let percents: Vec<String> = table
                .rows()
                .iter()
                .map(|row| {
                    row.get(index)
                        .and_then(|value| parse_finite(value))
                        .map(|value| format_number(round2(value * 100.0)))
                        .unwrap_or_default()
                })
                .collect();
            view.append_column("Importance_Percent", percents);
        }
        None if !table.headers().is_empty() => {
            warn!("feature importance has no Importance column; passing through unchanged");
        }
        None => {}
    }
    view
}

pub fn provider_info(providers: &[Provider]) -> Result<Table, TableError> {
    let mut table = Table::new(PROVIDER_INFO_HEADERS);
    for provider in providers {
        table.push_row(vec![
            provider.prov_code.clone(),
            provider.prov_name.clone(),
            provider.provider_network.clone(),
            provider.provider_practice.clone(),
            provider.provider_region.clone(),
            provider.provider_town.clone(),
        ])?;
    }
    Ok(table)
}

/// Providers per network with the modal practice; ties go to the alphabetically first practice.
pub fn provider_analysis(providers: &[Provider]) -> Vec<ProviderNetworkRow> {
    let mut networks: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for provider in providers {
        *networks
            .entry(provider.provider_network.as_str())
            .or_default()
            .entry(provider.provider_practice.as_str())
            .or_insert(0) += 1;
    }

    networks
        .into_iter()
        .map(|(network, practices)| {
            let provider_count = practices.values().sum();
            let most_common_practice = practices
                .iter()
                .fold(None::<(&str, usize)>, |best, (practice, count)| match best {
                    Some((_, top)) if top >= *count => best,
                    _ => Some((*practice, *count)),
                })
                .map(|(practice, _)| practice.to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            ProviderNetworkRow {
                network: network.to_string(),
                provider_count,
                most_common_practice,
            }
        })
        .collect()
}

pub fn provider_by_region(providers: &[Provider]) -> Vec<ProviderRegionRow> {
    let mut regions: BTreeMap<&str, usize> = BTreeMap::new();
    for provider in providers {
        *regions.entry(provider.provider_region.as_str()).or_insert(0) += 1;
    }
    regions
        .into_iter()
        .map(|(region, provider_count)| ProviderRegionRow {
            region: region.to_string(),
            provider_count,
        })
        .collect()
}

/// Reference measures for the report. Formulas name the columns as exported.
pub fn dax_measures(presence: &ColumnPresence) -> Vec<DaxMeasure> {
    let improvement = presence.improvement.as_deref().unwrap_or("IMPROVEMENT");
    let risk_count = |category: RiskCategory| {
        format!(
            "CALCULATE(COUNTROWS(IVI_Scores), IVI_Scores[RISK_CATEGORY] = \"{}\")",
            category.label()
        )
    };
    let measure = |measure_name: &'static str, dax_formula: String, description: &'static str| {
        DaxMeasure {
            measure_name,
            dax_formula,
            description,
        }
    };

    vec![
        measure(
            "Total Companies",
            "COUNTROWS(IVI_Scores)".to_string(),
            "Count of all companies in portfolio",
        ),
        measure(
            "Average IVI",
            "AVERAGE(IVI_Scores[IVI_SCORE])".to_string(),
            "Mean IVI score across all companies",
        ),
        measure(
            "High Risk Count",
            risk_count(RiskCategory::High),
            "Number of high risk companies",
        ),
        measure(
            "Medium Risk Count",
            risk_count(RiskCategory::Medium),
            "Number of medium risk companies",
        ),
        measure(
            "Low Risk Count",
            risk_count(RiskCategory::Low),
            "Number of low risk companies",
        ),
        measure(
            "Health Score Average",
            "AVERAGE(IVI_Scores[H_SCORE])".to_string(),
            "Average health outcomes score",
        ),
        measure(
            "Experience Score Average",
            "AVERAGE(IVI_Scores[E_SCORE])".to_string(),
            "Average experience quality score",
        ),
        measure(
            "Utilization Score Average",
            "AVERAGE(IVI_Scores[U_SCORE])".to_string(),
            "Average utilization efficiency score",
        ),
        measure(
            "Projected Improvement",
            format!("AVERAGE(Future_Predictions[{improvement}])"),
            "Average expected improvement in IVI",
        ),
        measure(
            "Risk Percentage",
            "DIVIDE([High Risk Count], [Total Companies], 0) * 100".to_string(),
            "Percentage of high risk companies",
        ),
    ]
}

fn joined_column(keys: &[String], table: &Table, header: &str) -> Vec<String> {
    let (Some(key), Some(value)) = (table.column(JOIN_KEY), table.column(header)) else {
        return vec![String::new(); keys.len()];
    };

    // First match wins; the relationship is many-to-one towards the scores.
    let mut lookup: HashMap<&str, &str> = HashMap::new();
    for row in table.rows() {
        if let (Some(id), Some(cell)) = (row.get(key), row.get(value)) {
            lookup.entry(id.as_str()).or_insert(cell.as_str());
        }
    }

    keys.iter()
        .map(|id| {
            lookup
                .get(id.as_str())
                .map(|cell| cell.to_string())
                .unwrap_or_default()
        })
        .collect()
}

fn column_mean(table: &Table, header: &str) -> Option<f64> {
    let index = table.column(header)?;
    mean(
        table
            .rows()
            .iter()
            .filter_map(|row| parse_finite(row.get(index)?)),
    )
}

/// Numeric cell value; blanks, text and non-finite values such as `NaN` are skipped.
fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(cont_no: &str, ivi: f64) -> IviScore {
        IviScore {
            cont_no: cont_no.to_string(),
            company_name: format!("{cont_no} Holdings"),
            sector: "Retail".to_string(),
            region: "Central".to_string(),
            employee_count: 10,
            total_claims: 4,
            total_claimed: 20_000,
            total_approved: 15_000.0,
            h_score: ivi,
            e_score: ivi,
            u_score: ivi,
            ivi_score: ivi,
            risk_category: RiskCategory::from_score(ivi),
            chronic_rate: 10.0,
            complaint_rate: 0.0,
            rejection_rate: 5.0,
            loss_ratio: 60.0,
        }
    }

    fn provider(code: &str, network: &str, practice: &str, region: &str) -> Provider {
        Provider {
            prov_code: code.to_string(),
            prov_name: format!("Provider {code}"),
            provider_network: network.to_string(),
            provider_practice: practice.to_string(),
            provider_region: region.to_string(),
            provider_town: "Riyadh".to_string(),
        }
    }

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).expect("csv parses")
    }

    fn scores_table(scores: &[IviScore]) -> Table {
        Table::from_records(scores).expect("scores tabulate")
    }

    #[test]
    fn summary_falls_back_to_default_projection() {
        let scores = vec![score("C1", 80.0), score("C2", 60.0), score("C3", 40.0)];
        let metrics = summary_metrics(
            &scores,
            &Table::default(),
            &ColumnPresence::default(),
            &ExportDefaults::default(),
        );

        let value = |name: &str| {
            metrics
                .iter()
                .find(|metric| metric.metric == name)
                .map(|metric| metric.value)
                .expect("metric present")
        };
        assert_eq!(metrics.len(), 10);
        assert_eq!(value("Total Companies"), 3.0);
        assert_eq!(value("Average IVI Score"), 60.0);
        assert_eq!(value("High Risk Companies"), 1.0);
        assert_eq!(value("Medium Risk Companies"), 1.0);
        assert_eq!(value("Low Risk Companies"), 1.0);
        assert_eq!(value("Projected Future IVI"), 65.0);
        assert_eq!(value("Expected Improvement"), 5.0);
    }

    #[test]
    fn summary_uses_prediction_means_when_present() {
        let scores = vec![score("C1", 80.0), score("C2", 60.0)];
        let predictions = table("CONT_NO,Future_IVI_Score,Improvement\nC1,84,4\nC2,62,2\n");
        let presence = ColumnPresence::detect(&predictions, &Table::default());

        let metrics = summary_metrics(
            &scores,
            &predictions,
            &presence,
            &ExportDefaults::default(),
        );
        assert_eq!(metrics[8].value, 73.0);
        assert_eq!(metrics[9].value, 3.0);
    }

    #[test]
    fn prediction_means_skip_non_finite_cells() {
        let scores = vec![score("C1", 80.0), score("C2", 60.0)];
        let predictions = table("CONT_NO,Future_IVI_Score,Improvement\nC1,80,4\nC2,NaN,inf\n");
        let presence = ColumnPresence::detect(&predictions, &Table::default());

        let metrics = summary_metrics(
            &scores,
            &predictions,
            &presence,
            &ExportDefaults::default(),
        );
        assert_eq!(metrics[8].value, 80.0);
        assert_eq!(metrics[9].value, 4.0);

        let importance = feature_importance(&table("Feature,Importance\nLOSS_RATIO,NaN\n"));
        let percent = importance.column("Importance_Percent").expect("percent column");
        assert_eq!(importance.rows()[0][percent], "");
    }

    #[test]
    fn risk_distribution_orders_by_urgency_and_skips_empty() {
        let scores = vec![score("C1", 75.0), score("C2", 30.0), score("C3", 45.0)];
        let rows = risk_distribution(&scores);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].risk_category, RiskCategory::High);
        assert_eq!(rows[0].company_count, 2);
        assert_eq!(rows[0].avg_ivi, 37.5);
        assert_eq!(rows[0].percentage, 66.7);
        assert_eq!(rows[1].risk_category, RiskCategory::Low);
        assert_eq!(rows[1].percentage, 33.3);
    }

    #[test]
    fn client_analysis_applies_defaults_for_absent_columns() {
        let scores = vec![score("C1", 70.0), score("C2", 41.25)];
        let analysis = client_analysis(
            &scores_table(&scores),
            &Table::default(),
            &Table::default(),
            &ColumnPresence::default(),
            &ExportDefaults::default(),
        )
        .expect("analysis builds");

        let future = analysis.column("FUTURE_IVI_SCORE").expect("future column");
        let improvement = analysis.column("IMPROVEMENT").expect("improvement column");
        let advice = analysis.column("RECOMMENDATIONS").expect("advice column");
        assert_eq!(analysis.rows()[0][future], "75");
        assert_eq!(analysis.rows()[1][future], "46.25");
        assert_eq!(analysis.rows()[1][improvement], "5");
        assert_eq!(analysis.rows()[0][advice], "Review and optimize");
    }

    #[test]
    fn client_analysis_left_joins_present_columns() {
        let scores = vec![score("C1", 70.0), score("C2", 50.0)];
        let predictions = table("CONT_NO,Future_IVI_Score\nC1,73.5\nC1,99\n");
        let recommendations = table("CONT_NO,Recommendations\nC2,Renegotiate premium\n");
        let presence = ColumnPresence::detect(&predictions, &recommendations);

        let analysis = client_analysis(
            &scores_table(&scores),
            &predictions,
            &recommendations,
            &presence,
            &ExportDefaults::default(),
        )
        .expect("analysis builds");

        assert_eq!(analysis.len(), 2);
        let future = analysis.column("Future_IVI_Score").expect("joined column");
        let advice = analysis.column("Recommendations").expect("joined column");
        let improvement = analysis.column("IMPROVEMENT").expect("default column");
        assert_eq!(analysis.rows()[0][future], "73.5");
        assert_eq!(analysis.rows()[1][future], "");
        assert_eq!(analysis.rows()[0][advice], "");
        assert_eq!(analysis.rows()[1][advice], "Renegotiate premium");
        assert_eq!(analysis.rows()[0][improvement], "5");
    }

    #[test]
    fn feature_importance_adds_percent_column() {
        let view = feature_importance(&table("Feature,Importance\nLOSS_RATIO,0.31234\nAGE,x\n"));
        assert_eq!(view.headers(), ["Feature", "Importance", "Importance_Percent"]);
        assert_eq!(view.rows()[0][2], "31.23");
        assert_eq!(view.rows()[1][2], "");

        assert!(feature_importance(&Table::default()).headers().is_empty());
    }

    #[test]
    fn provider_views_group_and_break_ties_alphabetically() {
        let providers = vec![
            provider("P1", "Gold", "Pharmacy", "Central"),
            provider("P2", "Gold", "Clinic", "Central"),
            provider("P3", "Gold", "Pharmacy", "Eastern"),
            provider("P4", "Silver", "Laboratory", "Eastern"),
            provider("P5", "Silver", "Hospital", "Western"),
        ];

        let networks = provider_analysis(&providers);
        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0].network, "Gold");
        assert_eq!(networks[0].provider_count, 3);
        assert_eq!(networks[0].most_common_practice, "Pharmacy");
        assert_eq!(networks[1].most_common_practice, "Hospital");

        let regions = provider_by_region(&providers);
        let counts: Vec<(&str, usize)> = regions
            .iter()
            .map(|row| (row.region.as_str(), row.provider_count))
            .collect();
        assert_eq!(counts, vec![("Central", 2), ("Eastern", 2), ("Western", 1)]);

        let info = provider_info(&providers).expect("info builds");
        assert_eq!(info.headers(), PROVIDER_INFO_HEADERS);
        assert_eq!(info.rows()[3][2], "Silver");
    }

    #[test]
    fn dax_measures_reference_exported_columns() {
        let measures = dax_measures(&ColumnPresence::default());
        assert_eq!(measures.len(), 10);
        assert!(measures[2].dax_formula.contains("= \"High\""));
        assert_eq!(
            measures[8].dax_formula,
            "AVERAGE(Future_Predictions[IMPROVEMENT])"
        );
    }
}
