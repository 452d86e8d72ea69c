use super::{ExportInputs, JOIN_KEY};
use crate::tabular::Table;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    #[serde(rename = "Many-to-One")]
    ManyToOne,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: Vec<String>,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub from_table: &'static str,
    pub from_column: &'static str,
    pub to_table: &'static str,
    pub to_column: &'static str,
    pub cardinality: Cardinality,
}

/// Table and relationship layout written to `data_model.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataModel {
    pub tables: Vec<TableSchema>,
    pub relationships: Vec<Relationship>,
}

impl DataModel {
    /// Column lists reflect the inputs as read; absent optional tables list no columns.
    pub fn describe(inputs: &ExportInputs, provider_info: &Table) -> Self {
        let schema = |name: &'static str, table: &Table, description: &'static str| TableSchema {
            name,
            columns: table.headers().to_vec(),
            description,
        };
        let towards_scores = |from_table: &'static str| Relationship {
            from_table,
            from_column: JOIN_KEY,
            to_table: "IVI_Scores",
            to_column: JOIN_KEY,
            cardinality: Cardinality::ManyToOne,
        };

        Self {
            tables: vec![
                schema(
                    "IVI_Scores",
                    &inputs.score_table,
                    "Main fact table containing IVI scores for each company",
                ),
                schema(
                    "Future_Predictions",
                    &inputs.predictions,
                    "Predicted future IVI scores and improvements",
                ),
                schema(
                    "Recommendations",
                    &inputs.recommendations,
                    "Recommended actions for each company",
                ),
                schema(
                    "Feature_Importance",
                    &inputs.feature_importance,
                    "Feature importance for IVI model",
                ),
                schema(
                    "Provider_Info",
                    provider_info,
                    "Healthcare provider information",
                ),
            ],
            relationships: vec![
                towards_scores("Future_Predictions"),
                towards_scores("Recommendations"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationships_point_at_scores_many_to_one() {
        let inputs = ExportInputs {
            score_table: Table::new(["CONT_NO", "IVI_SCORE"]),
            ..ExportInputs::default()
        };
        let model = DataModel::describe(&inputs, &Table::new(["Prov Code"]));

        assert_eq!(model.tables.len(), 5);
        assert_eq!(model.tables[0].columns, vec!["CONT_NO", "IVI_SCORE"]);
        assert!(model.tables[1].columns.is_empty());

        let json = serde_json::to_value(&model).expect("model encodes");
        let first = &json["relationships"][0];
        assert_eq!(first["from_table"], "Future_Predictions");
        assert_eq!(first["to_table"], "IVI_Scores");
        assert_eq!(first["to_column"], "CONT_NO");
        assert_eq!(first["cardinality"], "Many-to-One");
        assert_eq!(json["relationships"][1]["from_table"], "Recommendations");
    }
}
