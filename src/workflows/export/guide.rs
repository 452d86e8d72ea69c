use super::bundle::{EXPORT_WORKBOOK, MODEL_FILE};
use chrono::{DateTime, Utc};

/// Markdown walkthrough for building the report from the exported files.
pub fn implementation_guide(generated_at: DateTime<Utc>) -> String {
    let timestamp = generated_at.format("%Y-%m-%d %H:%M:%S UTC");
    format!(
        r#"# Power BI Implementation Guide for the IVI Dashboard

## Overview
Build the Intelligent Value Index (IVI) dashboard in Power BI Desktop from the
files in this directory.

## Data Files

| File | Contents |
|------|----------|
| `{EXPORT_WORKBOOK}` | Every sheet below in one workbook |
| `ivi_scores.csv` | IVI, H, E and U scores per corporate client |
| `future_predictions.csv` | Predicted IVI per client (may be empty) |
| `recommendations.csv` | Recommended action per client (may be empty) |
| `feature_importance.csv` | Model feature weights with `Importance_Percent` |
| `provider_info.csv` | Provider roster |
| `client_analysis.csv` | Scores joined with predictions and recommendations |
| `{MODEL_FILE}` | Tables, columns and relationships |

## Step 1: Import
1. Get Data, then Excel, and select `{EXPORT_WORKBOOK}`.
2. Tick every sheet in the Navigator and load.

## Step 2: Relationships
In the Model view relate on `CONT_NO`:
- `Future_Predictions[CONT_NO]` to `IVI_Scores[CONT_NO]`, many-to-one.
- `Recommendations[CONT_NO]` to `IVI_Scores[CONT_NO]`, many-to-one.

## Step 3: Measures
The `DAX_Measures` sheet lists each measure with its formula. For example:

```dax
Total Companies = COUNTROWS(IVI_Scores)
Average IVI = AVERAGE(IVI_Scores[IVI_SCORE])
High Risk Count =
CALCULATE(COUNTROWS(IVI_Scores), IVI_Scores[RISK_CATEGORY] = "High")
Risk Percentage = DIVIDE([High Risk Count], [Total Companies], 0) * 100
```

## Step 4: Pages
**Executive summary**
- KPI cards: Total Companies, Average IVI, High Risk Count, Projected Improvement.
- Donut of `Risk_Distribution[Company_Count]` by `Risk_Category`
  (High red, Medium amber, Low green).
- Clustered bars of average H, E and U.
- Table of the ten lowest IVI clients with their recommendation.

**Client detail**
- Matrix of `CONT_NO` against H, E, U and IVI with conditional formatting on IVI.
- Current versus projected IVI from `Client_Analysis`.
- Bars of `Feature_Importance[Importance_Percent]` by feature.

**Provider network**
- Map of `Provider_By_Region[Provider_Count]` by region.
- Treemap of `Provider_Analysis[Provider_Count]` by network.
- Table of `Provider_Info`.

## Step 5: Slicers
Risk category, provider network, provider region and an IVI range slider (0-100).

## Step 6: Theme
Primary `#0066CC`, high risk `#FF4444`, medium risk `#FFAA00`, low risk `#44AA44`,
background `#FFFFFF`, text `#1A1A1A`.

## Refresh
Re-run the export and refresh the dataset, or schedule a refresh in the Power BI Service.

---
Generated: {timestamp}
"#
    )
}
