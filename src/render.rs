use crate::workflows::dataset::{GenerationReport, RosterSource};
use crate::workflows::export::ExportManifest;
use crate::workflows::scoring::RiskCategory;

const LOWEST_CLIENTS_SHOWN: usize = 5;

pub(crate) fn render_generation(report: &GenerationReport) {
    let summary = &report.summary;

    println!("IVI dataset generation");
    match &report.roster_source {
        RosterSource::External(path) => {
            println!("Seed {} with provider roster {}", report.seed, path.display())
        }
        RosterSource::Synthetic => println!("Seed {} with a synthetic provider roster", report.seed),
    }

    println!("\nEntities");
    println!("- Corporate clients: {}", summary.total_companies);
    println!("- Members: {}", summary.total_members);
    println!("- Providers: {}", summary.total_providers);
    println!("- Claims: {}", summary.total_claims);
    println!("- Pre-authorizations: {}", summary.total_preauths);
    println!("- Calls: {}", summary.total_calls);

    println!("\nPortfolio");
    println!("- Average IVI: {:.2}", summary.avg_ivi_score);
    println!(
        "- Claimed {} / approved {}",
        summary.total_claimed_amount, summary.total_approved_amount
    );
    println!("- Claim approval rate: {:.2}%", summary.claim_approval_rate);
    println!(
        "- Pre-authorization approval rate: {:.2}%",
        summary.preauth_approval_rate
    );
    match summary.avg_satisfaction {
        Some(score) => println!("- Average satisfaction: {score:.2} / 5"),
        None => println!("- Average satisfaction: no responses"),
    }

    println!("\nRisk distribution");
    for category in RiskCategory::ordered() {
        let count = summary
            .risk_distribution
            .get(category.label())
            .copied()
            .unwrap_or(0);
        println!("- {}: {}", category.label(), count);
    }

    let mut lowest: Vec<_> = report.dataset.scores.iter().collect();
    lowest.sort_by(|a, b| a.ivi_score.total_cmp(&b.ivi_score));
    if !lowest.is_empty() {
        println!("\nLowest IVI clients");
        for score in lowest.into_iter().take(LOWEST_CLIENTS_SHOWN) {
            println!(
                "- {} {} | IVI {:.2} (H {:.2}, E {:.2}, U {:.2}) | {}",
                score.cont_no,
                score.company_name,
                score.ivi_score,
                score.h_score,
                score.e_score,
                score.u_score,
                score.risk_category
            );
        }
    }

    println!(
        "\n{} files written to {}",
        report.manifest.files.len(),
        report.manifest.directory.display()
    );
}

pub(crate) fn render_export(manifest: &ExportManifest) {
    println!("\nPower BI export");
    println!(
        "{} sheets, {} files written to {}",
        manifest.sheets.len(),
        manifest.files.len(),
        manifest.directory.display()
    );
    for file in &manifest.files {
        if let Some(name) = file.file_name() {
            println!("- {}", name.to_string_lossy());
        }
    }

    if !manifest.missing_inputs.is_empty() {
        let labels: Vec<&str> = manifest
            .missing_inputs
            .iter()
            .map(|input| input.label())
            .collect();
        println!("Optional inputs not found: {}", labels.join(", "));
    }

    let presence = &manifest.presence;
    let defaulted: Vec<&str> = [
        ("future IVI", presence.future_ivi.is_none()),
        ("improvement", presence.improvement.is_none()),
        ("recommendations", presence.recommendations.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    if defaulted.is_empty() {
        println!("Defaults applied: none");
    } else {
        println!("Defaults applied: {}", defaulted.join(", "));
    }
}
