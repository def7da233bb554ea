use crate::*;

pub fn handle_info_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Insights { view } => {
            let records = load_dataset(&settings.dataset_path, settings.delimiter)?;
            let report = build_insights(&records, *view);
            print_one(cli.json, report, |r| render_insights(r, *view))?;
        }
        Commands::About => {
            print_one(cli.json, about_report(), |a| {
                format!(
                    "{} {}\n\nObjective\n{}\n\nModel\n{}\n\nDataset\n{}\n\nDisclaimer\n{}",
                    a.name, a.version, a.objective, a.model, a.dataset, a.disclaimer
                )
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn about_report() -> AboutReport {
    AboutReport {
        name: "Cardio Risk Predictor".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        objective: "Predict the presence of cardiovascular disease from medical history and \
                    demographic details, so that early detection can prompt timely intervention \
                    and lifestyle changes."
            .to_string(),
        model: "Pre-trained binary classifier (random forest) loaded from an exported artifact."
            .to_string(),
        dataset: "70,000 patient records: objective features (age, height, weight, gender), \
                  examination features (systolic and diastolic BP, cholesterol, glucose) and \
                  subjective features (smoking, alcohol, physical activity)."
            .to_string(),
        disclaimer: "For educational purposes only. Predictions are based on statistical \
                     patterns and must not replace professional medical advice. Always consult \
                     a qualified healthcare provider for diagnosis and treatment."
            .to_string(),
    }
}

fn render_insights(r: &InsightsReport, view: InsightsView) -> String {
    let mut lines = vec![format!(
        "view: {}\ntotal records: {}",
        InsightsReport::view_name(view),
        r.total_records
    )];

    if let Some(rows) = &r.preview {
        lines.push("\nfirst rows (age in days)".to_string());
        lines.push("age\tgender\theight\tweight\tap_hi\tap_lo\tchol\tgluc\tsmoke\talco\tactive\tcardio".to_string());
        for x in rows {
            lines.push(format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                x.age,
                x.gender,
                x.height,
                x.weight,
                x.ap_hi,
                x.ap_lo,
                x.cholesterol,
                x.gluc,
                x.smoke,
                x.alco,
                x.active,
                x.cardio
            ));
        }
    }
    if let Some(target) = &r.target_distribution {
        lines.push("\ntarget distribution (cardio)".to_string());
        for c in target {
            lines.push(format!("{}\t{}\t{:.1}%", c.value, c.count, c.percent));
        }
    }
    if let Some(gender) = &r.gender_distribution {
        lines.push("\ngender distribution (1=women, 2=men)".to_string());
        for c in gender {
            lines.push(format!("{}\t{}\t{:.1}%", c.value, c.count, c.percent));
        }
    }
    if let Some(chol) = &r.cholesterol_by_cardio {
        lines.push("\ncholesterol vs cardio (level, no disease, disease)".to_string());
        for c in chol {
            lines.push(format!("{}\t{}\t{}", c.value, c.negative, c.positive));
        }
    }
    if let Some(means) = &r.body_by_cardio {
        lines.push("\nbody measures by cardio (class, n, height, weight, bmi)".to_string());
        for m in means {
            lines.push(format!(
                "{}\t{}\t{:.1}\t{:.1}\t{:.1}",
                m.cardio, m.count, m.mean_height, m.mean_weight, m.mean_bmi
            ));
        }
    }
    if let Some(bins) = &r.age_histogram {
        lines.push("\nage distribution in years (range, no disease, disease)".to_string());
        for b in bins {
            lines.push(format!(
                "{:.1}-{:.1}\t{}\t{}",
                b.start, b.end, b.negative, b.positive
            ));
        }
    }
    lines.join("\n")
}
