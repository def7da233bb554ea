use crate::*;

pub fn handle_runtime_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Predict(args) => {
            let input = PatientInput::from(args);
            // Reject bad input before paying for the artifact load.
            input.validate()?;
            let artifact = shared_artifact(&settings.model_path)?;
            let report = assess(artifact, &input)?;
            print_one(cli.json, report, render_report)?;
        }
        Commands::Session => {
            if cli.json {
                anyhow::bail!("session is interactive and has no --json output");
            }
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_session(
                stdin.lock(),
                stdout.lock(),
                shared_cache(),
                &settings.model_path,
            )?;
        }
        Commands::Model => {
            let artifact = shared_artifact(&settings.model_path)?;
            let report = ModelReport {
                path: artifact.path.display().to_string(),
                kind: artifact.model.kind(),
                classes: artifact.model.classes().to_vec(),
                estimators: artifact.model.estimator_count(),
                features: artifact.features.clone(),
            };
            print_one(cli.json, report, |r| {
                format!(
                    "path: {}\nkind: {}\nclasses: {:?}\nestimators: {}\nfeatures: {}",
                    r.path,
                    r.kind,
                    r.classes,
                    r.estimators,
                    r.features.join(", ")
                )
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
