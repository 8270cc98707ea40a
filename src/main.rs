use clap::Parser;
use smart_hydration::core::report::{render_options, render_recommendation, write_feature_table};
use smart_hydration::utils::{logger, validation::Validate};
use smart_hydration::{
    ArtifactCache, CliConfig, HydrationConfig, HydrationError, HydrationEstimator,
    LocalArtifactStore, SessionForm,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match &cli.config {
        Some(path) => match HydrationConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => HydrationConfig::default(),
    };

    let verbose = cli.verbose || file_config.verbose();
    if cli.json_logs || file_config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting smart-hydration");
    tracing::debug!("CLI config: {:?}", cli);

    let validated = cli.validate().and_then(|_| file_config.validate());
    if let Err(e) = validated {
        exit_with(e);
    }

    if let Err(e) = run(&cli, &file_config) {
        exit_with(e);
    }

    Ok(())
}

fn run(cli: &CliConfig, file_config: &HydrationConfig) -> smart_hydration::Result<()> {
    let artifact_path = cli
        .artifact
        .clone()
        .unwrap_or_else(|| file_config.artifact_path().to_string());
    let cache = ArtifactCache::new(LocalArtifactStore::default(), artifact_path);
    let artifact = cache.get_or_load()?;

    if cli.list_options {
        print!("{}", render_options(&artifact));
        return Ok(());
    }

    let draft = cli.session_draft().or(&file_config.session_defaults());
    let session = SessionForm::new(&artifact).submit(&draft)?;
    tracing::debug!("Session: {:?}", session);

    let estimator = HydrationEstimator::new(&artifact);

    if cli.show_features || cli.dry_run {
        let features = estimator.features(&session);
        write_feature_table(&artifact, &features, std::io::stdout().lock())?;
    }

    if cli.dry_run {
        tracing::info!("Dry run, model not invoked");
        return Ok(());
    }

    let recommendation = estimator.estimate(&session)?;
    tracing::info!(
        liters = recommendation.liters.liters(),
        long_distance = recommendation.long_distance,
        "Estimate ready"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        println!("💧 {}", render_recommendation(&recommendation));
    }

    Ok(())
}

fn exit_with(e: HydrationError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code().max(1));
}
