use crate::core::form::SessionDraft;
use crate::utils::validation::{validate_path, Validate};
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "smart-hydration")]
#[command(about = "Estimate fluid intake for one exercise session")]
pub struct CliConfig {
    /// Path to the model artifact bundle (JSON)
    #[arg(long)]
    pub artifact: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub age: Option<i64>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub exercise_type: Option<String>,

    /// Exercise duration in minutes
    #[arg(long)]
    pub duration: Option<f64>,

    /// Ambient temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub weight: Option<f64>,

    #[arg(long)]
    pub height: Option<f64>,

    /// Distance in km, used only for distance-sensitive exercise types
    #[arg(long)]
    pub distance: Option<f64>,

    /// Print the options the loaded model accepts and exit
    #[arg(long)]
    pub list_options: bool,

    /// Print the model input row as CSV
    #[arg(long)]
    pub show_features: bool,

    /// Derive features without running the model
    #[arg(long)]
    pub dry_run: bool,

    /// Print the recommendation as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn session_draft(&self) -> SessionDraft {
        SessionDraft {
            age: self.age,
            gender: self.gender.clone(),
            exercise_type: self.exercise_type.clone(),
            duration_minutes: self.duration,
            temperature_c: self.temperature,
            weight_kg: self.weight,
            height_cm: self.height,
            distance_km: self.distance,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(artifact) = &self.artifact {
            validate_path("--artifact", artifact)?;
        }
        if let Some(config) = &self.config {
            validate_path("--config", config)?;
        }
        self.session_draft().check_bounds()
    }
}
