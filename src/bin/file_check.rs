use clap::Parser;
use traefik_doctor::core::{doctor, report, ConfigProvider, Target};
use traefik_doctor::domain::model::{Dialect, OutputFormat};
use traefik_doctor::utils::error::Result;
use traefik_doctor::utils::{logger, validation, validation::Validate};

/// Validate a dynamic Traefik configuration file (YAML or JSON) on disk.
#[derive(Parser, Debug)]
#[command(name = "traefik-file-check")]
struct FileCheckArgs {
    /// Path to the dynamic configuration file
    path: String,

    /// Copy the file contents to this path before validating
    #[arg(long)]
    save_raw: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    log_json: bool,
}

impl ConfigProvider for FileCheckArgs {
    fn target(&self) -> Target {
        Target::File {
            path: self.path.clone(),
        }
    }

    fn timeout_seconds(&self) -> u64 {
        // unused for files
        0
    }

    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn payload_dialect(&self) -> Dialect {
        traefik_doctor::core::source::dialect_for_path(&self.path)
    }

    fn save_raw_path(&self) -> Option<&str> {
        self.save_raw.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }
}

impl Validate for FileCheckArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_path("path", &self.path)?;
        if let Some(path) = &self.save_raw {
            validation::validate_path("save_raw", path)?;
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = FileCheckArgs::parse();

    logger::init(args.verbose, args.log_json);
    tracing::info!("📁 Checking configuration file: {}", args.path);

    if let Err(e) = args.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = doctor::inspect(&args).await;
    if let Err(e) = &result {
        tracing::error!("❌ Check failed: {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
    }

    let (rendered, exit_code) = report::conclude(&result, args.output_format());
    print!("{}", rendered);
    std::process::exit(exit_code);
}
