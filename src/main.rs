use clap::Parser;
use traefik_doctor::core::{doctor, report, ConfigProvider};
use traefik_doctor::utils::{logger, validation::Validate};
use traefik_doctor::{CliConfig, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init(cli.verbose, cli.log_json);

    tracing::info!("Starting traefik-doctor");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading settings from: {}", path);
            let mut config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            config.apply_overrides(cli.timeout, cli.save_raw.clone(), cli.format);
            check(&config).await
        }
        None => check(&cli).await,
    };

    std::process::exit(exit_code);
}

async fn check<C: ConfigProvider + Validate>(config: &C) -> i32 {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        return 1;
    }

    let result = doctor::inspect(config).await;

    if let Err(e) = &result {
        tracing::error!(
            "❌ Inspection failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("💡 {}", e.recovery_suggestion());
    }

    let (rendered, exit_code) = report::conclude(&result, config.output_format());
    print!("{}", rendered);
    exit_code
}
