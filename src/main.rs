use anyhow::Context;
use clap::Parser;
use gpa_calc::utils::error::ErrorSeverity;
use gpa_calc::utils::{logger, validation::Validate};
use gpa_calc::{CliConfig, GpaError, GpaReport, GpaSession, OutputFormat, TomlConfig, TranscriptFile};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入設定檔（未指定時使用預設值），合併 CLI 參數後才決定日誌格式
    let mut config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };
    cli.apply_overrides(&mut config);
    logger::init_logger(config.output.format, cli.verbose);

    tracing::info!("Starting gpa-calc");
    if let Some(path) = &cli.config {
        tracing::info!("📁 Loaded configuration from: {}", path);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = cli.validate().and_then(|_| config.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&cli, &config) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ GPA calculation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

fn run(cli: &CliConfig, config: &TomlConfig) -> Result<String, GpaError> {
    let mut session = GpaSession::from_config(config)?;
    for prefix in &cli.exempt {
        session.add_exemption(prefix)?;
    }
    for prefix in &cli.include {
        session.remove_exemption(prefix);
    }

    let request = cli.request()?;
    let transcript = TranscriptFile::open(cli.transcript_path(), config.transcript.sheet.clone())?;
    let outcome = session.calculate_from(&transcript, &request)?;
    let report = GpaReport::new(&session, &request, &outcome);

    match config.output.format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => report.to_json(),
    }
}
