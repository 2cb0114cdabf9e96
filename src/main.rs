use clap::Parser;
use imagelyn::utils::console::TracingSink;
use imagelyn::utils::error::ImagelynError;
use imagelyn::utils::{logger, validation::Validate};
use imagelyn::{CliConfig, Session};

fn main() {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (若有指定)
    let toml = match cli.load_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let format = toml
        .as_ref()
        .map(|config| logger::LogFormat::from_name(config.log_format()))
        .unwrap_or_default();
    let level = logger::resolve_level(cli.verbose, toml.as_ref().map(|c| c.log_level()));
    logger::init_logger(format, level);

    tracing::info!("🚀 Starting imagelyn");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = cli.settings(toml.as_ref());
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let sink = TracingSink;
    let mut session = Session::new(settings, &sink);

    match run(&mut session) {
        Ok(reports) => {
            for report in reports {
                println!("{}\n", report);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            std::process::exit(e.exit_code());
        }
    }
}

fn run(session: &mut Session<'_>) -> Result<Vec<String>, ImagelynError> {
    session.load_files()?;
    session.register_clients()?;

    if session.settings().interactive {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        session.choose_location(&mut stdin.lock(), &mut stdout)?;
    }

    session.generate_reports()
}
