use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use swagger_tailor::session::Session;
use swagger_tailor::source::display_name;
use swagger_tailor::{
    size_in_kb, FileState, SessionController, SessionError, Settings, Severity, SourceFile, SpecToolError,
    SwaggerValidatorClient, ValidationState,
};
use tracing::{warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "swagger-tailor")]
#[command(version, about = "Apply quick fixes to an OpenAPI/Swagger file and export it as YAML", long_about = None)]
struct Cli {
    /// Specification file (JSON, or YAML when named .yaml/.yml)
    file: PathBuf,

    /// Override info.version
    #[arg(long)]
    set_version: Option<String>,

    /// Declare Time.hour and Time.minute as int32 integers
    #[arg(long)]
    fix_time_object: bool,

    /// Directory the modified YAML is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Name the output `<file>-modified-<date>.yaml` instead of `<product>-api.<version>.yaml`
    #[arg(long)]
    dated_name: bool,

    /// Print the modified YAML instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Do not send the document to the schema-validation service
    #[arg(long)]
    skip_remote_validation: bool,

    /// TOML settings file
    #[arg(long, env = "SWAGGER_TAILOR_CONFIG")]
    config: Option<PathBuf>,

    /// Schema-validation endpoint
    #[arg(long, env = "SWAGGER_TAILOR_VALIDATOR_URL")]
    validator_url: Option<String>,

    /// Timeout for the validation request, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Product name used in the output file name
    #[arg(long, env = "SWAGGER_TAILOR_PRODUCT")]
    product: Option<String>,
}

impl Cli {
    fn settings(&self) -> Result<Settings, SpecToolError> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(url) = &self.validator_url {
            settings.validator_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout_secs = secs;
        }
        if let Some(product) = &self.product {
            settings.product_name = product.clone();
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, SpecToolError> {
    let settings = cli.settings()?;

    let controller = if cli.skip_remote_validation {
        SessionController::without_remote_validation()
    } else {
        let client = SwaggerValidatorClient::new(&settings.validator_url, settings.request_timeout())?;
        SessionController::new(Arc::new(client))
    };

    let source = SourceFile::read(&cli.file).unwrap_or_else(|e| {
        warn!(file = %cli.file.display(), "Failed to read file: {}", e);
        SourceFile::new(display_name(&cli.file), "")
    });

    controller.load_file(source).await?;

    controller.with_session(|session: &mut Session| -> Result<ExitCode, SpecToolError> {
        if session.state() != FileState::Loaded {
            eprintln!("✗ {}", session.error().unwrap_or("Failed to load specification"));
            print_diagnostics(session);
            return Ok(ExitCode::FAILURE);
        }

        if let Some(version) = &cli.set_version {
            session.set_version(version.clone());
        }
        session.set_time_object_fix(cli.fix_time_object);

        if !cli.stdout {
            print_summary(session);
            print_diagnostics(session);
        }

        if !session.modified_yaml().is_empty() && !session.output_looks_like_openapi() {
            warn!("Modified output no longer declares an openapi or swagger version");
        }

        let artifact = if cli.dated_name {
            session.download_dated(Local::now().date_naive())
        } else {
            session.download(&settings.product_name)
        };
        let artifact = match artifact {
            Ok(artifact) => artifact,
            Err(SessionError::NothingToDownload) => {
                eprintln!("✗ No output generated. No YAML content to download.");
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => return Err(e.into()),
        };

        if cli.stdout {
            print!("{}", session.modified_yaml());
        } else {
            let path = artifact.save_to(&cli.output_dir)?;
            println!("✓ Saved {} ({})", path.display(), artifact.mime_type);
        }
        Ok(ExitCode::SUCCESS)
    })
}

fn print_summary(session: &Session) {
    let Some(original) = session.original() else {
        return;
    };

    println!("=== Swagger Tailor ===\n");
    println!("✓ Loaded: {}", session.file_name().unwrap_or_default());
    if let (Some(dialect), Some(version)) = (original.dialect(), original.dialect_version()) {
        println!("  Format:      {} {}", dialect.as_str(), version);
    }
    println!("  Title:       {}", original.title().unwrap_or_default());
    println!("  Operations:  {}", original.operation_count());
    println!("  Size:        {}", size_in_kb(session.modified_yaml()));
    println!("  Version:     {}", session.config().version_label());
    println!("  Time fix:    {}", session.config().time_fix_label());
    println!();
}

fn print_diagnostics(session: &Session) {
    match session.validation() {
        ValidationState::NotRequested => {}
        ValidationState::Pending => println!("… Schema validation still running"),
        ValidationState::Unavailable { reason } => {
            println!("! Schema validation unavailable: {}", reason)
        }
        ValidationState::Complete(result) if result.is_clean() => {
            println!("✓ No schema validation problems found")
        }
        ValidationState::Complete(result) => {
            if !result.messages.is_empty() {
                println!("Messages:");
                for message in &result.messages {
                    println!("  - {}", message);
                }
            }
            if !result.schema_validation_messages.is_empty() {
                println!(
                    "Schema validation: {} error(s), {} warning(s)",
                    result.count_by_level(Severity::Error),
                    result.count_by_level(Severity::Warning)
                );
                for finding in &result.schema_validation_messages {
                    println!("  - {}", finding);
                }
            }
        }
    }
}
