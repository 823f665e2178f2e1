//! Contributi - command-line front end of the contribution engine
//!
//! Reads an INPS contribution statement (PDF, or a previously written JSON
//! dump of its periods), computes the contribution ledger, and writes a CSV
//! report next to the document. With `--serve` it runs the HTTP API instead.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inps_contributions::api::{AppState, create_router};
use inps_contributions::calculation::{ContributionEngine, decode_sex};
use inps_contributions::config::ConfigLoader;
use inps_contributions::extraction::{extractor_for, write_records_dump};
use inps_contributions::models::{ContractTransition, EngineConfig, Sex};
use inps_contributions::report::{CsvReportWriter, ReportTable, Summary, output_paths};

/// Command-line arguments for contributi
#[derive(Parser, Debug)]
#[command(name = "contributi")]
#[command(about = "Computes actual and theoretical INPS contribution days per year")]
#[command(version)]
struct Args {
    /// Statement to process (.pdf, or a .json records dump)
    #[arg(required_unless_present = "serve")]
    document: Option<PathBuf>,

    /// Permanent contract: with no value, for the whole career; with a
    /// DD/MM/YYYY date, from that date on
    #[arg(
        short = 't',
        long = "tempo-indeterminato",
        value_name = "DD/MM/YYYY",
        num_args = 0..=1,
        default_missing_value = "always"
    )]
    tempo_indeterminato: Option<String>,

    /// Overrides the sex decoded from the tax code
    #[arg(long, value_enum)]
    sex: Option<SexArg>,

    /// Directory holding a YAML rule book (defaults to the statutory rules)
    #[arg(long, value_name = "DIR")]
    rules: Option<PathBuf>,

    /// Skip the JSON dump of the extracted periods
    #[arg(long)]
    no_json: bool,

    /// Directory for the output files (defaults to the document's directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Run the HTTP API on this address instead of processing a document
    #[arg(long, value_name = "ADDR")]
    serve: Option<SocketAddr>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inps_contributions=info,contributi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let loader = match &args.rules {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("Failed to load rule book from {}", dir.display()))?,
        None => ConfigLoader::statutory(),
    };

    if let Some(addr) = args.serve {
        return serve(addr, loader).await;
    }

    let Some(document) = args.document.as_deref() else {
        bail!("No document given");
    };
    process_document(document, &args, &loader)
}

async fn serve(addr: SocketAddr, loader: ConfigLoader) -> Result<()> {
    let app = create_router(AppState::new(loader));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Contribution engine listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;
    Ok(())
}

fn process_document(document: &Path, args: &Args, loader: &ConfigLoader) -> Result<()> {
    let transition = ContractTransition::parse(args.tempo_indeterminato.as_deref())
        .context("Invalid --tempo-indeterminato value")?;

    let records = extractor_for(document)
        .and_then(|extractor| extractor.extract(document))
        .with_context(|| format!("Failed to extract periods from {}", document.display()))?;
    info!(
        document = %document.display(),
        general_regime = records.general_regime.len(),
        entertainment = records.entertainment.len(),
        "Extracted statement periods"
    );

    let sex = match args.sex {
        Some(sex) => sex.into(),
        None => decode_sex(records.identity.tax_code.as_deref()),
    };
    let config = EngineConfig::new(sex, transition);

    let ledger = ContributionEngine::from(loader)
        .compute(&records, &config)
        .context("Contribution calculation failed")?;

    let paths = output_paths(&records.identity, document, args.output_dir.as_deref());
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut outputs = Vec::new();
    if !args.no_json && paths.records_dump != document {
        write_records_dump(&records, &paths.records_dump)
            .context("Failed to write the records dump")?;
        outputs.push(paths.records_dump.clone());
    }

    let table = ReportTable::from_ledger(&ledger);
    CsvReportWriter::new()
        .write(&table, &paths.report)
        .context("Failed to write the report")?;
    outputs.push(paths.report.clone());

    print!("{}", Summary::new(&records.identity, &ledger, outputs));
    Ok(())
}
