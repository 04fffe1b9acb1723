use clap::{Parser, Subcommand};
use karigar_ingest::types::{EnrichmentOutput, MappingResolution, OrderParseOutput};
use karigar_ingest::{IngestConfig, Ingestor, Upload, group_by_karigar};
use serde_json::json;
use std::path::{Path, PathBuf};

mod config;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "karigar", version, about = "Parse order sheets and karigar mapping workbooks")]
struct Cli {
    /// JSON file with ingestion settings; KARIGAR_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an order sheet (CSV or Excel)
    Orders {
        file: PathBuf,
        /// Workbook sheet holding the orders (defaults to the first)
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Parse a karigar mapping workbook (Excel, PDF or CSV)
    Mapping { file: PathBuf },
    /// Parse both files and attach karigar and generic name to every order
    Enrich {
        #[arg(long)]
        orders: PathBuf,
        /// Workbook sheet holding the orders (defaults to the first)
        #[arg(long)]
        orders_sheet: Option<String>,
        #[arg(long)]
        mapping: PathBuf,
        /// Group the enriched orders by karigar
        #[arg(long)]
        grouped: bool,
    },
    /// Print JSON schemas for the config and every output
    Schema,
}

async fn read_upload(path: &Path) -> Result<Upload, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Upload::new(file_name, bytes))
}

async fn read_orders(
    path: &Path,
    sheet: Option<String>,
) -> Result<Upload, Box<dyn std::error::Error>> {
    let upload = read_upload(path).await?;
    Ok(match sheet {
        Some(sheet) => upload.with_sheet(sheet),
        None => upload,
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();
    let cli = Cli::parse();

    let config = config::Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");
    let ingestor = Ingestor::native(config.ingest);

    match cli.command {
        Command::Orders { file, sheet } => {
            let output = ingestor.parse_orders(read_orders(&file, sheet).await?).await?;
            for warning in &output.warnings {
                tracing::warn!("{}", warning.message());
            }
            print_json(&output)?;
        }
        Command::Mapping { file } => {
            let resolution = ingestor.parse_mapping(read_upload(&file).await?).await?;
            for skipped in resolution.failed_sheets() {
                if let Some(error) = &skipped.error {
                    tracing::warn!(sheet = %skipped.sheet_name, "{}", error);
                }
            }
            print_json(&resolution)?;
        }
        Command::Enrich {
            orders,
            orders_sheet,
            mapping,
            grouped,
        } => {
            let orders_upload = read_orders(&orders, orders_sheet).await?;
            let mapping_upload = read_upload(&mapping).await?;
            let (orders, mapping) = tokio::try_join!(
                ingestor.parse_orders(orders_upload),
                ingestor.parse_mapping(mapping_upload),
            )?;

            let output = ingestor.enrich(&mapping.workbook, &orders.orders);
            if output.diagnostics.has_mapping_but_no_matches {
                tracing::warn!(
                    samples = ?output.diagnostics.samples,
                    "no order design matched the mapping; compare the sample keys"
                );
            }
            if grouped {
                print_json(&json!({
                    "groups": group_by_karigar(&output.orders),
                    "diagnostics": output.diagnostics,
                }))?;
            } else {
                print_json(&output)?;
            }
        }
        Command::Schema => {
            print_json(&json!({
                "config": schemars::schema_for!(IngestConfig),
                "orderParseOutput": schemars::schema_for!(OrderParseOutput),
                "mappingResolution": schemars::schema_for!(MappingResolution),
                "enrichmentOutput": schemars::schema_for!(EnrichmentOutput),
            }))?;
        }
    }

    Ok(())
}
