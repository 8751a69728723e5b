use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tagshop::application::context::ShopContext;
use tagshop::application::engine::TagShopEngine;
use tagshop::config::ShopConfig;
use tagshop::domain::ownership::Identity;
use tagshop::domain::ports::{LedgerBox, OwnershipStoreBox};
use tagshop::error::ShopError;
use tagshop::infrastructure::in_memory::{InMemoryLedger, InMemoryOwnershipStore};
use tagshop::infrastructure::notifier::TracingNotifier;
use tagshop::interfaces::csv::ownership_writer::OwnershipWriter;
use tagshop::interfaces::csv::request_reader::{RequestAction, RequestReader, ShopRequest};
use tagshop::logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input requests CSV file (`action, identity, tag`)
    input: PathBuf,

    /// Shop configuration file (YAML)
    #[arg(long)]
    config: PathBuf,

    /// Path to persistent ownership database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ShopConfig::load(&cli.config).into_diagnostic()?;
    logging::init(&config.log_level);

    let mut context = config.to_context().into_diagnostic()?;
    let store = open_store(cli.db_path.as_deref(), &mut context)?;

    let ledger: Option<LedgerBox> = if config.economy.enabled {
        let ledger = InMemoryLedger::new();
        for (identity, balance) in &config.economy.starting_balances {
            ledger.deposit(&Identity::new(identity.as_str()), *balance).await;
        }
        Some(Box::new(ledger))
    } else {
        None
    };

    let engine = TagShopEngine::new(context, store, ledger, Box::new(TracingNotifier));

    // Display labels live with the caller, one per identity seen in the input.
    let mut labels: HashMap<Identity, String> = HashMap::new();

    let file = File::open(cli.input).into_diagnostic()?;
    for request in RequestReader::new(file).requests() {
        match request {
            Ok(request) => {
                if let Err(e) = process_request(&engine, &mut labels, request).await {
                    eprintln!("Error processing request: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading request: {}", e);
            }
        }
    }

    let data = engine.all_data().await.into_diagnostic()?;
    let stdout = io::stdout();
    OwnershipWriter::new(stdout.lock())
        .write_all(&data)
        .into_diagnostic()?;

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<&Path>, context: &mut ShopContext) -> Result<OwnershipStoreBox> {
    use tagshop::infrastructure::rocksdb::RocksDbOwnershipStore;

    match db_path {
        Some(path) => {
            let store = RocksDbOwnershipStore::open(path).into_diagnostic()?;
            context.settings.data_location = path.to_path_buf();
            Ok(Box::new(store))
        }
        None => Ok(Box::new(InMemoryOwnershipStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<&Path>, _context: &mut ShopContext) -> Result<OwnershipStoreBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryOwnershipStore::new()))
}

async fn process_request(
    engine: &TagShopEngine,
    labels: &mut HashMap<Identity, String>,
    request: ShopRequest,
) -> tagshop::error::Result<()> {
    let identity = Identity::new(request.identity);
    let label = labels
        .entry(identity.clone())
        .or_insert_with(|| identity.name().to_string());

    match request.action {
        RequestAction::Buy => {
            let tag_id = request
                .tag
                .ok_or_else(|| ShopError::InvalidRequest("buy requires a tag".to_string()))?;
            // Decorate the bare name so a replaced tag does not stay in the label.
            let purchase = engine.buy(&identity, tag_id, identity.name()).await?;
            purchase.label.apply(label);
        }
        RequestAction::Sell => {
            let sale = engine.sell(&identity).await?;
            sale.label.apply(label);
        }
    }

    tracing::info!(identity = %identity, label = %label, "display label updated");
    Ok(())
}
