use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use nftcart::application::{CartViewModel, Completion, PaymentViewModel, UpdateContext};
use nftcart::infrastructure::in_memory::InMemoryNftService;
use nftcart::interfaces::csv::cart_reader::CartItemReader;
use nftcart::interfaces::csv::currency_reader::CurrencyReader;
use nftcart::interfaces::summary::{CheckoutSummary, SummaryWriter};
use nftcart::logger::init_cli_logger;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Plays one checkout session against an in-memory marketplace backend.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cart items CSV file (id,name,price,rating,images)
    cart: PathBuf,

    /// Accepted currencies CSV file (id,title,name)
    #[arg(long)]
    currencies: PathBuf,

    /// Currency id to pay with. The payment is skipped when absent.
    #[arg(long)]
    currency: Option<String>,

    /// Remove an item from the cart before paying. Can be repeated.
    #[arg(long = "remove", value_name = "ID")]
    remove: Vec<String>,

    /// Simulated backend latency in milliseconds.
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Make the cart request fail.
    #[arg(long)]
    fail_cart: bool,

    /// Make the currency request fail.
    #[arg(long)]
    fail_currencies: bool,

    /// Make the payment request fail.
    #[arg(long)]
    fail_payment: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn keep_valid<T>(rows: impl Iterator<Item = nftcart::error::Result<T>>, kind: &str) -> Vec<T> {
    rows.filter_map(|row| match row {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Skipping invalid {} row", kind);
            None
        }
    })
    .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let items = keep_valid(
        CartItemReader::new(File::open(&cli.cart).into_diagnostic()?).items(),
        "cart item",
    );
    let currencies = keep_valid(
        CurrencyReader::new(File::open(&cli.currencies).into_diagnostic()?).currencies(),
        "currency",
    );

    let service = InMemoryNftService::new(items, currencies)
        .with_latency(Duration::from_millis(cli.latency_ms));
    service.fail_cart(cli.fail_cart);
    service.fail_currencies(cli.fail_currencies);
    service.fail_payment(cli.fail_payment);
    let service = Arc::new(service);

    // Network completions hop back onto this task through the queue.
    let (context, mut updates) = UpdateContext::queued();

    let cart = CartViewModel::new(service.clone(), context.clone());
    cart.items()
        .subscribe(|items| debug!(count = items.len(), "Cart items changed"));
    if cart.on_screen_load().await.into_diagnostic()? == Completion::Failed {
        warn!("Cart could not be loaded");
    }
    updates.drain();

    for id in &cli.remove {
        if !cart.remove_item(id) {
            warn!(id = %id, "Item is not in the cart");
        }
    }
    let total = cart.total_price().into_diagnostic()?;
    info!(items = cart.count(), %total, "Cart ready");

    let payment = PaymentViewModel::new(service.clone(), service, context);
    payment
        .is_loading()
        .subscribe(|loading| debug!(loading, "Loading flag changed"));
    payment
        .payment_status()
        .subscribe(|status| info!(%status, "Payment status"));
    if payment.on_screen_appear().await.into_diagnostic()? == Completion::Failed {
        warn!("Currencies could not be loaded");
    }
    updates.drain();

    if let Some(id) = &cli.currency
        && !payment.select_currency(id)
    {
        warn!(currency = %id, "Currency is not offered");
    }
    if let Some(pending) = payment.submit_payment() {
        pending.await.into_diagnostic()?;
        updates.drain();
    }

    let summary = CheckoutSummary::collect(&cart, &payment).into_diagnostic()?;
    let writer = SummaryWriter::new(io::stdout().lock());
    match cli.format {
        OutputFormat::Csv => writer.write_csv(&summary),
        OutputFormat::Json => writer.write_json(&summary),
    }
    .into_diagnostic()?;

    Ok(())
}
