use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use procura_cache::{MultiSourceLoader, SourceCache};
use procura_core::{Actor, Page};
use procura_service::{CommandSubmitter, Transition};
use procura_transport::SheetClient;
use procura_view::ViewConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "procura")]
#[command(about = "Procurement request tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct ViewArgs {
    /// Case-insensitive text filter over the visible columns
    #[arg(short, long)]
    search: Option<String>,
    /// Page to show (clamped into range)
    #[arg(short, long, default_value_t = 1)]
    page: usize,
    /// Rows per page (defaults to the page's own capacity)
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Args)]
struct SubmitArgs {
    /// Update this existing request instead of creating a new one
    #[arg(long)]
    id: Option<String>,
    #[arg(long, default_value = "")]
    department: String,
    #[arg(long, default_value = "")]
    office: String,
    /// What is being requested
    #[arg(long)]
    items: String,
    #[arg(long, default_value = "")]
    part_of: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    qty: u64,
    #[arg(long, default_value = "")]
    unit: String,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long, default_value = "")]
    priority: String,
    #[arg(long, default_value = "")]
    order_by: String,
    /// Wanted-by date, yyyy-mm-dd
    #[arg(long, default_value = "")]
    order_date: String,
    /// Last time this item was bought, yyyy-mm-dd (or "Never Buy")
    #[arg(long, default_value = "")]
    last_buying_date: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Status tiles and the pages your role may open
    Dashboard {
        /// Print the raw stats report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse the live request sheet
    Requests(ViewArgs),
    /// Pending requests awaiting a decision
    Approval(ViewArgs),
    /// Approved requests awaiting purchase
    Fulfillment(ViewArgs),
    /// Archive of rejected requests
    Rejected(ViewArgs),
    /// Archive of fulfilled requests
    Report(ViewArgs),
    /// Create a request, or update one with --id
    Submit(SubmitArgs),
    /// Approve a pending request
    Approve { id: String },
    /// Reject a pending request
    Reject {
        id: String,
        #[arg(short, long)]
        reason: String,
    },
    /// Mark an approved request bought, fully or partially
    Complete {
        id: String,
        /// Quantity actually bought; omit for full completion
        #[arg(long)]
        bought_qty: Option<u64>,
    },
}

fn ensure_access(actor: &Actor, page: Page) -> Result<()> {
    if actor.role.may_open(page) {
        Ok(())
    } else {
        anyhow::bail!("role {} ({}) may not open {page}", actor.role.as_str(), actor.role.label())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();
    let actor = Actor::from_env();
    let client = Arc::new(SheetClient::from_env()?);
    let cache = SourceCache::new(client.clone());
    let submitter = CommandSubmitter::new(client, cache.clone(), actor.clone());

    match cli.command {
        Commands::Dashboard { json } => {
            ensure_access(&actor, Page::Dashboard)?;
            let loader = MultiSourceLoader::new(cache);
            commands::dashboard(&loader, &actor, json).await
        },
        Commands::Requests(args) => {
            ensure_access(&actor, Page::Requests)?;
            commands::show_view(&cache, ViewConfig::requests(), &args).await
        },
        Commands::Approval(args) => {
            ensure_access(&actor, Page::Approval)?;
            commands::show_view(&cache, ViewConfig::approval(), &args).await
        },
        Commands::Fulfillment(args) => {
            ensure_access(&actor, Page::Fulfillment)?;
            commands::show_view(&cache, ViewConfig::fulfillment(), &args).await
        },
        Commands::Rejected(args) => {
            ensure_access(&actor, Page::Rejections)?;
            commands::show_view(&cache, ViewConfig::rejections(), &args).await
        },
        Commands::Report(args) => {
            ensure_access(&actor, Page::Report)?;
            commands::show_view(&cache, ViewConfig::report(), &args).await
        },
        Commands::Submit(args) => {
            ensure_access(&actor, Page::Requests)?;
            commands::submit(&cache, &submitter, args).await
        },
        Commands::Approve { id } => {
            ensure_access(&actor, Page::Approval)?;
            commands::transition(&cache, &submitter, &id, Transition::Approve, ViewConfig::approval())
                .await
        },
        Commands::Reject { id, reason } => {
            ensure_access(&actor, Page::Approval)?;
            commands::transition(
                &cache,
                &submitter,
                &id,
                Transition::Reject { reason },
                ViewConfig::approval(),
            )
            .await
        },
        Commands::Complete { id, bought_qty } => {
            ensure_access(&actor, Page::Fulfillment)?;
            let transition = match bought_qty {
                Some(bought_qty) => Transition::CompletePartial { bought_qty },
                None => Transition::Complete,
            };
            commands::transition(&cache, &submitter, &id, transition, ViewConfig::fulfillment())
                .await
        },
    }
}
