use anyhow::Result;
use chrono::{Local, Timelike};
use procura_cache::{MultiSourceLoader, SourceCache};
use procura_core::{Actor, Page, Partition};
use procura_service::{CommandSubmitter, RequestDraft, Transition, collect_stats};
use procura_view::{TableView, ViewConfig};

use crate::render;
use crate::{SubmitArgs, ViewArgs};

pub async fn show_view(cache: &SourceCache, config: ViewConfig, args: &ViewArgs) -> Result<()> {
    let mut view = TableView::new(config);
    load_with_spinner(&mut view, cache).await?;

    if let Some(query) = &args.search {
        view.search(query);
    }
    if let Some(page_size) = args.page_size {
        view.set_page_size(page_size);
    }
    view.go_to_page(args.page);

    render::print_table(&view.render());
    Ok(())
}

pub async fn dashboard(loader: &MultiSourceLoader, actor: &Actor, json: bool) -> Result<()> {
    let spinner = render::spinner("Loading data...");
    let report = collect_stats(loader).await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}, {}", greeting(Local::now().hour()), actor.display_name());
    println!();
    render::print_stats(&report.stats);
    for partition in &report.failed_partitions {
        eprintln!("warning: {partition} could not be loaded, its totals are missing");
    }

    println!();
    println!("Available pages for {}:", actor.role.label());
    for page in actor.role.allowed_pages() {
        println!("  {:<12} {}", page.to_string(), page_blurb(*page));
    }
    Ok(())
}

pub async fn submit(
    cache: &SourceCache,
    submitter: &CommandSubmitter,
    args: SubmitArgs,
) -> Result<()> {
    let draft = RequestDraft {
        department: args.department,
        office: args.office,
        items: args.items,
        part_of: args.part_of,
        description: args.description,
        qty: args.qty,
        unit: args.unit,
        price: args.price,
        priority: args.priority,
        order_by: args.order_by,
        order_date: args.order_date,
        last_buying_date: args.last_buying_date,
    };
    submitter.submit_request(&draft, args.id.as_deref()).await?;
    println!("Request saved.");

    show_view(cache, ViewConfig::requests(), &ViewArgs::default()).await
}

pub async fn transition(
    cache: &SourceCache,
    submitter: &CommandSubmitter,
    id: &str,
    transition: Transition,
    reload: ViewConfig,
) -> Result<()> {
    let spinner = render::spinner("Loading data...");
    let snapshot = cache.get(&Partition::main()).await;
    spinner.finish_and_clear();
    let snapshot = snapshot?;

    let status = transition.target_status();
    submitter.submit_transition(&snapshot, id, transition).await?;
    println!("{id} is now {status}.");

    show_view(cache, reload, &ViewArgs::default()).await
}

async fn load_with_spinner(view: &mut TableView, cache: &SourceCache) -> Result<()> {
    let spinner = render::spinner("Loading data...");
    let result = view.load(cache).await;
    spinner.finish_and_clear();
    result?;
    Ok(())
}

fn greeting(hour: u32) -> &'static str {
    match hour {
        0..11 => "Good morning",
        11..15 => "Good afternoon",
        15..19 => "Good evening",
        _ => "Good night",
    }
}

fn page_blurb(page: Page) -> &'static str {
    match page {
        Page::Dashboard => "Status overview and shortcuts.",
        Page::Requests => "Create and submit new purchase requests.",
        Page::Approval => "Review and approve pending requests.",
        Page::Fulfillment => "Track and finalize procurement steps.",
        Page::Report => "Comprehensive analytics and history.",
        Page::Rejections => "Archive of non-fulfillment decisions.",
        Page::Export => "Download request data for print.",
    }
}
