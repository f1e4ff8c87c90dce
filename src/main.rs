//! Command-line access to collection archives.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use collection_archive::archive::ArchiveRender;
use collection_archive::config::{self, Config, Settings};
use collection_archive::{
    ArchiveClient, ArchiveProps, ArchiveQuery, CollectionArchive, FetchOutcome, FilterState,
};

#[derive(Debug, Parser)]
#[command(name = "archive")]
#[command(about = "Browse paginated content collections", version)]
struct Cli {
    /// Config file (defaults to prefer discovery of collection-archive.*)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the query string for a page request
    Query(PageArgs),
    /// Fetch one page and print its cards
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
struct PageArgs {
    /// Documents per page (defaults to the configured page size)
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value = collection_archive::filter::DEFAULT_SORT)]
    sort: String,
    /// Category id to filter by (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,
}

#[derive(Debug, Args)]
struct FetchArgs {
    #[command(flatten)]
    page: PageArgs,
    /// Collection slug (defaults to the configured collection)
    #[arg(long)]
    collection: Option<String>,
    #[arg(long, env = "SERVER_URL")]
    server_url: Option<String>,
    /// Print the render model as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Command::Query(args) => {
            let query = ArchiveQuery::new(args.limit.unwrap_or(settings.default_limit), args.page)
                .with_sort(Some(args.sort.as_str()))
                .with_categories(args.categories);
            println!("{}", query);
        }
        Command::Fetch(args) => fetch(settings, args).await?,
    }

    Ok(())
}

async fn load_settings(path: Option<&std::path::Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            let config = Config::from_path(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            let mut settings = Settings::default();
            config.apply_to_settings(&mut settings);
            settings.apply_env();
            Ok(settings)
        }
        None => Ok(config::load_settings().await),
    }
}

async fn fetch(mut settings: Settings, args: FetchArgs) -> Result<()> {
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }

    let client = ArchiveClient::from_settings(&settings).context("creating HTTP client")?;
    let props = ArchiveProps::collection(
        args.collection
            .as_deref()
            .unwrap_or(&settings.default_collection),
    )
    .with_limit(args.page.limit.unwrap_or(settings.default_limit));

    let archive = CollectionArchive::new(props, Arc::new(client));
    archive.select_page(args.page.page);

    let filters = FilterState::new(args.page.categories, Some(args.page.sort.as_str()));
    let outcome = archive.refresh(&filters).await;
    if outcome == FetchOutcome::Malformed {
        eprintln!("warning: server response had no document list; showing nothing");
    }

    let render = archive.render();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&render)?);
        return Ok(());
    }

    match render {
        ArchiveRender::Loading => println!("Loading..."),
        ArchiveRender::Error { message } => println!("{}", message),
        ArchiveRender::Ready {
            page_range,
            cards,
            pagination,
        } => {
            if let Some(range) = page_range {
                let first = (range.current_page.saturating_sub(1) as u64) * range.limit as u64 + 1;
                let last = (range.current_page as u64 * range.limit as u64).min(range.total_docs);
                if range.total_docs == 0 {
                    println!("No {} found", range.collection);
                } else {
                    println!(
                        "Showing {}-{} of {} {}",
                        first, last, range.total_docs, range.collection
                    );
                }
            }
            for card in &cards {
                let categories = card.document.category_titles();
                if categories.is_empty() {
                    println!("  {}  {}", card.key, card.document.display_title());
                } else {
                    println!(
                        "  {}  {}  [{}]",
                        card.key,
                        card.document.display_title(),
                        categories.join(", ")
                    );
                }
            }
            if let Some(pager) = pagination {
                println!("Page {} of {}", pager.page, pager.total_pages);
            }
        }
    }

    Ok(())
}
