use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stargaze_core::domain::apod::ApodRecord;
use stargaze_core::domain::neo::Direction;
use stargaze_core::ingest::{NasaClient, SpaceDataClient};
use stargaze_core::pagination::{self, NeoPaginator};
use stargaze_core::render::{render_records, text};
use stargaze_core::time::window::{parse_date, DateWindow};

#[derive(Debug, Parser)]
#[command(name = "stargaze", about = "Print NASA APOD and NeoWs data in the terminal")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Astronomy Picture of the Day.
    Apod,

    /// Near-Earth objects for a date window, one date bucket at a time.
    Neows {
        /// Window start (YYYY-MM-DD). Defaults to today, local time.
        #[arg(long)]
        start_date: Option<String>,

        /// Window end (YYYY-MM-DD). Defaults to start + 7 days.
        #[arg(long)]
        end_date: Option<String>,

        /// Follow the feed's next/previous link this many times first.
        #[arg(long, value_parser = ["next", "previous"])]
        page: Option<String>,

        /// How many times to follow --page.
        #[arg(long, default_value_t = 1, requires = "page")]
        steps: u32,

        /// Bucket to print. Defaults to the earliest date in the window.
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stargaze_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let client = NasaClient::from_settings(&settings)?;

    let result = match args.command {
        Command::Apod => print_apod(&client).await,
        Command::Neows {
            start_date,
            end_date,
            page,
            steps,
            date,
        } => {
            let window = DateWindow::resolve(start_date.as_deref(), end_date.as_deref())?;
            let page = page.as_deref().map(str::parse::<Direction>).transpose()?;
            print_neows(&client, window, page.map(|d| (d, steps)), date.as_deref()).await
        }
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn print_apod(client: &dyn SpaceDataClient) -> anyhow::Result<()> {
    let apod = client.fetch_apod().await.context("failed to load apod")?;
    print!("{}", apod_text(&apod));
    Ok(())
}

fn apod_text(apod: &ApodRecord) -> String {
    format!(
        "{}\n{}\n\n{}\n\n{}\n",
        apod.title,
        apod.display_url(),
        apod.explanation,
        apod.credit()
    )
}

async fn print_neows(
    client: &dyn SpaceDataClient,
    window: DateWindow,
    page: Option<(Direction, u32)>,
    date: Option<&str>,
) -> anyhow::Result<()> {
    let feed = client
        .fetch_neo_feed(window)
        .await
        .with_context(|| format!("failed to load neo feed for {window}"))?;
    let paginator = tokio::sync::Mutex::new(NeoPaginator::new(feed));

    if let Some((direction, steps)) = page {
        for step in 1..=steps {
            pagination::navigate(&paginator, client, direction).await?;
            tracing::info!(%direction, step, "followed feed link");
        }
    }

    let mut paginator = paginator.into_inner();
    if let Some(date) = date {
        paginator.select(parse_date(date)?)?;
    }

    let dates: Vec<String> = paginator.dates().iter().map(ToString::to_string).collect();
    println!("dates: {}", dates.join(", "));

    let Some(selected) = paginator.selected_date() else {
        println!("no near-earth objects in this window");
        return Ok(());
    };
    println!("showing: {selected}\n");

    for group in render_records(paginator.current_bucket()) {
        println!("{}", text::to_text(&group));
    }
    Ok(())
}

fn init_sentry(settings: &stargaze_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
