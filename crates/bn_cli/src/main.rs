use std::net::SocketAddr;
use std::sync::Arc;
use bn_core::{Cluster, NewsConfig, Result, SnapshotStore};
use bn_feeds::{fetch_all, init_logging, BoxedFetcher, FeedArgs};
use bn_inference::{create_model, EmbeddingGateway, InferenceConfig};
use bn_news::{headline_change, normalize, Evaluation, NewsPipeline};
use bn_storage::StoreArgs;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

mod duration;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Breaking-news detection over RSS headlines", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    feeds: FeedArgs,

    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    inference: InferenceConfig,

    #[command(flatten)]
    news: NewsConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the normalized headlines
    Fetch,
    /// Print ranked clusters of the current headlines
    Cluster,
    /// Decide whether anything is breaking right now
    Breaking {
        /// Save the headline snapshot when a breaking event is found
        #[arg(long)]
        commit: bool,
        /// Keep checking at this interval (e.g. 15m, 1h)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Only report how much the headline set moved since the last snapshot
    Gate,
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "BN_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One breaking check. Returns the clusters to dedupe against next time.
async fn check_breaking(
    pipeline: &NewsPipeline,
    fetchers: &[BoxedFetcher],
    store: &Arc<dyn SnapshotStore>,
    retained: Vec<Cluster>,
    commit: bool,
) -> Result<Vec<Cluster>> {
    let raw = fetch_all(fetchers).await;
    let last = store.latest().await?;
    let evaluation = pipeline
        .evaluate(raw, retained.clone(), last.as_ref().map(|s| s.titles.as_slice()))
        .await;

    let mut next = retained;
    if let Evaluation::Evaluated(report) = &evaluation {
        if report.is_breaking() && commit {
            store.save(&report.headline_snapshot()).await?;
            info!("💾 Snapshot saved ({} headlines)", report.headlines.len());
            next = report.breaking_clusters().cloned().chain(report.retained.iter().cloned()).collect();
        }
    }

    print_json(&evaluation)?;
    Ok(next)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.news.validate()?;

    let model = create_model(&cli.inference).await?;
    let pipeline = NewsPipeline::new(EmbeddingGateway::new(model), cli.news.clone());
    let fetchers = cli.feeds.build_fetchers()?;
    info!("📡 {} feed source(s) configured", fetchers.len());

    match cli.command {
        Commands::Fetch => {
            let items = normalize(fetch_all(&fetchers).await);
            print_json(&items)?;
        }
        Commands::Cluster => {
            let items = normalize(fetch_all(&fetchers).await);
            let clusters = pipeline.cluster(items).await;
            info!("✨ {} clusters", clusters.len());
            print_json(&clusters)?;
        }
        Commands::Breaking { commit, interval } => {
            let store = cli.store.open().await?;
            let mut retained = Vec::new();

            match interval {
                Some(HumanDuration(every)) => {
                    info!("⏱️ Checking every {}s", every.as_secs());
                    loop {
                        match check_breaking(&pipeline, &fetchers, &store, retained.clone(), commit).await {
                            Ok(next) => retained = next,
                            Err(e) => error!("❌ Breaking check failed: {}", e),
                        }
                        tokio::time::sleep(every).await;
                    }
                }
                None => {
                    check_breaking(&pipeline, &fetchers, &store, retained, commit).await?;
                }
            }
        }
        Commands::Gate => {
            let store = cli.store.open().await?;
            let items = normalize(fetch_all(&fetchers).await);
            let headlines: Vec<String> = items.into_iter().map(|i| i.title).collect();
            let last = store.latest().await?;
            let change = headline_change(
                &headlines,
                last.as_ref().map(|s| s.titles.as_slice()),
                cli.news.gate.change_threshold,
            );
            print_json(&change)?;
        }
        Commands::Serve { bind } => {
            let store = cli.store.open().await?;
            let state = bn_web::AppState::new(pipeline, fetchers, store);
            bn_web::serve(bind, state).await?;
        }
    }

    Ok(())
}
