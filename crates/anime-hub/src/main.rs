//! Anime Hub CLI application.

use anime_hub::{AnimeHub, PageDirection};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::{Config, CredentialStore, SortBy, SortOrder};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse the anime-db catalog", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog and print one page of results
    Search {
        /// Free-text search term
        #[arg(short, long)]
        query: Option<String>,

        /// Genre filter
        #[arg(short, long)]
        genre: Option<String>,

        /// Sort field (ranking, title)
        #[arg(long, default_value = "ranking")]
        sort_by: SortBy,

        /// Sort order (asc, desc)
        #[arg(long, default_value = "asc")]
        order: SortOrder,

        /// Page to show
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// List the available genres
    Genres,

    /// Show one anime by catalog id
    Show {
        id: String,
    },

    /// Show the anime at a given ranking
    Rank {
        rank: u32,
    },

    /// Save the API key
    SetKey {
        key: String,
    },

    /// Remove the saved API key
    ClearKey,

    /// Browse interactively (default)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "anime-hub".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!(config_file = %args.config.display(), "Anime Hub starting");

    let storage_path = config.storage_path();
    info!(storage = %storage_path.display(), "Opening local storage");
    let credentials =
        CredentialStore::open(&storage_path).context("Failed to open local storage")?;

    let mut hub = AnimeHub::new(&config, credentials).context("Failed to initialize Anime Hub")?;

    match args.command.unwrap_or(Command::Interactive) {
        Command::Search {
            query,
            genre,
            sort_by,
            order,
            page,
        } => {
            *hub.filters_mut() = shared::Filters::new(
                query.as_deref().unwrap_or_default(),
                genre.as_deref().unwrap_or_default(),
                sort_by,
                order,
            );
            hub.perform_search().await;
            while hub.controller().page() < page && hub.screen().pagination().next_enabled {
                hub.change_page(PageDirection::Next).await;
            }
            print!("{}", hub.screen());
            if hub.screen().error_message().is_some() {
                bail!("Search failed");
            }
        }
        Command::Genres => {
            hub.load_genres().await;
            for genre in hub.screen().genres() {
                println!("{}", genre);
            }
        }
        Command::Show { id } => {
            let detail = hub.lookup_by_id(&id).await?;
            println!("{}", detail);
        }
        Command::Rank { rank } => {
            let detail = hub.lookup_by_ranking(rank).await?;
            println!("{}", detail);
        }
        Command::SetKey { key } => {
            if !hub.save_credential(&key).await? {
                bail!("API key must not be empty");
            }
            println!("API key saved.");
        }
        Command::ClearKey => {
            hub.clear_credential()?;
            println!("API key removed.");
        }
        Command::Interactive => run_interactive(&mut hub).await?,
    }

    info!("Anime Hub finished");
    Ok(())
}

const HELP: &str = "\
Commands:
  s <term>        search (empty term clears the search)
  g <genre>|-     filter by genre, `-` for all genres
  sort <field>    sort by ranking or title
  order <dir>     asc or desc
  n / p           next / previous page
  d <number>      details of a card
  key <value>     save API key
  clearkey        remove API key
  genres          list genres
  h               this help
  q               quit";

async fn run_interactive(hub: &mut AnimeHub) -> Result<()> {
    hub.start().await;
    print!("{}", hub.screen());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => {}
            "q" | "quit" => break,
            "h" | "help" => println!("{}", HELP),
            "s" => {
                hub.filters_mut().search = non_empty(rest);
                hub.perform_search().await;
            }
            "g" => {
                hub.filters_mut().genre = if rest == "-" { None } else { non_empty(rest) };
                hub.perform_search().await;
            }
            "sort" => match rest.parse::<SortBy>() {
                Ok(sort_by) => {
                    hub.filters_mut().sort_by = sort_by;
                    hub.perform_search().await;
                }
                Err(e) => println!("{}", e),
            },
            "order" => match rest.parse::<SortOrder>() {
                Ok(order) => {
                    hub.filters_mut().sort_order = order;
                    hub.perform_search().await;
                }
                Err(e) => println!("{}", e),
            },
            "n" => {
                if hub.screen().pagination().next_enabled {
                    hub.change_page(PageDirection::Next).await;
                }
            }
            "p" => hub.change_page(PageDirection::Previous).await,
            "d" => {
                let detail = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| hub.show_details(index));
                match detail {
                    Some(detail) => println!("{}\n", detail),
                    None => println!("No card with that number."),
                }
                continue;
            }
            "key" => {
                hub.save_credential(rest).await?;
            }
            "clearkey" => hub.clear_credential()?,
            "genres" => {
                if hub.screen().genres().is_empty() {
                    hub.load_genres().await;
                }
                println!("{}", hub.screen().genres().join(", "));
                continue;
            }
            other => {
                println!("Unknown command: {} (h for help)", other);
                continue;
            }
        }

        print!("{}", hub.screen());
    }

    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
