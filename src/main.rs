use std::sync::Arc;

use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};

use xtream_grab::download::{self, EpisodeSelection};
use xtream_grab::foundation::search::{filter_min_added, search, SearchMode};
use xtream_grab::model::{read_config, CatalogEntry, CatalogKind, Config, ServerCredential};
use xtream_grab::processing::series_batch;
use xtream_grab::repository::server_store::ServerStore;
use xtream_grab::utils::date_utils::parse_timestamp;
use xtream_grab::utils::network::{request, xtream};
use xtream_grab::xtream_grab_error::{XtreamGrabError, XtreamGrabErrorKind};

const DEFAULT_CONFIG_FILE: &str = "xtream-grab.yml";

#[derive(Parser)]
#[command(name = "xtream-grab", version, about = "Xtream catalog search and aria2c batch generator")]
struct Args {
    /// The config file
    #[arg(short, long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage registered servers
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },
    /// List the categories of one catalog
    Categories {
        #[arg(short, long)]
        server: u32,
        #[arg(short, long, value_enum)]
        kind: KindArg,
    },
    /// Search movies, optionally print their download commands
    Movies(CatalogArgs),
    /// Show the remote metadata of one movie
    MovieInfo {
        #[arg(short, long)]
        server: u32,
        #[arg(short, long)]
        id: String,
    },
    /// Search series, optionally print the download command batch
    Series {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Emit flat filenames instead of mkdir lines and season folders
        #[arg(long)]
        no_folders: bool,
    },
}

#[derive(Subcommand)]
enum ServerAction {
    Add {
        #[arg(long)]
        url: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    List,
    Remove {
        id: u32,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum KindArg {
    Movie,
    Series,
}

#[derive(clap::Args)]
struct CatalogArgs {
    #[arg(short, long)]
    server: u32,
    /// Restrict to one category id
    #[arg(long)]
    category: Option<String>,
    /// Title query, fuzzy unless --exact is set
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long)]
    exact: bool,
    /// Only entries added at or after this date (YYYY-MM-DD or epoch seconds)
    #[arg(long)]
    min_added: Option<String>,
    /// Print one aria2c command line per match instead of a listing
    #[arg(short, long)]
    download: bool,
}

impl CatalogArgs {
    fn search_mode(&self) -> SearchMode {
        if self.exact {
            SearchMode::Exact
        } else {
            SearchMode::Fuzzy
        }
    }

    fn min_added_epoch(&self) -> Result<Option<i64>, XtreamGrabError> {
        match &self.min_added {
            None => Ok(None),
            Some(raw) => match parse_timestamp(raw) {
                Some(epoch) => Ok(Some(epoch)),
                None => Err(XtreamGrabError::new(
                    XtreamGrabErrorKind::Validation,
                    format!("cant parse date bound: {raw}"),
                )),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(err) = run(args).await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), XtreamGrabError> {
    let config_file = args
        .config
        .unwrap_or_else(|| String::from(DEFAULT_CONFIG_FILE));
    let cfg = read_config(&config_file)?;

    match args.command {
        Command::Server { action } => handle_server(&cfg, action),
        Command::Categories { server, kind } => {
            let credential = resolve_server(&cfg, server)?;
            let kind = match kind {
                KindArg::Movie => CatalogKind::Movie,
                KindArg::Series => CatalogKind::Series,
            };
            let client = request::create_client();
            let categories = xtream::get_categories(client, &credential, kind).await?;
            if categories.is_empty() {
                info!("no categories");
            }
            for category in categories {
                println!("{}\t{}", category.id, category.name);
            }
            Ok(())
        }
        Command::Movies(catalog) => handle_movies(&cfg, catalog).await,
        Command::MovieInfo { server, id } => {
            let credential = resolve_server(&cfg, server)?;
            let client = request::create_client();
            let detail = xtream::get_movie_detail(client, &credential, &id).await?;
            println!("name:     {}", detail.movie_data.display_name());
            println!("genre:    {}", detail.info.genre);
            println!("released: {}", detail.info.release_date);
            println!("rating:   {}", detail.info.rating);
            println!("cast:     {}", detail.info.cast);
            println!("director: {}", detail.info.director);
            println!("plot:     {}", detail.info.plot);
            Ok(())
        }
        Command::Series { catalog, no_folders } => handle_series(&cfg, catalog, no_folders).await,
    }
}

fn handle_server(cfg: &Config, action: ServerAction) -> Result<(), XtreamGrabError> {
    let mut store = ServerStore::load(&cfg.storage_path())?;
    match action {
        ServerAction::Add { url, username, password } => {
            let created = store.create(&ServerCredential::new(&url, &username, &password))?;
            println!("{}\t{}\t{}", created.id, created.url, created.username);
            Ok(())
        }
        ServerAction::List => {
            if store.list().is_empty() {
                info!("no servers registered");
            }
            for server in store.list() {
                let created = Utc
                    .timestamp_opt(server.created_at, 0)
                    .single()
                    .map_or_else(|| server.created_at.to_string(), |ts| ts.to_rfc3339());
                println!("{}\t{}\t{}\t{created}", server.id, server.url, server.username);
            }
            Ok(())
        }
        ServerAction::Remove { id } => {
            store.delete(id)?;
            info!("removed server {id}");
            Ok(())
        }
    }
}

fn resolve_server(cfg: &Config, id: u32) -> Result<ServerCredential, XtreamGrabError> {
    let store = ServerStore::load(&cfg.storage_path())?;
    match store.get(id) {
        Some(server) => Ok(server.credential()),
        None => Err(XtreamGrabError::new(
            XtreamGrabErrorKind::Validation,
            format!("no server with id {id}, run `server list`"),
        )),
    }
}

async fn handle_movies(cfg: &Config, catalog: CatalogArgs) -> Result<(), XtreamGrabError> {
    let min_added = catalog.min_added_epoch()?;
    let credential = resolve_server(cfg, catalog.server)?;
    let client = request::create_client();

    let movies = xtream::get_movies(client, &credential, catalog.category.as_deref()).await?;
    let mut movies = match &catalog.query {
        Some(query) => search(&movies, query, catalog.search_mode()),
        None => movies,
    };
    if let Some(bound) = min_added {
        movies = filter_min_added(&movies, bound);
    }

    if movies.is_empty() {
        info!("no movies matched");
        return Ok(());
    }
    for movie in &movies {
        if catalog.download {
            println!("{}", download::movie_command(&credential, movie));
        } else {
            println!("{}\t{}", movie.stream_id, movie.display_name());
        }
    }
    Ok(())
}

async fn handle_series(
    cfg: &Config,
    catalog: CatalogArgs,
    no_folders: bool,
) -> Result<(), XtreamGrabError> {
    let min_added = catalog.min_added_epoch()?;
    let credential = resolve_server(cfg, catalog.server)?;
    let client = request::create_client();

    let series =
        xtream::get_series(Arc::clone(&client), &credential, catalog.category.as_deref()).await?;
    let mut series = match &catalog.query {
        Some(query) => search(&series, query, catalog.search_mode()),
        None => series,
    };
    if let Some(bound) = min_added {
        series = filter_min_added(&series, bound);
    }

    if series.is_empty() {
        info!("no series matched");
        return Ok(());
    }

    if !catalog.download {
        for show in &series {
            println!("{}\t{}", show.series_id, show.display_name());
        }
        return Ok(());
    }

    let series_ids: Vec<String> = series.iter().map(|show| show.series_id.clone()).collect();
    let details = series_batch::fetch_series_details(client, &credential, &series_ids, |percent| {
        info!("fetching series details {percent}%");
    })
    .await;

    let mut printed = 0_usize;
    for show in &series {
        let Some(detail) = details.get(&show.series_id) else {
            warn!("no details for series {} ({})", show.series_id, show.display_name());
            continue;
        };
        let selection = EpisodeSelection::select_all(detail);
        for line in download::series_commands(
            &credential,
            detail,
            &show.display_name(),
            &selection,
            !no_folders,
        ) {
            println!("{line}");
            printed += 1;
        }
    }
    if printed == 0 {
        info!("no episodes selected, nothing to download");
    }
    Ok(())
}
