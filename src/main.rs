use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use newsdesk::config::Config;
use newsdesk::model::{Article, ArticleStatus, Category};
use newsdesk::remote::{ContentApi, DEFAULT_AUTHOR};
use newsdesk::router::{Link, Location, RouteTable};
use newsdesk::storage::Database;
use newsdesk::store::{ContentStore, StoreOptions, SyncState};
use newsdesk::util::{display_width, strip_html_tags, truncate_to_width};

/// Columns assumed when the terminal size is unknown (piped output).
const FALLBACK_COLUMNS: usize = 80;

/// Get the config directory path (~/.config/newsdesk/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdesk"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "Newsroom content store with offline fallback")]
struct Args {
    /// Config file (default: ~/.config/newsdesk/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List visible articles, newest first
    Articles {
        /// Only this category (name or slug)
        #[arg(long)]
        category: Option<Category>,
    },

    /// Print one article, looked up by slug or id
    Show { article: String },

    /// Create an article
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        category: Category,

        #[arg(long, default_value = "")]
        summary: String,

        /// Markdown file with the article body
        #[arg(long, value_name = "FILE.md")]
        body: Option<PathBuf>,

        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        #[arg(long, default_value = "draft")]
        status: ArticleStatus,

        #[arg(long)]
        author: Option<String>,

        /// Lead the home page with this article
        #[arg(long)]
        hero: bool,
    },

    /// Delete an article by id
    Delete { id: String },

    /// Show or edit the breaking-news ticker
    Ticker {
        /// Scroll speed in milliseconds
        #[arg(long, value_name = "MS")]
        speed: Option<u32>,

        /// Append an item
        #[arg(long, value_name = "TEXT")]
        add: Option<String>,
    },

    /// Show or edit the editorial tag list
    Tags {
        #[arg(long, value_name = "TAG")]
        add: Option<String>,

        #[arg(long, value_name = "TAG")]
        remove: Option<String>,
    },

    /// Print the views a location renders
    Route { location: String },

    /// Open an article page in the browser
    Open { article: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Routing needs no content
    if let Command::Route { location } = &args.command {
        print_route(location);
        return Ok(());
    }

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let db_path = match &config.database_path {
        Some(path) => path.clone(),
        None => {
            std::fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
            config_dir.join("store.db")
        }
    };
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = Database::open(db_path_str)
        .await
        .with_context(|| format!("Failed to open local store at {}", db_path.display()))?;

    let api_url = config.api_base_url();
    let api = ContentApi::new(&api_url)
        .with_context(|| format!("Invalid content service URL: {api_url}"))?;
    tracing::debug!(url = %api.base_url(), "Using content service");
    let options = StoreOptions {
        storage_key: config.storage_key.clone(),
    };

    let mut store = ContentStore::new(api, db, options);
    store.load().await;
    if let Some(error) = store.error() {
        eprintln!("Warning: {error}");
    }

    let result = run(&mut store, &config, args.command).await;

    let db = store.shutdown().await;
    db.close().await;
    result
}

async fn run(store: &mut ContentStore<Database>, config: &Config, command: Command) -> Result<()> {
    let today = chrono::Local::now().date_naive();

    match command {
        Command::Articles { category } => {
            let articles = match category {
                Some(category) => store.articles_in_category(category, today),
                None => store.visible_articles(today),
            };
            if articles.is_empty() {
                println!("No articles.");
            }
            let columns = terminal_columns();
            for article in articles {
                let local = store.sync_state(&article.id) == Some(SyncState::LocalOnly);
                println!("{}", listing_line(article, local, columns));
            }
        }

        Command::Show { article } => {
            let article = find_article(store, &article)?;
            print_article(article, store.sync_state(&article.id));
        }

        Command::Add {
            title,
            category,
            summary,
            body,
            tags,
            status,
            author,
            hero,
        } => {
            let author = author.as_deref().unwrap_or(DEFAULT_AUTHOR);
            let mut draft = Article::draft(&title, category, author, today);
            draft.summary = summary;
            draft.status = status;
            draft.placement.is_hero = hero;
            if let Some(path) = body {
                draft.set_content(&render_markdown_file(&path)?);
            }
            for tag in &tags {
                draft.add_tag(tag);
            }

            let local_id = draft.id.clone();
            match store.add_article(draft).await {
                Ok(created) => println!("Created {} ({})", created.id, created.slug),
                Err(e) => println!("Kept locally as {local_id}: {e}"),
            }
        }

        Command::Delete { id } => {
            let known = store.article(&id).is_some();
            match store.delete_article(&id).await {
                Ok(()) => println!("Deleted {id}"),
                Err(e) if known => println!("Removed {id} locally: {e}"),
                Err(e) => return Err(e).with_context(|| format!("Failed to delete {id}")),
            }
        }

        Command::Ticker { speed, add } => {
            if let Some(text) = add {
                store.add_breaking_item(&text).await?;
            }
            if let Some(speed) = speed {
                store.set_breaking_speed(speed).await?;
            }
            let ticker = store.ticker();
            println!(
                "Speed {} ms, pause on hover {}",
                ticker.speed_ms,
                if ticker.pause_on_hover { "on" } else { "off" }
            );
            for (i, item) in ticker.items.iter().enumerate() {
                println!("{:>3}. {}", i + 1, item);
            }
        }

        Command::Tags { add, remove } => {
            if let Some(tag) = add {
                if !store.add_tag(&tag).await? {
                    println!("Tag already present: {tag}");
                }
            }
            if let Some(tag) = remove {
                if !store.remove_tag(&tag).await {
                    println!("No such tag: {tag}");
                }
            }
            for tag in store.tags() {
                println!("{tag}");
            }
        }

        Command::Open { article } => {
            let article = find_article(store, &article)?;
            let url = format!(
                "{}{}",
                config.site_origin.trim_end_matches('/'),
                Link::new("/article").param("slug", &article.slug).href()
            );
            open::that(&url).with_context(|| format!("Failed to open {url}"))?;
            println!("Opened {url}");
        }

        // Handled before the store is opened
        Command::Route { .. } => {}
    }

    Ok(())
}

fn find_article<'a, S>(store: &'a ContentStore<S>, key: &str) -> Result<&'a Article> {
    store
        .article_by_slug(key)
        .or_else(|| store.article(key))
        .ok_or_else(|| anyhow::anyhow!("No article with slug or id '{key}'"))
}

fn print_route(location: &str) {
    let location = Location::parse(location);
    let views = RouteTable::site().matching(location.path());
    if views.is_empty() {
        println!("{location}: nothing renders");
        return;
    }
    let names: Vec<&str> = views.iter().map(|v| v.name()).collect();
    println!("{location}: {}", names.join(", "));
    for (name, value) in location.params() {
        println!("  {name} = {value}");
    }
}

fn print_article(article: &Article, sync: Option<SyncState>) {
    println!("{}", article.title);
    println!(
        "{} | {} | {} | {}",
        article.publish_date, article.category, article.author, article.status
    );
    if sync == Some(SyncState::LocalOnly) {
        println!("(not synced with the content service)");
    }
    if !article.summary.is_empty() {
        println!();
        println!("{}", article.summary);
    }
    let body = strip_html_tags(&article.content);
    if !body.trim().is_empty() {
        println!();
        println!("{}", body.trim());
    }
    if !article.tags.is_empty() {
        println!();
        println!("Tags: {}", article.tags.join(", "));
    }
}

/// `date  category  title`, with the title cut to fit `columns`.
fn listing_line(article: &Article, local: bool, columns: usize) -> String {
    let prefix = format!(
        "{} {} {:<13} ",
        article.publish_date,
        if local { '*' } else { ' ' },
        article.category.name()
    );
    let budget = columns.saturating_sub(display_width(&prefix));
    format!("{prefix}{}", truncate_to_width(&article.title, budget))
}

fn terminal_columns() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .ok()
        .filter(|&cols| cols > 0)
        .unwrap_or(FALLBACK_COLUMNS)
}

fn render_markdown_file(path: &Path) -> Result<String> {
    let markdown = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read body file {}", path.display()))?;
    Ok(render_markdown(&markdown))
}

fn render_markdown(markdown: &str) -> String {
    let parser = pulldown_cmark::Parser::new(markdown);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("# Budget\n\nThe council *voted*.");
        assert!(html.contains("<h1>Budget</h1>"));
        assert!(html.contains("<em>voted</em>"));
    }

    #[test]
    fn test_listing_line_fits_columns() {
        let mut article = Article::draft(
            "A very long headline about the transit budget vote that keeps going",
            Category::National,
            "Desk",
            NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
        );
        article.status = ArticleStatus::Published;

        let line = listing_line(&article, true, 50);
        assert!(display_width(&line) <= 50);
        assert!(line.starts_with("2025-01-14 * National"));
    }

    #[test]
    fn test_args_parse_add() {
        let args = Args::try_parse_from([
            "newsdesk", "add", "--title", "Hello", "--category", "health", "--tag", "a", "--tag",
            "b",
        ])
        .unwrap();
        match args.command {
            Command::Add {
                category,
                tags,
                status,
                ..
            } => {
                assert_eq!(category, Category::Health);
                assert_eq!(tags, vec!["a", "b"]);
                assert_eq!(status, ArticleStatus::Draft);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
