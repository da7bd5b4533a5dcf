//! Command-line front end for `threadpress_core`.
//!
//! # Responsibility
//! - Verify core linkage (`ping`, `version`).
//! - Browse the index, article details and tags of the configured database.
//! - Run searches from `key=value` pairs, the shape the request layer uses.

use clap::{Parser, Subcommand};
use log::error;
use std::process::ExitCode;
use threadpress_core::db::open_db;
use threadpress_core::{
    init_logging_from_config, Article, ArticleId, ArticleService, ArticleServiceError,
    SearchForm, SearchService, SearchServiceError, SiteConfig, SqliteArticleRepository,
    SqliteCommentRepository, SqliteTagRepository,
};

#[derive(Parser, Debug)]
#[command(name = "threadpress")]
#[command(about = "Articles, tags, comments and search over a threadpress database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Check that the core library links
    Ping,
    /// Print the core library version
    Version,
    /// List every tag by name
    Tags,
    /// List one page of the article index
    Articles {
        /// Only articles carrying this tag (case-insensitive)
        #[arg(long)]
        tag: Option<String>,
        /// Page number; bad values fall back to the first or last page
        #[arg(long, allow_hyphen_values = true)]
        page: Option<String>,
    },
    /// Show one article with a page of its comments
    Article {
        id: ArticleId,
        /// Comment page number
        #[arg(long, allow_hyphen_values = true)]
        page: Option<String>,
    },
    /// Search articles, e.g. `search text=rust in_tags=true`
    Search {
        /// Search form fields as key=value
        #[arg(value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Ping) {
        Commands::Ping => {
            println!("threadpress_core ping={}", threadpress_core::ping());
            ExitCode::SUCCESS
        }
        Commands::Version => {
            println!("threadpress_core version={}", threadpress_core::core_version());
            ExitCode::SUCCESS
        }
        command => {
            let name = command_name(&command);
            match run_db_command(command) {
                Ok(code) => code,
                Err(message) => {
                    error!("event=cli_failed module=cli status=error command={name}");
                    eprintln!("error: {message}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Ping => "ping",
        Commands::Version => "version",
        Commands::Tags => "tags",
        Commands::Articles { .. } => "articles",
        Commands::Article { .. } => "article",
        Commands::Search { .. } => "search",
    }
}

fn run_db_command(command: Commands) -> Result<ExitCode, String> {
    let config = SiteConfig::from_env().map_err(|err| err.to_string())?;
    init_logging_from_config(&config)?;
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let articles = SqliteArticleRepository::try_new(&conn).map_err(|err| err.to_string())?;

    if let Commands::Search { pairs } = command {
        let service = SearchService::new(articles, config.search_defaults.defaults());
        let form = SearchForm::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.clone())));
        return match service.search_form(&form) {
            Ok(hits) => {
                print_articles(&hits);
                Ok(ExitCode::SUCCESS)
            }
            Err(SearchServiceError::Invalid(err)) => {
                eprintln!("invalid search: {err}");
                Ok(ExitCode::from(2))
            }
            Err(err) => Err(err.to_string()),
        };
    }

    let tags = SqliteTagRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = ArticleService::with_paging(articles, tags, config.article_paging());

    match command {
        Commands::Tags => {
            for tag in service.list_tags().map_err(|err| err.to_string())? {
                println!("{}", tag.name);
            }
        }
        Commands::Articles { tag, page } => {
            let page = service
                .list_articles(tag.as_deref(), page.as_deref())
                .map_err(|err| err.to_string())?;
            println!("page {}/{}", page.number, page.num_pages);
            print_articles(&page.items);
        }
        Commands::Article { id, page } => {
            let comments = config.comment_service(
                SqliteCommentRepository::try_new(&conn).map_err(|err| err.to_string())?,
            );
            let detail = match service.detail(&comments, id, page.as_deref()) {
                Ok(detail) => detail,
                Err(ArticleServiceError::ArticleNotFound(_)) => {
                    eprintln!("article not found: {id}");
                    return Ok(ExitCode::from(2));
                }
                Err(err) => return Err(err.to_string()),
            };
            print_articles(std::slice::from_ref(&detail.article));
            println!("{}", detail.article.body);
            println!(
                "comments page {}/{}",
                detail.comments.number, detail.comments.num_pages
            );
            for comment in &detail.comments.items {
                println!("{}\t{}", comment.author, comment.text);
            }
        }
        Commands::Ping | Commands::Version | Commands::Search { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn print_articles(articles: &[Article]) {
    for article in articles {
        println!(
            "{}\t{}\t{}\t[{}]",
            article.uuid,
            article.title,
            article.author,
            article.tag_input()
        );
    }
}
