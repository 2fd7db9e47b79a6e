//! University listing, one-shot search and search-as-you-type

use clap::Args;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::ApiConfig;
use crate::http::page_source;
use crate::paginated::PaginatedFetcher;
use crate::prelude::{eprintln, println, *};
use crate::search::{SearchController, SearchState, SEARCH_DEBOUNCE};
use feshia_core::envelope::normalize;
use feshia_core::locator::{university_page_url, UniversitySection};
use feshia_core::university::{
    universities_from_values, universities_url, university_search_url, UniversityCard,
};

#[derive(Debug, clap::Parser)]
#[command(name = "universities")]
#[command(about = "University listing and name search")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List universities page by page
    #[clap(name = "list")]
    List(ListOptions),

    /// Search universities by name
    #[clap(name = "search")]
    Search(SearchOptions),

    /// Read queries from stdin, one per line, and search as they arrive
    #[clap(name = "watch")]
    Watch(WatchOptions),

    /// Print the embedded page URL of a university
    #[clap(name = "link")]
    Link(LinkOptions),
}

#[derive(Args, Debug, Clone)]
pub struct ListOptions {
    /// Number of pages to load
    #[arg(short, long, default_value = "1")]
    pages: u32,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchOptions {
    /// University name, or part of it
    query: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period after the last line before searching, in milliseconds
    #[arg(long, default_value_t = SEARCH_DEBOUNCE.as_millis() as u64)]
    debounce_ms: u64,

    /// Output each committed result set as a JSON line
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LinkOptions {
    /// University slug
    slug: String,

    /// Page section to scroll to
    #[arg(long, value_parser = parse_section)]
    section: Option<UniversitySection>,
}

fn parse_section(tag: &str) -> Result<UniversitySection, String> {
    UniversitySection::from_tag(tag).ok_or_else(|| {
        let valid: Vec<&str> = UniversitySection::ALL.iter().map(|s| s.as_str()).collect();
        format!("Invalid section: {tag}. Valid sections: {}", valid.join(", "))
    })
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;

    if global.verbose {
        eprintln!("Feshia API Base: {}", config.api_base);
        eprintln!();
    }

    match app.command {
        Commands::List(options) => list(options, &config).await,
        Commands::Search(options) => search(options, &config).await,
        Commands::Watch(options) => watch(options, &config).await,
        Commands::Link(options) => {
            let fragment = options.section.map(|s| s.as_str());
            println!("{}", university_page_url(&config.site_base, &options.slug, fragment));
            Ok(())
        }
    }
}

async fn list(options: ListOptions, config: &ApiConfig) -> Result<()> {
    let fetcher = PaginatedFetcher::new(page_source(config)?, universities_from_values);
    let snapshot = fetcher
        .load_pages(&universities_url(&config.api_base), options.pages.max(1))
        .await;

    if let Some(err) = &snapshot.error {
        if snapshot.items.is_empty() {
            return Err(eyre!("Failed to list universities: {err}"));
        }
        eprintln!("{}", f!("Stopped after page {}: {err}", snapshot.current_page).yellow());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_cards(&snapshot.items);
        if snapshot.has_more {
            eprintln!(
                "\nTo load more, run:\n  feshia universities list --pages {}",
                snapshot.current_page + 1
            );
        }
    }

    Ok(())
}

async fn search(options: SearchOptions, config: &ApiConfig) -> Result<()> {
    let source = page_source(config)?;
    let raw = source
        .fetch(&university_search_url(&config.api_base, &options.query))
        .await
        .map_err(Error::from)?;
    let cards = universities_from_values(normalize(raw));

    if options.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print_cards(&cards);
    }

    Ok(())
}

async fn watch(options: WatchOptions, config: &ApiConfig) -> Result<()> {
    let delay = std::time::Duration::from_millis(options.debounce_ms);
    let mut controller = SearchController::new(page_source(config)?, &config.api_base, delay);

    let mut updates = controller.subscribe();
    let json = options.json;
    let printer = tokio::spawn(async move {
        let mut shown = 0;
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.committed != shown && !state.is_searching {
                shown = state.committed;
                if let Err(err) = print_search_state(&state, json) {
                    log::warn!("Failed to print search results: {err}");
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        controller.input(&line);
    }

    controller.settle().await;
    drop(controller);
    printer.await.context("Search printer stopped unexpectedly")?;

    Ok(())
}

fn print_search_state(state: &SearchState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(state)?);
        return Ok(());
    }

    println!("{} {}", "Search:".bold(), state.term.trim().bright_white());
    if let Some(err) = &state.error {
        println!("{}", err.red());
    } else if state.term.trim().is_empty() {
        println!("{}", "Cleared".bright_black());
    } else {
        print_cards(&state.results);
    }
    println!();
    Ok(())
}

fn rank_label(card: &UniversityCard) -> String {
    card.qs_rank
        .map(|rank| f!("#{rank}"))
        .unwrap_or_else(|| "-".to_string())
}

fn print_cards(cards: &[UniversityCard]) {
    if cards.is_empty() {
        println!("No universities found.");
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Slug".bold().cyan(),
        "Name".bold().cyan(),
        "Location".bold().cyan(),
        "QS Rank".bold().cyan(),
        "Scholarship".bold().cyan()
    ]);
    for card in cards {
        table.add_row(prettytable::row![
            card.slug.green(),
            card.name.bright_white(),
            card.location,
            rank_label(card).bright_yellow(),
            card.scholarship.as_deref().unwrap_or("-").bright_black()
        ]);
    }
    table.printstd();
}
