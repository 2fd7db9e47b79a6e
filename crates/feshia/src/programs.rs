//! Program listing, filter drawer and program page links

use clap::Args;
use colored::Colorize;

use crate::config::ApiConfig;
use crate::http::page_source;
use crate::paginated::PaginatedFetcher;
use crate::prelude::{eprintln, println, *};
use feshia_core::filters::{
    applied_filters, parse_deep_link, programs_link, programs_url, AppliedFilter, FilterSet,
    ProgramFilterDraft, DURATION_OPTIONS, PROGRAM_TYPE_OPTIONS,
};
use feshia_core::locator::ProgramLocator;
use feshia_core::program::{programs_from_values, ProgramCard};

#[derive(Debug, clap::Parser)]
#[command(name = "programs")]
#[command(about = "Program listing and filters")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List programs matching the given filters
    #[clap(name = "list")]
    List(ListOptions),

    /// Resolve a program card slug to its page URL
    #[clap(name = "link")]
    Link(LinkOptions),

    /// Edit a set of program filters and print the resulting deep link
    #[clap(name = "filter")]
    Filter(FilterOptions),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListOptions {
    /// Seed the filters from a `/programs?...` deep link
    #[arg(long)]
    link: Option<String>,

    /// Program name
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    city: Option<String>,

    /// Duration buckets, `|` separated (e.g. "1-12|12-18")
    #[arg(long)]
    duration: Option<String>,

    /// Tuition range as "min-max"
    #[arg(long)]
    tuition: Option<String>,

    #[arg(long)]
    program_type: Option<String>,

    #[arg(long)]
    study_area: Option<String>,

    /// Number of pages to load
    #[arg(short, long, default_value = "1")]
    pages: u32,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LinkOptions {
    /// Composite slug of a program card (e.g. "lund#available-programs_Masters_cs")
    slug: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOptions {
    /// Start from the filters of an existing deep link
    #[arg(long)]
    from: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    study_area: Option<String>,

    /// Toggle a duration bucket (repeatable)
    #[arg(long, value_parser = duration_value)]
    duration: Vec<String>,

    /// Toggle a program type (repeatable)
    #[arg(long, value_parser = program_type_value)]
    program_type: Vec<String>,

    #[arg(long)]
    min_tuition: Option<u32>,

    #[arg(long)]
    max_tuition: Option<u32>,

    /// Only programs offering a scholarship
    #[arg(long)]
    scholarship: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn one_of(value: &str, options: &[(&str, &str)]) -> Result<String, String> {
    if options.iter().any(|(v, _)| *v == value) {
        Ok(value.to_string())
    } else {
        let valid: Vec<&str> = options.iter().map(|(v, _)| *v).collect();
        Err(format!("Invalid value: {value}. Valid values: {}", valid.join(", ")))
    }
}

fn duration_value(value: &str) -> Result<String, String> {
    one_of(value, &DURATION_OPTIONS)
}

fn program_type_value(value: &str) -> Result<String, String> {
    one_of(value, &PROGRAM_TYPE_OPTIONS)
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;

    if global.verbose {
        eprintln!("Feshia API Base: {}", config.api_base);
        eprintln!();
    }

    match app.command {
        Commands::List(options) => list(options, &config).await,
        Commands::Link(options) => link(options, &config),
        Commands::Filter(options) => filter(options),
    }
}

/// Filters for the list command. Explicit flags win over the deep link.
fn list_filters(options: &ListOptions) -> FilterSet {
    let seeded = options
        .link
        .as_deref()
        .map(|link| link.split_once('?').map_or(link, |(_, query)| query))
        .map(parse_deep_link)
        .unwrap_or_default();

    [
        ("name", &options.name),
        ("country", &options.country),
        ("city", &options.city),
        ("duration", &options.duration),
        ("tuition", &options.tuition),
        ("program_type", &options.program_type),
        ("study_area", &options.study_area),
    ]
    .into_iter()
    .fold(seeded, |filters, (key, value)| match value {
        Some(value) => filters.with(key, value.as_str()),
        None => filters,
    })
}

async fn list(options: ListOptions, config: &ApiConfig) -> Result<()> {
    let filters = list_filters(&options);
    let url = programs_url(&config.api_base, &filters);
    log::debug!("Programs base URL: {url}");

    let fetcher = PaginatedFetcher::new(page_source(config)?, programs_from_values);
    let snapshot = fetcher.load_pages(&url, options.pages.max(1)).await;

    if let Some(err) = &snapshot.error {
        if snapshot.items.is_empty() {
            return Err(eyre!("Failed to list programs: {err}"));
        }
        eprintln!("{}", f!("Stopped after page {}: {err}", snapshot.current_page).yellow());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_chips(&applied_filters(&filters));
    print_cards(&snapshot.items);
    Ok(())
}

fn link(options: LinkOptions, config: &ApiConfig) -> Result<()> {
    let locator = ProgramLocator::parse(&options.slug).map_err(Error::from)?;
    let url = locator.page_url(&config.site_base);

    if options.json {
        let output = serde_json::json!({ "locator": locator, "url": url });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row!["University", locator.university_slug]);
        table.add_row(prettytable::row!["Program Type", locator.program_type]);
        table.add_row(prettytable::row!["Program", locator.program_slug]);
        table.add_row(prettytable::row!["URL", url.bright_blue()]);
        table.printstd();
    }

    Ok(())
}

/// Apply the drawer edits in `options` on top of the `--from` deep link.
fn build_draft(options: &FilterOptions) -> ProgramFilterDraft {
    let seeded = options
        .from
        .as_deref()
        .map(|link| link.split_once('?').map_or(link, |(_, query)| query))
        .map(parse_deep_link)
        .unwrap_or_default();

    let mut draft = ProgramFilterDraft::from_filters(&seeded);
    if let Some(country) = &options.country {
        draft.country = Some(country.clone());
    }
    if let Some(area) = &options.study_area {
        draft.study_area = Some(area.clone());
    }
    if let Some(min) = options.min_tuition {
        draft.min_tuition = min;
    }
    if let Some(max) = options.max_tuition {
        draft.max_tuition = max;
    }
    draft.scholarship |= options.scholarship;

    let draft = options
        .duration
        .iter()
        .fold(draft, |draft, value| draft.toggle_duration(value));
    options
        .program_type
        .iter()
        .fold(draft, |draft, value| draft.toggle_program_type(value))
}

fn filter(options: FilterOptions) -> Result<()> {
    let draft = build_draft(&options);
    if draft.min_tuition > draft.max_tuition {
        return Err(eyre!(
            "Minimum tuition ({}) is above maximum tuition ({})",
            draft.min_tuition,
            draft.max_tuition
        ));
    }

    let filters = draft.apply();
    let link = programs_link(&filters);
    let chips = applied_filters(&filters);

    if options.json {
        let output = serde_json::json!({ "link": link, "applied": chips });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", link.bright_blue());
        print_chips(&chips);
    }

    Ok(())
}

fn print_chips(chips: &[AppliedFilter]) {
    if chips.is_empty() {
        return;
    }
    let line: Vec<String> = chips
        .iter()
        .map(|chip| f!("{}: {}", chip.label.bold(), chip.value))
        .collect();
    println!("{}\n", line.join("  "));
}

fn print_cards(cards: &[ProgramCard]) {
    if cards.is_empty() {
        println!("No programs found.");
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Name".bold().cyan(),
        "Tuition".bold().cyan(),
        "Duration".bold().cyan(),
        "Scholarship".bold().cyan(),
        "Slug".bold().cyan()
    ]);
    for card in cards {
        table.add_row(prettytable::row![
            card.name.bright_white(),
            card.tuition.as_deref().unwrap_or("-").bright_yellow(),
            card.duration.as_deref().unwrap_or("-"),
            card.scholarship,
            card.slug.bright_black()
        ]);
    }
    table.printstd();
}
