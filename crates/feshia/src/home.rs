//! Home screen: featured content and the quick program search

use clap::Args;
use colored::Colorize;

use crate::config::ApiConfig;
use crate::http::{get_json, page_source};
use crate::prelude::{eprintln, println, *};
use feshia_core::home::{
    transform_homepage, transform_search_options, AvailableFilters, HomeFeed, HomeSearch,
    HomepageResponse, SearchField, SearchOptions, SelectOption,
};

#[derive(Debug, clap::Parser)]
#[command(name = "home")]
#[command(about = "Featured content and the quick program search")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Featured universities and articles
    #[clap(name = "feed")]
    Feed(JsonOptions),

    /// Options offered by the quick search form
    #[clap(name = "filters")]
    Filters(JsonOptions),

    /// Build the programs deep link for a quick search
    #[clap(name = "search")]
    Search(SearchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct JsonOptions {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[arg(long)]
    destination: Option<String>,

    #[arg(long)]
    study_area: Option<String>,

    #[arg(long)]
    program_type: Option<String>,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;

    if global.verbose {
        eprintln!("Feshia API Base: {}", config.api_base);
        eprintln!();
    }

    match app.command {
        Commands::Feed(options) => feed(options, &config).await,
        Commands::Filters(options) => filters(options, &config).await,
        Commands::Search(args) => {
            let link = search_link(&args)
                .ok_or_eyre("Select at least one of --destination, --study-area or --program-type")?;
            println!("{}{link}", config.site_base);
            Ok(())
        }
    }
}

/// Fetch and transform the home feed.
pub async fn feed_data(config: &ApiConfig) -> Result<HomeFeed> {
    let source = page_source(config)?;
    let raw: HomepageResponse = get_json(source.as_ref(), &config.url("/homepage")).await?;
    Ok(transform_homepage(&raw))
}

/// Fetch and transform the quick search options.
pub async fn search_options_data(config: &ApiConfig) -> Result<SearchOptions> {
    let source = page_source(config)?;
    let raw: AvailableFilters = get_json(source.as_ref(), &config.url("/homepage/filters")).await?;
    Ok(transform_search_options(&raw))
}

fn search_link(args: &SearchArgs) -> Option<String> {
    [
        (SearchField::Destination, &args.destination),
        (SearchField::StudyArea, &args.study_area),
        (SearchField::ProgramType, &args.program_type),
    ]
    .into_iter()
    .fold(HomeSearch::default(), |search, (field, value)| match value {
        Some(value) => search.select(field, value),
        None => search,
    })
    .search_link()
}

async fn feed(options: JsonOptions, config: &ApiConfig) -> Result<()> {
    let feed = feed_data(config).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    println!("{}", "Featured universities".bold().cyan());
    let mut table = new_table();
    for card in &feed.universities {
        table.add_row(prettytable::row![
            card.name.bright_white(),
            card.location,
            card.slug.bright_black()
        ]);
    }
    table.printstd();

    println!();
    println!("{}", "Articles".bold().cyan());
    let mut table = new_table();
    for card in &feed.articles {
        table.add_row(prettytable::row![
            card.title.bright_white(),
            card.kind.bright_yellow(),
            card.slug.bright_black()
        ]);
    }
    table.printstd();

    Ok(())
}

fn option_list(options: &[SelectOption]) -> String {
    if options.is_empty() {
        return "-".to_string();
    }
    options
        .iter()
        .map(|o| o.value.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn filters(options: JsonOptions, config: &ApiConfig) -> Result<()> {
    let search_options = search_options_data(config).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&search_options)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Destination".bold(),
        option_list(&search_options.destinations)
    ]);
    table.add_row(prettytable::row![
        "Study Area".bold(),
        option_list(&search_options.study_areas)
    ]);
    table.add_row(prettytable::row![
        "Program Type".bold(),
        option_list(&search_options.program_types)
    ]);
    table.printstd();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeSource;
    use serde_json::json;

    #[test]
    fn test_search_link_maps_destination_to_country() {
        let args = SearchArgs {
            destination: Some("united kingdom".to_string()),
            program_type: Some("masters".to_string()),
            ..Default::default()
        };

        assert_eq!(
            search_link(&args).as_deref(),
            Some("/programs?country=united%20kingdom&program_type=masters")
        );
    }

    #[test]
    fn test_search_link_needs_a_selection() {
        let args = SearchArgs {
            study_area: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(search_link(&args), None);
    }

    #[test]
    fn test_option_list() {
        let options = vec![
            SelectOption {
                label: "Sweden".to_string(),
                value: "sweden".to_string(),
            },
            SelectOption {
                label: "Norway".to_string(),
                value: "norway".to_string(),
            },
        ];

        assert_eq!(option_list(&options), "sweden, norway");
        assert_eq!(option_list(&[]), "-");
    }

    #[tokio::test]
    async fn test_homepage_payload_through_source() {
        let source = FakeSource::new().respond(
            "https://api/homepage",
            json!({
                "universities": [{
                    "name": "KTH",
                    "slug": "kth",
                    "city": {"name": "Stockholm", "country": {"name": "Sweden"}},
                    "gallery": ["kth.png"]
                }, "not a record"],
                "articles": [{
                    "slug": "visa",
                    "title": "Visa",
                    "feature_image": "visa.jpg",
                    "categories": [{"name": "Students"}]
                }]
            }),
        );

        let raw: HomepageResponse = get_json(&source, "https://api/homepage").await.unwrap();
        let feed = transform_homepage(&raw);

        assert_eq!(feed.universities.len(), 1);
        assert_eq!(feed.universities[0].location, "Stockholm Sweden");
        assert_eq!(feed.articles[0].layout, feshia_core::article::ArticleLayout::Vertical);
    }
}
