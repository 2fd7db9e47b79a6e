//! Study abroad articles

use clap::Args;
use colored::Colorize;

use crate::config::ApiConfig;
use crate::http::page_source;
use crate::paginated::PaginatedFetcher;
use crate::prelude::{eprintln, println, *};
use feshia_core::article::{articles_from_values, articles_url, ArticleCard, ArticleLayout, ARTICLE_KINDS};
use feshia_core::locator::article_page_url;

#[derive(Debug, clap::Parser)]
#[command(name = "articles")]
#[command(about = "Study abroad articles")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List articles, optionally for one audience
    #[clap(name = "list")]
    List(ListOptions),

    /// Print the embedded page URL of an article
    #[clap(name = "link")]
    Link(LinkOptions),
}

#[derive(Args, Debug, Clone)]
pub struct ListOptions {
    /// Audience tab (students or institutions)
    #[arg(long = "type", value_parser = article_kind)]
    kind: Option<String>,

    /// Card layout (horizontal or vertical)
    #[arg(long, default_value = "horizontal")]
    layout: ArticleLayout,

    /// Number of pages to load
    #[arg(short, long, default_value = "1")]
    pages: u32,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LinkOptions {
    /// Article slug
    slug: String,
}

fn article_kind(value: &str) -> Result<String, String> {
    if ARTICLE_KINDS.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "Invalid article type: {value}. Valid types: {}",
            ARTICLE_KINDS.join(", ")
        ))
    }
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;

    if global.verbose {
        eprintln!("Feshia API Base: {}", config.api_base);
        eprintln!();
    }

    match app.command {
        Commands::List(options) => list(options, &config).await,
        Commands::Link(options) => {
            println!("{}", article_page_url(&config.site_base, &options.slug));
            Ok(())
        }
    }
}

fn with_layout(cards: Vec<ArticleCard>, layout: ArticleLayout) -> Vec<ArticleCard> {
    cards
        .into_iter()
        .map(|card| ArticleCard { layout, ..card })
        .collect()
}

async fn list(options: ListOptions, config: &ApiConfig) -> Result<()> {
    let url = articles_url(&config.api_base, options.kind.as_deref());
    let fetcher = PaginatedFetcher::new(page_source(config)?, articles_from_values);
    let snapshot = fetcher.load_pages(&url, options.pages.max(1)).await;

    if let Some(err) = &snapshot.error {
        if snapshot.items.is_empty() {
            return Err(eyre!("Failed to list articles: {err}"));
        }
        eprintln!("{}", f!("Stopped after page {}: {err}", snapshot.current_page).yellow());
    }

    let cards = with_layout(snapshot.items, options.layout);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("No articles found.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Title".bold().cyan(),
        "Type".bold().cyan(),
        "Created".bold().cyan(),
        "Slug".bold().cyan()
    ]);
    for card in &cards {
        table.add_row(prettytable::row![
            card.title.bright_white(),
            card.kind.bright_yellow(),
            card.created_at.bright_black(),
            card.slug.green()
        ]);
    }
    table.printstd();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_layout_overrides_every_card() {
        let cards = articles_from_values(vec![json!({
            "slug": "visa-guide",
            "title": "Visa guide",
            "feature_image": "visa.png",
            "created_at": "2024-01-02",
            "categories": [{"name": "Students"}]
        })]);
        assert_eq!(cards[0].layout, ArticleLayout::Horizontal);

        let cards = with_layout(cards, ArticleLayout::Vertical);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].layout, ArticleLayout::Vertical);
        assert_eq!(cards[0].slug, "visa-guide");
    }

    #[test]
    fn test_article_kind_validation() {
        assert_eq!(article_kind("students"), Ok("students".to_string()));
        assert!(article_kind("alumni").unwrap_err().contains("institutions"));
    }
}
