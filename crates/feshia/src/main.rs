#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod articles;
mod config;
mod enquiry;
mod error;
mod home;
mod http;
mod paginated;
mod prelude;
mod programs;
mod search;
mod universities;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse universities, programs and articles from the Feshia study abroad API"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the Feshia API
    #[clap(
        long,
        env = "FESHIA_API_URL",
        global = true,
        default_value = config::DEFAULT_API_URL
    )]
    api_url: String,

    /// Base URL of the website rendered in embedded pages
    #[clap(
        long,
        env = "FESHIA_SITE_URL",
        global = true,
        default_value = config::DEFAULT_SITE_URL
    )]
    site_url: String,

    /// Enquiry endpoint (defaults to <site-url>/enquiry)
    #[clap(long, env = "FESHIA_ENQUIRY_URL", global = true)]
    enquiry_url: Option<String>,

    /// Request timeout in seconds
    #[clap(
        long,
        env = "FESHIA_TIMEOUT_SECS",
        global = true,
        default_value = config::DEFAULT_TIMEOUT_SECS
    )]
    timeout_secs: u64,

    /// Whether to display additional information.
    #[clap(long, env = "FESHIA_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Featured content and the quick program search
    Home(crate::home::App),

    /// University listing and name search
    Universities(crate::universities::App),

    /// Program listing and filters
    Programs(crate::programs::App),

    /// Study abroad articles
    Articles(crate::articles::App),

    /// Contact a consultant about a university or program
    Enquiry(crate::enquiry::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Home(sub_app) => crate::home::run(sub_app, app.global).await,
        SubCommands::Universities(sub_app) => crate::universities::run(sub_app, app.global).await,
        SubCommands::Programs(sub_app) => crate::programs::run(sub_app, app.global).await,
        SubCommands::Articles(sub_app) => crate::articles::run(sub_app, app.global).await,
        SubCommands::Enquiry(sub_app) => crate::enquiry::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
