//! Enquiry submission and embedded-page message handling

use clap::Args;
use colored::Colorize;
use log::{info, warn};
use serde::Serialize;

use crate::config::ApiConfig;
use crate::http::create_client;
use crate::prelude::{eprintln, println, *};
use feshia_core::enquiry::{
    enquiry_fields, parse_webview_message, EnquiryForm, EnquiryResource, EnquiryTarget,
    DEFAULT_ENQUIRY_TITLE, RETRY_MESSAGE, SUCCESS_MESSAGE,
};

#[derive(Debug, clap::Parser)]
#[command(name = "enquiry")]
#[command(about = "Contact a consultant about a university or program")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Send an enquiry
    #[clap(name = "submit")]
    Submit(SubmitOptions),

    /// Resolve a message posted by an embedded page into an enquiry target
    #[clap(name = "from-message")]
    FromMessage(FromMessageOptions),
}

#[derive(Args, Debug, Clone)]
pub struct SubmitOptions {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    message: String,

    /// Subject shown to the consultant
    #[arg(long, default_value = DEFAULT_ENQUIRY_TITLE)]
    title: String,

    /// What the enquiry is about (university, program or general)
    #[arg(long, default_value = "university", value_parser = resource_kind)]
    resource: String,

    /// Id of the university or program
    #[arg(long)]
    resource_id: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FromMessageOptions {
    /// Raw JSON message, e.g. '{"event":"enquiry","resource":{"type":"program","resourceId":"42"}}'
    message: String,
}

const RESOURCE_KINDS: [&str; 3] = ["university", "program", "general"];

fn resource_kind(value: &str) -> Result<String, String> {
    if RESOURCE_KINDS.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "Invalid resource: {value}. Valid resources: {}",
            RESOURCE_KINDS.join(", ")
        ))
    }
}

/// Result of a submission the server has seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryOutcome {
    Received,
    Retry,
}

impl EnquiryOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Received => SUCCESS_MESSAGE,
            Self::Retry => RETRY_MESSAGE,
        }
    }
}

pub fn outcome_for_status(status: reqwest::StatusCode) -> EnquiryOutcome {
    if status.is_success() {
        EnquiryOutcome::Received
    } else {
        EnquiryOutcome::Retry
    }
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = ApiConfig::from_global(&global)?;

    if global.verbose {
        eprintln!("Enquiry endpoint: {}", config.enquiry_url);
        eprintln!();
    }

    match app.command {
        Commands::Submit(options) => submit(options, &config).await,
        Commands::FromMessage(options) => from_message(options),
    }
}

/// Validate `form` and POST it as multipart form data to `url`.
///
/// Validation failures are returned as errors without touching the network.
/// Anything that goes wrong after that is reported as [`EnquiryOutcome::Retry`].
pub async fn submit_enquiry(
    client: &reqwest::Client,
    url: &str,
    form: &EnquiryForm,
    title: &str,
    resource: &EnquiryResource,
) -> Result<EnquiryOutcome, Error> {
    form.validate()?;

    let body = enquiry_fields(form, title, resource)
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |body, (field, value)| {
            body.text(field, value)
        });

    info!("Submitting {} enquiry to {url}", resource.kind());

    let outcome = match client.post(url).multipart(body).send().await {
        Ok(response) => outcome_for_status(response.status()),
        Err(err) => {
            warn!("Enquiry request failed: {err}");
            EnquiryOutcome::Retry
        }
    };

    if outcome == EnquiryOutcome::Retry {
        warn!("Enquiry was not accepted");
    }
    Ok(outcome)
}

async fn submit(options: SubmitOptions, config: &ApiConfig) -> Result<()> {
    let form = EnquiryForm {
        name: options.name,
        email: options.email,
        phone: options.phone,
        message: options.message,
    };
    let resource =
        EnquiryResource::from_parts(Some(options.resource.as_str()), options.resource_id.as_deref());

    let client = create_client(config)?;
    let outcome = submit_enquiry(&client, &config.enquiry_url, &form, &options.title, &resource).await?;

    if options.json {
        let output = serde_json::json!({ "outcome": outcome, "message": outcome.message() });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if outcome == EnquiryOutcome::Received {
        println!("{}", outcome.message().green().bold());
    } else {
        println!("{}", outcome.message().yellow());
    }

    Ok(())
}

fn from_message(options: FromMessageOptions) -> Result<()> {
    let event = parse_webview_message(&options.message).map_err(Error::from)?;
    let target: EnquiryTarget = event.target();

    println!("{}", serde_json::to_string_pretty(&target)?);
    Ok(())
}
