use anyhow::{Context, Result};
use clap::Parser;
use gemini_nano::{Client, Config, GenerateOptions, ImageStore};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-nano")]
#[command(about = "Generate an image with a Gemini image model")]
struct CliArgs {
    /// Text prompt describing the image.
    prompt: String,

    /// Optional input image to edit or use as reference.
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// MIME type of the input image (sniffed from its contents when omitted).
    #[arg(long, value_name = "MIME")]
    mime_type: Option<String>,

    /// Extra top-level request field, e.g. `generationConfig={"responseModalities":["IMAGE"]}`.
    #[arg(long = "option", value_name = "KEY=JSON", value_parser = parse_option_arg)]
    options: Vec<(String, serde_json::Value)>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    api_key: Option<String>,

    /// Request timeout in seconds (0 disables it).
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the base64 image instead of storing it.
    #[arg(long)]
    no_store: bool,
}

fn parse_option_arg(input: &str) -> std::result::Result<(String, serde_json::Value), String> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("Invalid option '{}'. Expected format: KEY=JSON", input))?;
    if key.is_empty() {
        return Err(format!("Invalid option '{}'. Key must not be empty", input));
    }

    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn build_client(args: &CliArgs, config: &Config) -> Client {
    let mut factory = Client::factory();
    if let Some(base_url) = &args.base_url {
        factory = factory.with_base_url(base_url);
    }
    if let Some(api_key) = &args.api_key {
        factory = factory.with_api_key(api_key);
    }
    if let Some(timeout) = args.timeout {
        factory = factory.with_timeout(timeout);
    }
    if let Some(model) = &args.model {
        factory = factory.with_model(model);
    }
    factory.make(config)
}

async fn run(args: CliArgs) -> Result<String> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if args.no_store {
        config.store = false;
    }

    let client = build_client(&args, &config);
    let store = ImageStore::from_config(&config)
        .await
        .context("Failed to set up image storage")?;

    let mut options = GenerateOptions::new();
    options.image_path = args.image.clone();
    options.image_mime_type = args.mime_type.clone();
    for (key, value) in args.options.iter().cloned() {
        options = options.with_option(key, value);
    }

    info!("Generating image with model {}", client.model());
    let response = client.images().generate(&args.prompt, options).await?;

    Ok(response.result(&store).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_nano=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(result) => {
            println!("{}", result);
            Ok(())
        }
        Err(e) => {
            error!("Image generation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
