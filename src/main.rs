//! Cartoonizer CLI - Stylize photographs with a pretrained `CartoonGAN` generator.

#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::process::ExitCode;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "cli")]
use cartoonizer::model::{load_model, ModelCache};
#[cfg(feature = "cli")]
use cartoonizer::{save_surface, Cartoonizer, Config, RenderTarget, State, MODEL_SIZE};

/// Stylize photographs with a pretrained `CartoonGAN` generator.
#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "cartoonizer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input photograph path.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path. Format follows the extension; JPEG honors --quality.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Path to the serialized generator graph.
    #[arg(long, value_name = "PATH", default_value = "models/cartoongan.onnx")]
    model: PathBuf,

    /// Download the generator from this URL into the cache instead of --model.
    #[arg(long, value_name = "URL", conflicts_with = "model")]
    model_url: Option<String>,

    /// Square side length the generator accepts.
    #[arg(long, default_value_t = MODEL_SIZE, value_name = "INT")]
    size: u32,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("cartoonizer={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(feature = "cli")]
fn run(args: &Args) -> Result<()> {
    // Validate input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    // Resolve the model artifact
    let model_path = match &args.model_url {
        Some(url) => ModelCache::new()?.get_model_path(url)?,
        None => {
            if !args.model.exists() {
                anyhow::bail!(
                    "Model artifact not found at {} (pass --model or --model-url)",
                    args.model.display()
                );
            }
            args.model.clone()
        }
    };

    // Build configuration
    let config = Config {
        model_size: args.size,
        output_quality: args.quality,
    };

    let model = load_model(&model_path, config.model_size).context("Failed to load model")?;
    let mut cartoonizer =
        Cartoonizer::with_model(config, model).context("Invalid configuration")?;

    // Drive the state machine the way a UI would: select, then trigger
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    cartoonizer.select_file(&bytes);

    let mut target = RenderTarget::new();
    cartoonizer.cartoonize(&mut target);

    match cartoonizer.state() {
        State::Done => {
            let quality = cartoonizer.config().output_quality;
            save_surface(&target, &args.output, quality).context("Failed to save output")?;

            println!(
                "Cartoonized {} -> {}",
                args.input.display(),
                args.output.display()
            );
            Ok(())
        }
        _ => match cartoonizer.error_reason() {
            Some(reason) => anyhow::bail!("Cartoonizing failed: {reason}"),
            None => anyhow::bail!(
                "Cartoonizing did not complete (state: {:?})",
                cartoonizer.state()
            ),
        },
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Please build with --features cli");
    std::process::exit(1);
}
