//! Command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::adapters::EditxConfig;
use crate::app::AppContainer;
use crate::cli::args::{ApplyArgs, CompileArgs, ProbeArgs};
use crate::domain::model::TimeSpec;
use crate::domain::rules::ParameterCompiler;
use crate::utils::PathUtils;

/// Execute the apply command
pub async fn apply(
    container: &dyn AppContainer,
    config: &EditxConfig,
    args: ApplyArgs,
) -> Result<()> {
    PathUtils::validate_source(&args.input)?;

    let duration = match &args.duration {
        Some(value) => TimeSpec::parse(value)
            .with_context(|| format!("Invalid duration '{}'", value))?
            .as_seconds(),
        None => container
            .probe()
            .probe_duration(&args.input)
            .await
            .context("Failed to determine source duration")?,
    };

    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let session = container.edit_interactor();
    session.load_engine().await.context("Failed to load engine")?;
    session
        .load_source(&PathUtils::display_name(&args.input), &bytes, duration)
        .await
        .context("Failed to load source")?;

    let parameters = args.edit.to_parameters(duration)?;
    session.set_parameters(parameters);
    info!("Engine arguments: {}", session.preview_arguments()?);

    let artifact = match session.apply().await {
        Ok(artifact) => artifact,
        Err(e) => {
            for line in session.log_tail() {
                error!("{}", line);
            }
            return Err(anyhow::Error::new(e).context("Failed to apply edits"));
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.file_name));
    tokio::fs::write(&output, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Wrote {} ({} bytes, {})",
        output.display(),
        artifact.len(),
        artifact.mime_type
    );
    println!("{}", output.display());
    Ok(())
}

/// Execute the compile command
pub fn compile(args: CompileArgs) -> Result<()> {
    let duration = TimeSpec::parse(&args.duration)
        .with_context(|| format!("Invalid duration '{}'", args.duration))?
        .as_seconds();

    let parameters = args.edit.to_parameters(duration)?;
    parameters.validate(duration)?;

    println!("{}", ParameterCompiler::compile(&parameters, duration));
    Ok(())
}

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: ProbeArgs) -> Result<()> {
    PathUtils::validate_source(&args.input)?;

    let duration = container
        .probe()
        .probe_duration(&args.input)
        .await
        .with_context(|| format!("Failed to probe {}", args.input.display()))?;

    println!("{} ({:.3}s)", TimeSpec::from_seconds(duration), duration);
    Ok(())
}
