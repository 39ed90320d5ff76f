//! Command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::editor::{EditorSession, TrimOutcome};
use crate::app::progress::{ConsoleObserver, JsonObserver, SessionObserver};
use crate::cli::args::{InspectArgs, ThumbsArgs, TrimArgs};
use crate::domain::model::{SourceClip, ThumbnailStrip, TimeSpec};
use crate::error::TrimError;
use crate::utils::format_file_size;

/// Execute the trim command
pub async fn trim(container: &DefaultAppContainer, args: TrimArgs, json_events: bool) -> Result<()> {
    info!(input = %args.input.display(), "Starting trim");

    let start = parse_time(args.start.as_deref())?;
    let end = parse_time(args.end.as_deref())?;

    let mut session = open_session(container, json_events)?;
    session
        .load_engine()
        .await
        .context("Failed to load the transcode engine")?;

    let duration = select(&mut session, &args.input).await?;
    if let Err(e) = session.handle_metadata_loaded(duration).await {
        // The cut does not depend on the strip
        warn!(error = %e, "Continuing without a complete thumbnail strip");
    }

    if let Some(start) = start {
        session
            .set_start(start.as_seconds())
            .with_context(|| format!("Start {} is outside the clip", start))?;
    }
    if let Some(end) = end {
        session
            .set_end(end.as_seconds())
            .with_context(|| format!("End {} is outside the clip", end))?;
    }

    match session.request_trim().await {
        TrimOutcome::Completed => {}
        TrimOutcome::Failed(message) => return Err(TrimError::TrimFailed { message }.into()),
        TrimOutcome::NotReady | TrimOutcome::Busy => {
            return Err(TrimError::TrimFailed {
                message: session.status().message.clone(),
            }
            .into())
        }
    }

    let output = session
        .output()
        .ok_or_else(|| TrimError::TrimFailed {
            message: "no output produced".to_string(),
        })?;
    let target = args.output.unwrap_or_else(|| PathBuf::from("."));
    let written = output
        .save_to(&target)
        .await
        .context("Failed to save the trimmed clip")?;

    println!("{}", written.display());
    info!(
        output = %written.display(),
        size = %format_file_size(output.len() as u64),
        "Trim finished"
    );
    Ok(())
}

/// Execute the thumbs command
pub async fn thumbs(container: &DefaultAppContainer, args: ThumbsArgs, json_events: bool) -> Result<()> {
    let mut session = open_session(container, json_events)?;
    let duration = select(&mut session, &args.input).await?;
    let capture = session.handle_metadata_loaded(duration).await;

    tokio::fs::create_dir_all(&args.out_dir)
        .await
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    let written = write_strip(session.thumbnails(), &args.out_dir).await?;
    for path in &written {
        println!("{}", path.display());
    }

    capture.map_err(TrimError::from)?;
    info!(count = written.len(), "Thumbnails written");
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(container: &DefaultAppContainer, args: InspectArgs) -> Result<()> {
    ensure_input(&args.input)?;
    let probe = container
        .frame_surface()
        .probe_path(&args.input)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&probe).map_err(TrimError::from)?
        );
        return Ok(());
    }

    println!("File:     {}", args.input.display());
    println!(
        "Format:   {}",
        probe.format_name.as_deref().unwrap_or("unknown")
    );
    match probe.duration {
        Some(duration) => println!(
            "Duration: {} ({:.3}s)",
            TimeSpec::from_seconds(duration),
            duration
        ),
        None => println!("Duration: unknown"),
    }
    if let Some(size) = probe.size_bytes {
        println!("Size:     {}", format_file_size(size));
    }
    if let Some(bit_rate) = probe.bit_rate {
        println!("Bitrate:  {} kb/s", bit_rate / 1000);
    }
    Ok(())
}

fn open_session(container: &DefaultAppContainer, json_events: bool) -> Result<EditorSession> {
    let session = container
        .editor_session()
        .context("Failed to create editor session")?;
    let observer: Arc<dyn SessionObserver> = if json_events {
        Arc::new(JsonObserver)
    } else {
        Arc::new(ConsoleObserver::new(tracing::enabled!(tracing::Level::DEBUG)))
    };
    session.add_observer(observer);
    Ok(session)
}

/// Read the input, hand it to the session and wait for its duration
async fn select(session: &mut EditorSession, input: &Path) -> Result<f64> {
    ensure_input(input)?;
    let source = SourceClip::from_path(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let name = source.name.clone();
    let duration = session
        .select_file(source)
        .await
        .with_context(|| format!("Failed to open {}", input.display()))?;
    Ok(duration.ok_or(TrimError::UnknownDuration { name })?)
}

fn ensure_input(input: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(TrimError::InputFileNotFound {
            path: input.display().to_string(),
        }
        .into());
    }
    Ok(())
}

fn parse_time(value: Option<&str>) -> Result<Option<TimeSpec>> {
    value
        .map(|v| {
            TimeSpec::parse(v).map_err(|_| {
                anyhow::Error::from(TrimError::InvalidTimeFormat {
                    time: v.to_string(),
                })
            })
        })
        .transpose()
}

async fn write_strip(strip: &ThumbnailStrip, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(strip.len());
    for thumb in strip.iter() {
        let path = dir.join(format!(
            "thumb-{:02}.{}",
            thumb.index,
            thumb.frame.format.extension()
        ));
        tokio::fs::write(&path, &thumb.frame.data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_values() {
        assert_eq!(parse_time(None).unwrap(), None);
        assert_eq!(
            parse_time(Some("01:30")).unwrap().map(|t| t.as_seconds()),
            Some(90.0)
        );
        let err = parse_time(Some("soon")).unwrap_err();
        assert!(err.to_string().contains("Invalid time format: soon"));
    }

    #[test]
    fn test_ensure_input_missing() {
        let err = ensure_input(Path::new("/nonexistent/clip.mp4")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }
}
