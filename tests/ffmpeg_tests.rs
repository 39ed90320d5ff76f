//! End-to-end runs against real ffmpeg/ffprobe binaries; skipped when absent

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use violet_trim::app::container::{AppContainer, DefaultAppContainer};
use violet_trim::*;

mod test_utils {
    use super::*;

    pub fn ffmpeg_available() -> bool {
        ["ffmpeg", "ffprobe"].iter().all(|bin| {
            Command::new(bin)
                .arg("-version")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        })
    }

    /// Encode a test pattern clip of `duration` seconds
    pub fn create_test_video(output_path: &Path, duration: u32) -> bool {
        Command::new("ffmpeg")
            .args([
                "-hide_banner",
                "-loglevel",
                "error",
                "-f",
                "lavfi",
                "-i",
                &format!("testsrc=duration={}:size=320x240:rate=25", duration),
                "-c:v",
                "mpeg4",
                "-g",
                "25",
                "-y",
            ])
            .arg(output_path)
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

use test_utils::*;

#[tokio::test]
async fn test_full_trim_workflow() {
    if !ffmpeg_available() {
        return; // Skip if ffmpeg is not installed
    }
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pattern.mp4");
    if !create_test_video(&input, 6) {
        return;
    }

    let mut config = EditorConfig::default();
    config.sampler.thumbnail_count = 3;
    let container = DefaultAppContainer::new(config).unwrap();
    let mut session = container.editor_session().unwrap();

    session.load_engine().await.unwrap();
    let source = SourceClip::from_path(&input).await.unwrap();
    let duration = session.select_file(source).await.unwrap().unwrap();
    assert!((duration - 6.0).abs() < 0.5);

    session.handle_metadata_loaded(duration).await.unwrap();
    assert_eq!(session.thumbnails().len(), 3);
    assert!(session
        .thumbnails()
        .iter()
        .all(|t| t.frame.data.starts_with(&[0xff, 0xd8])));

    session.set_start(2.0).unwrap();
    session.set_end(4.0).unwrap();
    assert_eq!(session.request_trim().await, TrimOutcome::Completed);

    let output = session.output().unwrap();
    assert!(!output.is_empty());
    let written = output.save_to(dir.path()).await.unwrap();
    assert!(written.exists());
    assert_eq!(
        written.file_name().unwrap().to_string_lossy(),
        output.download_name
    );
}

#[tokio::test]
async fn test_probe_reports_duration() {
    if !ffmpeg_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pattern.mp4");
    if !create_test_video(&input, 2) {
        return;
    }

    let container = DefaultAppContainer::new(EditorConfig::default()).unwrap();
    let probe = container.frame_surface().probe_path(&input).await.unwrap();
    assert!(probe.duration.unwrap() > 1.5);
    assert!(probe.format_name.unwrap().contains("mp4"));
}
