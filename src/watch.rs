// Clip discovery for the watcher - filtering and last-modified lookup

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// True for paths the watcher should skip entirely
pub fn should_ignore(path: &Path, patterns: &[String], watch_hidden: bool) -> bool {
    let path_str = path.to_string_lossy();

    if !watch_hidden {
        for component in path.components() {
            if let Some(comp_str) = component.as_os_str().to_str() {
                if comp_str.starts_with('.') && comp_str != "." && comp_str != ".." {
                    return true;
                }
            }
        }
    }

    for pattern in patterns {
        if glob_match::glob_match(pattern, &path_str) {
            return true;
        }
    }

    false
}

/// True for files the capture tool drops: WAV clips only.
///
/// The synthesized MP3s the pipeline writes back into the same
/// directory fail this check, so they are never re-dispatched.
pub fn is_audio_clip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Most recently modified clip under `dir`, honoring the ignore rules
pub fn find_last_modified_clip(
    dir: &Path,
    ignore_patterns: &[String],
    watch_hidden: bool,
) -> std::io::Result<Option<PathBuf>> {
    let mut latest: Option<(PathBuf, SystemTime)> = None;
    if dir.exists() {
        visit_dir(dir, ignore_patterns, watch_hidden, &mut latest)?;
    }
    Ok(latest.map(|(path, _)| path))
}

fn visit_dir(
    dir: &Path,
    ignore_patterns: &[String],
    watch_hidden: bool,
    latest: &mut Option<(PathBuf, SystemTime)>,
) -> std::io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if should_ignore(&path, ignore_patterns, watch_hidden) {
            continue;
        }

        if path.is_dir() {
            visit_dir(&path, ignore_patterns, watch_hidden, latest)?;
        } else if path.is_file() && is_audio_clip(&path) {
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                match latest {
                    Some((_, latest_time)) if modified <= *latest_time => {}
                    _ => *latest = Some((path, modified)),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_clip_extension_filter() {
        assert!(is_audio_clip(Path::new("clips/message.wav")));
        assert!(is_audio_clip(Path::new("clips/MESSAGE.WAV")));
        assert!(!is_audio_clip(Path::new("clips/message.es.mp3")));
        assert!(!is_audio_clip(Path::new("clips/notes.txt")));
        assert!(!is_audio_clip(Path::new("clips/noextension")));
    }

    #[test]
    fn test_ignore_patterns() {
        let patterns = vec!["**/*.tmp".to_string(), "**/discard/**".to_string()];
        assert!(should_ignore(Path::new("clips/recording.tmp"), &patterns, false));
        assert!(should_ignore(Path::new("clips/discard/old.wav"), &patterns, false));
        assert!(!should_ignore(Path::new("clips/message.wav"), &patterns, false));
    }

    #[test]
    fn test_hidden_files_skipped_unless_enabled() {
        assert!(should_ignore(Path::new("clips/.partial.wav"), &[], false));
        assert!(should_ignore(Path::new(".cache/message.wav"), &[], false));
        assert!(!should_ignore(Path::new("clips/.partial.wav"), &[], true));
        assert!(!should_ignore(Path::new("./clips/message.wav"), &[], false));
    }
}
