use super::traits::SceneAnalyzer;
use std::time::Duration;

const MIN_FRAGMENT_CHARS: usize = 10;

/// Splits a script into exactly `frame_count` scene descriptions.
///
/// The analyzer gets `deadline` to come back with a usable list. After that, or on
/// any error, the script is split on sentence punctuation instead. The result is
/// padded by repeating scenes from the start and truncated to `frame_count`.
/// When nothing usable comes out, the raw script is the only scene. A zero frame
/// count yields no scenes.
pub async fn split_script(
    analyzer: &dyn SceneAnalyzer,
    script: &str,
    frame_count: usize,
    deadline: Duration,
) -> Vec<String> {
    if frame_count == 0 {
        return Vec::new();
    }
    let trimmed = script.trim();

    let analyzed =
        match tokio::time::timeout(deadline, analyzer.split_into_scenes(trimmed, frame_count)).await
        {
            Ok(Ok(scenes)) => clean_scenes(scenes),
            Ok(Err(e)) => {
                log::warn!("Script analysis failed, using sentence split: {}", e);
                Vec::new()
            }
            Err(_) => {
                log::warn!(
                    "Script analysis exceeded {}ms, using sentence split",
                    deadline.as_millis()
                );
                Vec::new()
            }
        };

    let scenes = if analyzed.is_empty() {
        naive_split(trimmed)
    } else {
        analyzed
    };

    normalize_scenes(scenes, script, frame_count)
}

/// Sentence split on `.`, `!` and `?`, keeping fragments longer than ten characters.
pub fn naive_split(script: &str) -> Vec<String> {
    script
        .split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > MIN_FRAGMENT_CHARS)
        .map(String::from)
        .collect()
}

pub fn normalize_scenes(scenes: Vec<String>, script: &str, frame_count: usize) -> Vec<String> {
    let mut scenes = clean_scenes(scenes);
    if scenes.is_empty() {
        if script.is_empty() {
            return Vec::new();
        }
        scenes.push(script.to_string());
    }

    let available = scenes.len();
    (0..frame_count)
        .map(|i| scenes[i % available].clone())
        .collect()
}

fn clean_scenes(scenes: Vec<String>) -> Vec<String> {
    scenes
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
