//! Steam store URL parsing.

use regex::Regex;
use std::sync::OnceLock;

fn app_id_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"/app/(\d+)/").expect("app id pattern is valid"),
            Regex::new(r"/app/(\d+)").expect("app id pattern is valid"),
        ]
    })
}

/// Extract the numeric app id from a store URL like
/// `https://store.steampowered.com/app/730/CounterStrike_2/`.
///
/// A segment closed by a slash wins over one that isn't; the trailing slash
/// is otherwise optional.
pub fn extract_app_id(url: &str) -> Option<String> {
    app_id_patterns().iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}
