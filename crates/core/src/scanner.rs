use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    expiry::evaluate,
    loader::load_file,
    types::{ScanOutcome, Thresholds},
};

/// Build a file-name matcher for the glob `*{extension}`.
///
/// `*`, `?` and bracket classes (`[abc]`, `[!abc]`) keep their glob meaning,
/// anything else matches literally.
pub fn extension_matcher(extension: &str) -> anyhow::Result<Regex> {
    let glob = format!("*{extension}");
    let mut pattern = String::with_capacity(glob.len() * 2 + 2);
    pattern.push('^');

    let chars: Vec<char> = glob.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '[' => match chars[i + 1..].iter().position(|&c| c == ']') {
                Some(rel) if rel > 0 => {
                    let class: String = chars[i + 1..i + 1 + rel].iter().collect();
                    pattern.push('[');
                    match class.strip_prefix('!') {
                        Some(rest) => {
                            pattern.push('^');
                            pattern.push_str(&escape_class(rest));
                        }
                        None => pattern.push_str(&escape_class(&class)),
                    }
                    pattern.push(']');
                    i += rel + 1;
                }
                _ => pattern.push_str(r"\["),
            },
            c => pattern.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    pattern.push('$');
    Regex::new(&pattern).with_context(|| format!("invalid extension pattern {extension:?}"))
}

/// Escape a glob class body for a regex class. A `-` between two other
/// characters stays a range; anywhere else it is literal, so `--` can never
/// reach the regex as a set-difference operator.
fn escape_class(class: &str) -> String {
    let chars: Vec<char> = class.chars().collect();
    let mut out = String::with_capacity(chars.len() * 2);
    for (i, &c) in chars.iter().enumerate() {
        let is_range = c == '-'
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1] != '-'
            && chars[i + 1] != '-';
        match c {
            '-' if is_range => out.push('-'),
            '\\' | '[' | ']' | '^' | '&' | '~' | '-' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Every regular file under `root` whose name ends with `extension`.
pub fn find_certificates(root: &Path, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    let matcher = extension_matcher(extension)?;
    let mut found = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if matcher.is_match(&name) {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}

pub fn scan_dir(
    root: &Path,
    extension: &str,
    thresholds: &Thresholds,
    today: NaiveDate,
) -> anyhow::Result<ScanOutcome> {
    let mut outcome = ScanOutcome::new(extension);

    for path in find_certificates(root, extension)? {
        match load_file(&path) {
            Ok(record) => {
                let evaluation =
                    evaluate(&record.common_name, record.not_after, thresholds, today);
                debug!(
                    path = %path.display(),
                    common_name = %evaluation.common_name,
                    days_remaining = evaluation.days_remaining,
                    severity = %evaluation.severity,
                    "evaluated certificate"
                );
                outcome.record(evaluation);
            }
            Err(e) => {
                warn!(path = %path.display(), "skipping file: {e}");
                outcome.skip(path.display().to_string(), e.to_string());
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_is_a_suffix_match() {
        let m = extension_matcher(".crt").unwrap();
        assert!(m.is_match("example.org.crt"));
        assert!(m.is_match(".crt"));
        assert!(!m.is_match("example.org.crt.bak"));
        assert!(!m.is_match("example.org.CRT"));
        assert!(!m.is_match("examplexcrt"));
    }

    #[test]
    fn extension_without_dot_matches_any_suffix() {
        let m = extension_matcher("pem").unwrap();
        assert!(m.is_match("chain.pem"));
        assert!(m.is_match("chainpem"));
    }

    #[test]
    fn glob_wildcards_are_honoured() {
        let m = extension_matcher(".c?t").unwrap();
        assert!(m.is_match("a.crt"));
        assert!(m.is_match("a.cet"));
        assert!(!m.is_match("a.cert"));

        let m = extension_matcher(".[cp][re][tm]").unwrap();
        assert!(m.is_match("a.crt"));
        assert!(m.is_match("a.pem"));
        assert!(!m.is_match("a.key"));

        let m = extension_matcher(".[!k]ey").unwrap();
        assert!(m.is_match("a.hey"));
        assert!(!m.is_match("a.key"));
    }

    #[test]
    fn class_ranges_and_literal_hyphens() {
        let m = extension_matcher(".[a-c]rt").unwrap();
        assert!(m.is_match("x.brt"));
        assert!(!m.is_match("x.drt"));
        assert!(!m.is_match("x.-rt"));

        let m = extension_matcher(".[--]").unwrap();
        assert!(m.is_match("x.-"));
        assert!(!m.is_match("x.a"));

        let m = extension_matcher(".[-x]").unwrap();
        assert!(m.is_match("x.-"));
        assert!(m.is_match("x.x"));
    }

    #[test]
    fn unmatched_bracket_is_literal() {
        let m = extension_matcher(".crt[").unwrap();
        assert!(m.is_match("a.crt["));
        assert!(!m.is_match("a.crt"));
    }
}
