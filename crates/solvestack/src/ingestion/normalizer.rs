//! Text clean-up and light classification shared by every adapter.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::SolutionPossibility;

const HUMANIZED_MAX_CHARS: usize = 250;
const HUMANIZED_SENTENCES: usize = 3;
const MAX_KEYWORDS: usize = 5;

const HARDWARE_KEYWORDS: &[&str] = &[
    "hardware",
    "device",
    "iot",
    "sensor",
    "raspberry pi",
    "arduino",
    "embedded",
    "physical",
];

const SOFTWARE_KEYWORDS: &[&str] = &[
    "software",
    "app",
    "website",
    "api",
    "code",
    "script",
    "automation",
    "cloud",
    "saas",
];

const PAIN_POINT_KEYWORDS: &[&str] = &[
    "automation",
    "scalability",
    "dev tools",
    "productivity",
    "infrastructure",
    "deployment",
    "ci/cd",
    "monitoring",
    "debugging",
    "testing",
    "performance",
    "optimization",
    "workflow",
    "build",
    "tooling",
    "platform",
    "devops",
];

const TECH_TERMS: &[&str] = &[
    "python",
    "javascript",
    "react",
    "node",
    "aws",
    "docker",
    "kubernetes",
    "cloud",
    "api",
    "database",
    "frontend",
    "backend",
];

static URL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
static TAG_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Drop `http(s)://` URLs and HTML tags, then collapse whitespace.
pub fn clean_text(value: &str) -> String {
    let mut text = Cow::Borrowed(value);
    if let Some(urls) = compiled(&URL_PATTERN, r"https?://\S+") {
        text = Cow::Owned(urls.replace_all(&text, "").into_owned());
    }
    if let Some(tags) = compiled(&TAG_PATTERN, r"<[^>]+>") {
        text = Cow::Owned(tags.replace_all(&text, "").into_owned());
    }

    text.replace(['\u{feff}', '\u{200b}'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two or three plain sentences summarizing a posting.
pub fn humanize(title: &str, body: &str) -> String {
    let title = strip_ask_prefix(title.trim());
    let combined = format!("{title}. {body}");

    let sentences: Vec<&str> = combined
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .take(HUMANIZED_SENTENCES)
        .collect();
    let explanation = sentences.join(". ");

    if explanation.is_empty() {
        return title.to_string();
    }

    if explanation.chars().count() > HUMANIZED_MAX_CHARS {
        let truncated: String = explanation.chars().take(HUMANIZED_MAX_CHARS - 3).collect();
        format!("{truncated}...")
    } else {
        explanation
    }
}

fn strip_ask_prefix(title: &str) -> &str {
    const PREFIX: &str = "ask hn:";
    match title.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => title[PREFIX.len()..].trim_start(),
        _ => title,
    }
}

pub fn classify_solution(text: &str) -> SolutionPossibility {
    let lowered = text.to_lowercase();
    let hardware = HARDWARE_KEYWORDS.iter().any(|kw| lowered.contains(kw));
    let software = SOFTWARE_KEYWORDS.iter().any(|kw| lowered.contains(kw));

    match (hardware, software) {
        (true, true) => SolutionPossibility::Hybrid,
        (true, false) => SolutionPossibility::Hardware,
        _ => SolutionPossibility::Software,
    }
}

/// Pain-point keywords first, then technology terms, at most five.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for keyword in PAIN_POINT_KEYWORDS.iter().chain(TECH_TERMS) {
        if lowered.contains(keyword) && !found.iter().any(|existing| existing == keyword) {
            found.push((*keyword).to_string());
        }
    }

    found.truncate(MAX_KEYWORDS);
    found
}
