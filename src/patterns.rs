use regex::Regex;

const EPISODE_PATTERNS: [&str; 4] = [
    r"第([0-9]{1,3})[话話集]",           // 第3话, 第12集
    r"[Ee][Pp]?([0-9]{1,3})([^0-9]|$)", // E3, EP03, ep7
    r"\[([0-9]{1,3})\]([^0-9]|$)",      // [12]
    r"([0-9]{1,3})[话話集]([^0-9]|$)",  // 3话, 12集
];

const SEASON_PATTERNS: [&str; 4] = [
    r"^[Ss]([0-9]{1,2})$",           // S1, S01
    r"[Ss]eason[._ -]*([0-9]{1,2})", // Season 1, Season.01
    r"[Ss]([0-9]{1,2})[^0-9]",       // S1_, S01E
    r"第([0-9]{1,2})[季期]",          // 第1季, 第2期
];

/// Bare digit run not directly after an `S`, used when no episode marker matches.
const EPISODE_FALLBACK: &str = r"([^Ss]|^)([0-9]{1,3})([^0-9]|$)";

const SEASON_DIR_PREFIX: &str = r"^[Ss][0-9]";

/// Precompiled season/episode patterns, tried in priority order.
///
/// Built once at startup and shared read-only by every run.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    episode: Vec<Regex>,
    season: Vec<Regex>,
    episode_fallback: Regex,
    season_dir_prefix: Regex,
}

impl PatternMatcher {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            episode: compile_patterns(&EPISODE_PATTERNS)?,
            season: compile_patterns(&SEASON_PATTERNS)?,
            episode_fallback: Regex::new(EPISODE_FALLBACK)?,
            season_dir_prefix: Regex::new(SEASON_DIR_PREFIX)?,
        })
    }

    /// Episode number as a two-digit string, falling back to a bare digit run.
    pub fn episode_number(&self, filename: &str) -> Option<String> {
        if let Some(episode) = first_capture(filename, &self.episode) {
            return Some(format_number(episode));
        }

        // The leading group is a single non-`S` character (or nothing), so a
        // season number such as `S01` can never be picked up here.
        self.episode_fallback
            .captures(filename)
            .and_then(|caps| caps.get(2))
            .map(|m| format_number(m.as_str()))
    }

    /// Season number as a two-digit string.
    pub fn season_number(&self, text: &str) -> Option<String> {
        first_capture(text, &self.season).map(format_number)
    }

    /// Whether a directory basename already denotes a season (`S1`, `s02 extras`).
    pub fn is_season_dir(&self, basename: &str) -> bool {
        self.season_dir_prefix.is_match(basename)
    }
}

fn compile_patterns(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

fn first_capture<'t>(text: &'t str, regexes: &[Regex]) -> Option<&'t str> {
    regexes
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

/// Zero-pad a numeric string to two digits; anything else passes through.
pub fn format_number(num: &str) -> String {
    match num.parse::<u32>() {
        Ok(n) => format!("{:02}", n),
        Err(_) => num.to_string(),
    }
}
