use crate::patterns::PatternMatcher;

/// Build the `Series.SxxExx.ext` name for a file.
///
/// A movie keeps only the series name. When no episode number can be found
/// the original name is returned unchanged.
pub fn generate_filename(
    matcher: &PatternMatcher,
    original_name: &str,
    series_name: &str,
    season_number: &str,
    extension: &str,
    is_movie: bool,
) -> String {
    if is_movie {
        return format!("{}{}", series_name, extension);
    }

    match matcher.episode_number(original_name) {
        Some(episode) => format!(
            "{}.S{}E{}{}",
            series_name, season_number, episode, extension
        ),
        None => original_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PatternMatcher {
        PatternMatcher::new().unwrap()
    }

    #[test]
    fn test_episode_name() {
        let m = matcher();
        assert_eq!(
            generate_filename(&m, "[Group] Show - 第7话.mkv", "Show", "02", ".mkv", false),
            "Show.S02E07.mkv"
        );
        assert_eq!(
            generate_filename(&m, "Show.S01E03.MP4", "Show", "01", ".MP4", false),
            "Show.S01E03.MP4"
        );
    }

    #[test]
    fn test_movie_discards_episode() {
        let m = matcher();
        assert_eq!(
            generate_filename(&m, "something.E05.mkv", "Film", "01", ".mkv", true),
            "Film.mkv"
        );
    }

    #[test]
    fn test_no_episode_keeps_original() {
        let m = matcher();
        assert_eq!(
            generate_filename(&m, "trailer.mkv", "Show", "01", ".mkv", false),
            "trailer.mkv"
        );
    }
}
