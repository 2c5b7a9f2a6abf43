use regex::Regex;
use std::sync::OnceLock;

/// Canonical `SxxEyy` join key for a season/episode pair.
///
/// Both numbers are zero-padded to two digits; wider numbers are kept whole.
#[must_use]
pub fn episode_key(season_number: i32, episode_number: i32) -> String {
    format!("S{season_number:02}E{episode_number:02}")
}

/// Finds the first `S<2 digits>E<digits>` token in a filename.
///
/// The match is case-insensitive and returned exactly as it appears in the
/// name, so `show.s01e02.mkv` yields `s01e02`. Only ASCII letters and digits
/// count.
#[must_use]
pub fn extract_episode_key(filename: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"(?i-u)S([0-9]{2})E([0-9]+)").expect("Invalid regex"));

    re.find(filename).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_key_padding() {
        assert_eq!(episode_key(1, 2), "S01E02");
        assert_eq!(episode_key(12, 34), "S12E34");
        assert_eq!(episode_key(1, 100), "S01E100");
        assert_eq!(episode_key(0, 0), "S00E00");
    }

    #[test]
    fn test_extract_plex_style() {
        assert_eq!(extract_episode_key("Show - S01E02.mkv"), Some("S01E02"));
        assert_eq!(
            extract_episode_key("Show - S01E02 - Title [1080p].mkv"),
            Some("S01E02")
        );
    }

    #[test]
    fn test_extract_preserves_case_and_width() {
        assert_eq!(extract_episode_key("show.s03e07.720p.mkv"), Some("s03e07"));
        assert_eq!(extract_episode_key("One.Piece.S01E1071.mkv"), Some("S01E1071"));
        assert_eq!(extract_episode_key("Show S02E5.mp4"), Some("S02E5"));
    }

    #[test]
    fn test_extract_first_match_wins() {
        assert_eq!(extract_episode_key("S01E01-S01E02.mkv"), Some("S01E01"));
        assert_eq!(
            extract_episode_key("Show S٠١E٠٢ - S01E02.mkv"),
            Some("S01E02")
        );
    }

    #[test]
    fn test_extract_absent() {
        assert_eq!(extract_episode_key("[SubsPlease] Frieren - 01 [1080p].mkv"), None);
        assert_eq!(extract_episode_key("Show S1E02.mkv"), None);
        assert_eq!(extract_episode_key(""), None);
        assert_eq!(extract_episode_key("SxxEyy"), None);
        assert_eq!(extract_episode_key("Show S١٢E٣.mkv"), None);
        assert_eq!(extract_episode_key("Show ſ01E02.mkv"), None);
    }

    #[test]
    fn test_three_digit_season_is_not_a_key() {
        assert_eq!(extract_episode_key("S123E04.mkv"), None);
    }
}
