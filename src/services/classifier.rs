use crate::models::MovieRecord;

/// Title fragments that mark a special screening of an already-listed release
///
/// Matched as plain substrings after uppercasing, without word boundaries, so a title
/// such as "The Early Access Pass" is also hidden.
pub const SPECIAL_SCREENING_KEYWORDS: [&str; 10] = [
    "Anniversary",
    "Re-Release",
    "Early Access",
    "Sensory",
    "Double Feature",
    "(Dub)",
    "(Sub)",
    "Rerelease",
    "First Day First Show",
    "Prime Early Access",
];

/// Whether a title reads as a special screening
///
/// A title equal to a keyword (a film literally called "Sensory") is not one.
pub fn is_special_screening(title: &str) -> bool {
    let title_upper = title.to_uppercase();

    SPECIAL_SCREENING_KEYWORDS.iter().any(|keyword| {
        let keyword_upper = keyword.to_uppercase();
        title_upper.contains(&keyword_upper) && title_upper != keyword_upper
    })
}

/// Whether a movie is shown under the current filter toggle
pub fn is_visible(movie: &MovieRecord, hide_special_screenings: bool) -> bool {
    !hide_special_screenings || !is_special_screening(&movie.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieStatus;

    fn movie(title: &str) -> MovieRecord {
        MovieRecord::new("M1", title, MovieStatus::InTheaters)
    }

    #[test]
    fn test_no_filtering_when_toggle_off() {
        for keyword in SPECIAL_SCREENING_KEYWORDS {
            assert!(is_visible(&movie(&format!("Jaws {}", keyword)), false));
        }
    }

    #[test]
    fn test_exact_keyword_title_is_visible() {
        assert!(is_visible(&movie("Sensory"), true));
        assert!(is_visible(&movie("sensory"), true));
    }

    #[test]
    fn test_keyword_substring_is_hidden() {
        assert!(!is_visible(&movie("Sensory Friendly Screening"), true));
        assert!(!is_visible(&movie("Spirited Away (Dub)"), true));
        assert!(!is_visible(&movie("Spirited Away (sub)"), true));
        assert!(!is_visible(&movie("Titanic RERELEASE"), true));
        assert!(!is_visible(&movie("Kill Bill Double Feature"), true));
    }

    #[test]
    fn test_matching_ignores_word_boundaries() {
        assert!(!is_visible(&movie("The Early Access Pass"), true));
    }

    #[test]
    fn test_plain_titles_are_visible() {
        assert!(is_visible(&movie("Dune: Part Two"), true));
        assert!(is_visible(&movie("Substance"), true));
        assert!(is_visible(&movie(""), true));
    }

    #[test]
    fn test_anniversary_scenario() {
        let catalog = vec![
            MovieRecord::new("A", "Dune: Part Two", MovieStatus::InTheaters),
            MovieRecord::new(
                "B",
                "Dune: Part Two (IMAX 70mm Anniversary)",
                MovieStatus::InTheaters,
            ),
        ];

        let visible: Vec<&MovieRecord> = catalog.iter().filter(|m| is_visible(m, true)).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].code, "A");
    }

    #[test]
    fn test_repeated_calls_agree() {
        let titles = ["Alien", "Alien (Sub)", "Prime Early Access: Heat", "Sensory"];
        for title in titles {
            for hide in [true, false] {
                let first = is_visible(&movie(title), hide);
                for _ in 0..5 {
                    assert_eq!(is_visible(&movie(title), hide), first);
                }
            }
        }
    }
}
