use regex::Regex;
use std::str::SplitWhitespace;
use std::sync::OnceLock;

static TAGS: OnceLock<Regex> = OnceLock::new();

/// Removes `<...>` markup, leaving the text between tags untouched.
pub fn strip_tags(input: &str) -> String {
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("static tag pattern"));
    tags.replace_all(input, "").into_owned()
}

/// Upper-cases the first character and leaves the rest as is.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lines of at most `max_words` whitespace-separated words, joined by single
/// spaces. Clone the iterator to walk the same lines again.
#[derive(Debug, Clone)]
pub struct WordLines<'a> {
    words: SplitWhitespace<'a>,
    max_words: usize,
}

pub fn wrap_words(text: &str, max_words: usize) -> WordLines<'_> {
    WordLines {
        words: text.split_whitespace(),
        max_words: max_words.max(1),
    }
}

impl Iterator for WordLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut line = String::new();
        for word in self.words.by_ref().take(self.max_words) {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }
}

/// Rough number of lines `text` needs in a column, assuming every character
/// is `avg_char_width` wide. Always at least one.
pub fn estimate_lines(text: &str, column_width: f64, avg_char_width: f64) -> usize {
    let per_line = column_width / avg_char_width;
    if per_line <= 0.0 {
        return 1;
    }
    (text.chars().count() as f64 / per_line) as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup() {
        assert_eq!(strip_tags("<b>Outcome</b> text"), "Outcome text");
        assert_eq!(
            strip_tags("<p class=\"x\">Design <em>solar</em> arrays</p>"),
            "Design solar arrays"
        );
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn stripping_is_idempotent() {
        for input in ["<b>Outcome</b> text", "<<i>>odd</i>", "a < b and c > d", "<br/>"] {
            let once = strip_tags(input);
            assert_eq!(strip_tags(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn capitalizes_first_letter_only() {
        assert_eq!(capitalize_first("beginner"), "Beginner");
        assert_eq!(capitalize_first("iNTERMEDIATE"), "INTERMEDIATE");
        assert_eq!(capitalize_first("élan"), "Élan");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn wraps_into_ceil_n_over_m_lines() {
        let text = (1..=23).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let lines: Vec<_> = wrap_words(&text, 10).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.split(' ').count() <= 10));

        let rejoined: Vec<_> = lines.iter().flat_map(|l| l.split(' ')).collect();
        let original: Vec<_> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn collapses_extra_whitespace() {
        let lines: Vec<_> = wrap_words("  one\ttwo \n three  ", 2).collect();
        assert_eq!(lines, vec!["one two", "three"]);
    }

    #[test]
    fn restarts_from_a_clone() {
        let lines = wrap_words("a b c d e", 2);
        let first: Vec<_> = lines.clone().collect();
        let second: Vec<_> = lines.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert_eq!(wrap_words("   ", 10).count(), 0);
    }

    #[test]
    fn estimates_lines_from_character_count() {
        // 420.945 / 6 = 70.16 characters per line
        assert_eq!(estimate_lines("", 420.945, 6.0), 1);
        assert_eq!(estimate_lines(&"x".repeat(70), 420.945, 6.0), 1);
        assert_eq!(estimate_lines(&"x".repeat(71), 420.945, 6.0), 2);
        assert_eq!(estimate_lines(&"x".repeat(300), 420.945, 6.0), 5);
    }
}
