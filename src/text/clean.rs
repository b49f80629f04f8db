use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Links, with or without a scheme, up to the next whitespace
    static ref URL: Regex =
        Regex::new(r"http[^\s\x1C-\x1F]+|www[^\s\x1C-\x1F]+|https[^\s\x1C-\x1F]+").unwrap();

    /// Anything that is neither a word character nor whitespace. Word characters are letters,
    /// numbers of any kind and `_`; combining marks (Arabic harakat) and joiners are not.
    /// Whitespace also covers the ASCII separators U+001C..U+001F.
    static ref PUNCTUATION: Regex = Regex::new(r"[^\p{L}\p{N}_\s\x1C-\x1F]").unwrap();
}

/// Normalize a raw tweet before it is written to the merged dataset
pub fn clean_text(text: &str) -> String {
    let text = URL.replace_all(text, "");
    let text = PUNCTUATION.replace_all(&text, "");

    text.to_lowercase().trim_matches(is_space).to_string()
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn strips_links_and_punctuation() {
        assert_eq!(
            clean_text("Check this out!! http://t.co/abc123 @friend #Happy"),
            "check this out  friend happy"
        );
        assert_eq!(clean_text("see www.example.com/page now."), "see  now");
    }

    #[test]
    fn keeps_arabic_and_accented_letters() {
        assert_eq!(clean_text("  هذا جيد جدا!  "), "هذا جيد جدا");
        assert_eq!(clean_text("Très MAUVAIS, vraiment..."), "très mauvais vraiment");
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(clean_text("top_10 of 2019?"), "top_10 of 2019");
        assert_eq!(clean_text("x½y ٣"), "x½y ٣");
    }

    #[test]
    fn drops_diacritics_and_joiners() {
        assert_eq!(clean_text("جَيِّد"), "جيد");
        assert_eq!(clean_text("می\u{200C}خواهم"), "میخواهم");
        assert_eq!(clean_text("a\u{200D}b"), "ab");
    }

    #[test]
    fn ascii_separators_count_as_whitespace() {
        assert_eq!(clean_text("a\u{1F}b"), "a\u{1F}b");
        assert_eq!(clean_text("\u{1C}a\u{A0}b"), "a\u{A0}b");
        assert_eq!(clean_text("see http://t.co/x\u{1E}now"), "see \u{1E}now");
    }

    #[test]
    fn degenerate_inputs_become_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("!!! ??? ..."), "");
        assert_eq!(clean_text("https://example.com"), "");
    }
}
