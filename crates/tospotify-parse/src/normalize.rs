use unicode_normalization::UnicodeNormalization;

/// Normalize scraped text to NFC and collapse every whitespace run to a
/// single space, trimming both ends.
///
/// Page markup pads link text with newlines and indentation, and the same
/// accented title can arrive precomposed or decomposed depending on the
/// row. Applying this twice gives the same result as applying it once.
pub fn clean_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(clean_text("  Tum\n\t  Hi   Ho  "), "Tum Hi Ho");
    }

    #[test]
    fn test_normalize_nfc() {
        // e + combining acute accent -> é (precomposed)
        assert_eq!(clean_text("Caf\u{0065}\u{0301}"), "Café");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(clean_text(" \n\u{00a0}\t"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = ["  a  b ", "Track\u{0301}\nOne", "", "x"];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once);
        }
    }
}
