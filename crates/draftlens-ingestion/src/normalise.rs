//! Comparison normalisation. The output is only ever compared, never shown.

/// Lowercase, turn every punctuation/symbol character into a space, collapse
/// whitespace runs and trim.
pub fn normalise(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_strips_punctuation_and_case() {
        assert_eq!(normalise("Hello, World!"), "hello world");
        assert_eq!(normalise("  state-of-the-art\tmethods.  "), "state of the art methods");
    }

    #[test]
    fn test_normalise_empty_and_symbols_only() {
        assert_eq!(normalise(""), "");
        assert_eq!(normalise(" .,;:!? "), "");
    }

    #[test]
    fn test_normalise_keeps_digits() {
        assert_eq!(normalise("n = 120 (p < 0.05)"), "n 120 p 0 05");
    }
}
