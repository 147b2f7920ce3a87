//! Strip filter implementation.

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A filter that removes punctuation embedded in tokens.
///
/// Word segmentation keeps apostrophes and periods inside words
/// (`don't`, `e.g`); this filter drops them so that `dont` and `don't`
/// normalize to the same token. Tokens left empty are stopped.
#[derive(Clone, Debug, Default)]
pub struct StripFilter;

impl StripFilter {
    /// Create a new strip filter.
    pub fn new() -> Self {
        StripFilter
    }
}

/// Punctuation in ASCII, general punctuation, CJK punctuation and
/// full-width forms.
pub(crate) fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c,
            '\u{00A1}' | '\u{00AB}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}' |
            '\u{2010}'..='\u{2027}' |
            '\u{2030}'..='\u{205E}' |
            '\u{3001}'..='\u{3003}' |
            '\u{3008}'..='\u{3011}' |
            '\u{3014}'..='\u{301F}' |
            '\u{30FB}' |
            '\u{FF01}'..='\u{FF0F}' |
            '\u{FF1A}'..='\u{FF20}' |
            '\u{FF3B}'..='\u{FF40}' |
            '\u{FF5B}'..='\u{FF65}'
        )
}

impl Filter for StripFilter {
    fn filter<'a>(&self, tokens: TokenStream<'a>) -> Result<TokenStream<'a>> {
        Ok(Box::new(tokens.map(|token| {
            if token.is_stopped() || !token.text.chars().any(is_punctuation) {
                return token;
            }

            let stripped: String = token.text.chars().filter(|c| !is_punctuation(*c)).collect();
            if stripped.is_empty() {
                token.stop()
            } else {
                token.with_text(stripped)
            }
        })))
    }

    fn name(&self) -> &'static str {
        "strip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_strip_filter() {
        let filter = StripFilter::new();
        let tokens = vec![
            Token::new("don't", 0),
            Token::new("world", 1),
            Token::new("・", 2),
            Token::new("ー", 3),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 4);
        assert_eq!(result[0].text, "dont");
        assert_eq!(result[1].text, "world");
        assert!(result[2].is_stopped());
        // prolonged sound mark is part of Katakana words
        assert_eq!(result[3].text, "ー");
        assert!(!result[3].is_stopped());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StripFilter::new().name(), "strip");
    }
}
