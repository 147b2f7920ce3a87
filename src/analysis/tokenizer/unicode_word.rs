//! Unicode word tokenizer implementation.
//!
//! This module provides a tokenizer that splits text using Unicode word
//! boundary rules (UAX #29). Scripts without inter-word spacing still yield
//! usable tokens: every Han ideograph and every Hiragana character becomes
//! its own token, while a run of Katakana stays together.
//!
//! # Examples
//!
//! ```
//! use localsearch::analysis::tokenizer::Tokenizer;
//! use localsearch::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world! 漢字").unwrap().collect();
//!
//! // Punctuation and whitespace are filtered out
//! assert_eq!(tokens[0].text, "Hello");
//! assert_eq!(tokens[1].text, "world");
//! assert_eq!(tokens[2].text, "漢");
//! assert_eq!(tokens[3].text, "字");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
///
/// Segments containing no alphanumeric character (whitespace, punctuation,
/// symbols) are skipped. Token positions count only the kept segments and
/// offsets are byte offsets into the input.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }

    /// Detect token type based on character content.
    fn detect_token_type(word: &str) -> TokenType {
        if word.is_empty() {
            return TokenType::Other;
        }

        if word.chars().all(|c| c.is_numeric()) {
            return TokenType::Num;
        }

        if word.chars().all(|c| matches!(c, '\u{3040}'..='\u{309F}')) {
            return TokenType::Hiragana;
        }

        if word.chars().all(|c| matches!(c, '\u{30A0}'..='\u{30FF}')) {
            return TokenType::Katakana;
        }

        if word
            .chars()
            .any(|c| matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}'))
        {
            return TokenType::Hangul;
        }

        if word.chars().any(|c| {
            matches!(c,
                '\u{4E00}'..='\u{9FFF}' |  // CJK Unified Ideographs
                '\u{3400}'..='\u{4DBF}' |  // CJK Extension A
                '\u{20000}'..='\u{2A6DF}' | // CJK Extension B
                '\u{2A700}'..='\u{2CEAF}'   // CJK Extensions C-E
            )
        }) {
            return TokenType::Cjk;
        }

        if word.chars().all(|c| c.is_alphanumeric() || c == '\'' || c == '.') {
            return TokenType::Alphanum;
        }

        TokenType::Other
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Result<TokenStream<'a>> {
        let tokens = text
            .split_word_bound_indices()
            .filter(|(_, word)| word.chars().any(|c| c.is_alphanumeric()))
            .enumerate()
            .map(|(position, (start_offset, word))| {
                Token::with_offsets(word, position, start_offset, start_offset + word.len())
                    .with_token_type(Self::detect_token_type(word))
            });

        Ok(Box::new(tokens))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        UnicodeWordTokenizer::new()
            .tokenize(input)
            .unwrap()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn test_unicode_word_tokenizer() {
        let tokenizer = UnicodeWordTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("hello, world!").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[1].start_offset, 7);
        assert_eq!(tokens[1].end_offset, 12);
    }

    #[test]
    fn test_mixed_script_segmentation() {
        assert_eq!(
            texts("Buy fresh テスト 漢字 ひらがな fruit"),
            vec!["Buy", "fresh", "テスト", "漢", "字", "ひ", "ら", "が", "な", "fruit"]
        );
    }

    #[test]
    fn test_repeated_word_offsets() {
        let tokens: Vec<Token> = UnicodeWordTokenizer::new()
            .tokenize("fruit and fruit")
            .unwrap()
            .collect();

        assert_eq!(tokens[2].text, "fruit");
        assert_eq!(tokens[2].start_offset, 10);
    }

    #[test]
    fn test_token_types() {
        let tokens: Vec<Token> = UnicodeWordTokenizer::new()
            .tokenize("fruit 42 テスト 漢 ひ 한국")
            .unwrap()
            .collect();
        let types: Vec<_> = tokens.iter().filter_map(|t| t.token_type).collect();

        assert_eq!(
            types,
            vec![
                TokenType::Alphanum,
                TokenType::Num,
                TokenType::Katakana,
                TokenType::Cjk,
                TokenType::Hiragana,
                TokenType::Hangul,
            ]
        );
    }

    #[test]
    fn test_deterministic_restart() {
        let tokenizer = UnicodeWordTokenizer::new();
        let text = "Buy fresh fruit";
        let first: Vec<Token> = tokenizer.tokenize(text).unwrap().collect();
        let second: Vec<Token> = tokenizer.tokenize(text).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_punctuation_only() {
        assert!(texts("... !!! ---").is_empty());
        assert!(texts("").is_empty());
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(UnicodeWordTokenizer::new().name(), "unicode_word");
    }
}
