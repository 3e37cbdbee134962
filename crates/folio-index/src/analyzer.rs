//! Text analysis for the folio index.
//!
//! Two analyzer kinds are available, chosen when an index is created and
//! persisted alongside it:
//!
//! - `Default`: `SimpleTokenizer` → `LowerCaser` → `RemoveLongFilter`, with
//!   an optional language `Stemmer`.
//! - `Cjk`: jieba dictionary segmentation for Han text, plain word splitting
//!   for everything else → `LowerCaser` → `RemoveLongFilter`.

use jieba_rs::{Jieba, TokenizeMode};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer, Token,
    TokenStream, Tokenizer,
};

use crate::IndexError;

/// Name of the analyzer registered with Tantivy for all tokenized fields.
pub const FOLIO_TOKENIZER: &str = "folio_text";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Shared jieba dictionary; loading it is expensive.
static JIEBA: Lazy<Jieba> = Lazy::new(Jieba::new);

/// Which analysis pipeline an index uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Word splitting on non-alphanumerics, with optional stemming.
    Default {
        /// Stemmer language name, if stemming is enabled.
        stemmer: Option<String>,
    },
    /// Dictionary segmentation for Chinese, Japanese and Korean text.
    Cjk,
}

impl Default for AnalyzerKind {
    fn default() -> Self {
        Self::Default { stemmer: None }
    }
}

impl AnalyzerKind {
    /// Builds the kind from configuration strings.
    ///
    /// `tokenizer` is `"default"` or `"cjk"`; `stemmer` is a language name or
    /// `"none"`. The stemmer is ignored for CJK.
    pub fn from_settings(tokenizer: &str, stemmer: &str) -> Result<Self, IndexError> {
        match tokenizer.to_lowercase().as_str() {
            "default" => {
                let stemmer = match stemmer.trim().to_lowercase().as_str() {
                    "" | "none" => None,
                    name => {
                        parse_language(name)?;
                        Some(name.to_string())
                    }
                };
                Ok(Self::Default { stemmer })
            }
            "cjk" => Ok(Self::Cjk),
            other => Err(IndexError::Settings(format!(
                "unknown tokenizer '{other}' (expected 'default' or 'cjk')"
            ))),
        }
    }

    /// Builds the Tantivy analyzer for this kind.
    pub fn build(&self) -> Result<TextAnalyzer, IndexError> {
        match self {
            Self::Default { stemmer: None } => Ok(TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
                .build()),
            Self::Default {
                stemmer: Some(name),
            } => Ok(TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
                .filter(Stemmer::new(parse_language(name)?))
                .build()),
            Self::Cjk => Ok(TextAnalyzer::builder(CjkTokenizer)
                .filter(LowerCaser)
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
                .build()),
        }
    }

    /// Short label for display.
    pub fn label(&self) -> String {
        match self {
            Self::Default { stemmer: None } => "default".into(),
            Self::Default {
                stemmer: Some(name),
            } => format!("default ({name} stemming)"),
            Self::Cjk => "cjk".into(),
        }
    }
}

/// Parses a stemmer language string into a Tantivy `Language`.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    match name.to_lowercase().as_str() {
        "arabic" => Ok(Language::Arabic),
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "finnish" => Ok(Language::Finnish),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "greek" => Ok(Language::Greek),
        "hungarian" => Ok(Language::Hungarian),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "romanian" => Ok(Language::Romanian),
        "russian" => Ok(Language::Russian),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        "tamil" => Ok(Language::Tamil),
        "turkish" => Ok(Language::Turkish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}

/// Runs `text` through `analyzer` and returns the token texts.
pub(crate) fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while stream.advance() {
        tokens.push(stream.token().text.clone());
    }
    tokens
}

/// Tokenizer backed by jieba word segmentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CjkTokenizer;

impl Tokenizer for CjkTokenizer {
    type TokenStream<'a> = CjkTokenStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        let mut tokens = Vec::new();
        let mut offset = 0;

        for segment in JIEBA.tokenize(text, TokenizeMode::Default, true) {
            let word = segment.word;
            let start = offset;
            offset += word.len();

            // Whitespace and punctuation come back as their own segments.
            if !word.chars().any(char::is_alphanumeric) {
                continue;
            }

            tokens.push(Token {
                offset_from: start,
                offset_to: offset,
                position: tokens.len(),
                text: word.to_string(),
                position_length: 1,
            });
        }

        CjkTokenStream { tokens, index: 0 }
    }
}

/// Token stream produced by [`CjkTokenizer`].
#[derive(Debug)]
pub struct CjkTokenStream {
    /// Segmented tokens.
    tokens: Vec<Token>,
    /// One past the current token.
    index: usize,
}

impl TokenStream for CjkTokenStream {
    fn advance(&mut self) -> bool {
        if self.index < self.tokens.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn token(&self) -> &Token {
        &self.tokens[self.index - 1]
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.tokens[self.index - 1]
    }
}
