//! Flat consumer-facing document model.
//!
//! The output of projection: an ordered token sequence, sentence spans,
//! a language tag and an error flag. Tokens are immutable once
//! constructed and owned exclusively by the document. A failed
//! projection produces a document carrying only the error flag and
//! message, with no tokens; callers must check [`Document::error`]
//! before trusting the content.

use serde::{Deserialize, Serialize};

/// Begin/Inside/Outside entity span marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IobTag {
    #[serde(rename = "O")]
    Outside,
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "I")]
    Inside,
}

impl IobTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            IobTag::Outside => "O",
            IobTag::Begin => "B",
            IobTag::Inside => "I",
        }
    }
}

impl std::fmt::Display for IobTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Length in characters of the original input.
    pub length: usize,
    /// Surface text, CR/LF/TAB escaped as `\xHH`.
    pub text: String,
    pub lemma: String,
    /// Sequence index in output order, starting at 0.
    pub index: usize,
    /// Character offset in the original input.
    pub offset: usize,
    /// Coarse (macro) category code; 0 when unknown.
    pub category: u32,
    /// Token index of the syntactic head; 0 means no head.
    pub head: usize,
    /// Dependency relation label, `"_"` when none.
    pub relation: String,
    /// Sorted `key=value` pairs joined by `|`, `"_"` when empty.
    pub features: String,
    pub iob: IobTag,
    /// Named-entity type, `"_"` when the token is outside any entity.
    pub entity_type: String,
    /// Tokenizer status key.
    pub status: String,
}

/// A sentence span over token indices, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
}

/// Ordered token sequence with sentence spans and error state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    tokens: Vec<Token>,
    sentences: Vec<Sentence>,
    language: String,
    text: String,
    error: bool,
    error_message: String,
}

impl Document {
    /// Empty document for `language`, carrying the original input text.
    pub fn new(language: &str, text: &str) -> Self {
        Self {
            tokens: Vec::new(),
            sentences: Vec::new(),
            language: language.to_string(),
            text: text.to_string(),
            error: false,
            error_message: String::new(),
        }
    }

    /// Document representing a failed projection: no tokens, error flag
    /// set.
    pub fn failed(language: &str, message: impl Into<String>) -> Self {
        Self {
            tokens: Vec::new(),
            sentences: Vec::new(),
            language: language.to_string(),
            text: String::new(),
            error: true,
            error_message: message.into(),
        }
    }

    pub fn error(&self) -> bool {
        self.error
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Original input text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn at(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub(crate) fn push_sentence(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }
}

impl std::ops::Index<usize> for Document {
    type Output = Token;

    fn index(&self, i: usize) -> &Token {
        &self.tokens[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_token(index: usize) -> Token {
        Token {
            length: 5,
            text: "Paris".to_string(),
            lemma: "Paris".to_string(),
            index,
            offset: 0,
            category: 1,
            head: 0,
            relation: "_".to_string(),
            features: "_".to_string(),
            iob: IobTag::Outside,
            entity_type: "_".to_string(),
            status: "t_alphanumeric".to_string(),
        }
    }

    #[test]
    fn test_failed_document_has_no_tokens() {
        let doc = Document::failed("eng", "no SurfaceGraph in analysis result");
        assert!(doc.error());
        assert_eq!(doc.error_message(), "no SurfaceGraph in analysis result");
        assert!(doc.is_empty());
        assert!(doc.sentences().is_empty());
    }

    #[test]
    fn test_indexing_and_iteration() {
        let mut doc = Document::new("eng", "Paris");
        doc.push(sample_token(0));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].text, "Paris");
        assert_eq!(doc.at(1), None);
        assert_eq!(doc.iter().count(), 1);
    }

    #[test]
    fn test_iob_tag_display() {
        assert_eq!(IobTag::Begin.to_string(), "B");
        assert_eq!(IobTag::Inside.to_string(), "I");
        assert_eq!(IobTag::Outside.to_string(), "O");
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut doc = Document::new("eng", "Paris");
        doc.push(sample_token(0));
        doc.push_sentence(Sentence { start: 0, end: 0 });

        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, back);
    }
}
