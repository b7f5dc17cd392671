//! Recursive descent parser infrastructure
//!
//! Builds a rowan GreenNode tree from tokens. The grammar for each language
//! lives in [`super::grammar`]; this module owns token inspection, node
//! building and error recovery. Parsing never fails: unexpected input is
//! wrapped in `ERROR` nodes and reported as [`SyntaxError`]s.

use super::grammar;
use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;
use crate::base::Language;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize, Checkpoint};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

/// Parse source code of the given language into a CST
pub fn parse(language: Language, input: &str) -> Parse {
    let tokens = tokenize(language, input);
    let mut parser = Parser::new(&tokens);
    match language {
        Language::Tolk => grammar::tolk::source_file(&mut parser),
        Language::Tlb => grammar::tlb::source_file(&mut parser),
        Language::Fift => grammar::fift::source_file(&mut parser),
    }
    parser.finish()
}

/// The parser state
pub(crate) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// Index of the n-th non-trivia token at or after the cursor.
    fn nth_index(&self, n: usize) -> Option<usize> {
        let mut count = 0;
        for idx in self.pos..self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
        }
        None
    }

    pub(crate) fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn current_text(&self) -> &'a str {
        self.nth_text(0)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.nth_index(0).is_none()
    }

    /// Look ahead, skipping trivia. Past the end this is `ERROR`.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'a str {
        self.nth_index(n).map(|idx| self.tokens[idx].text).unwrap_or("")
    }

    /// Whether the n-th significant token directly follows the previous one,
    /// with no trivia in between. Used to glue `>=`, `>>` and `>>=`.
    pub(crate) fn nth_is_joint(&self, n: usize) -> bool {
        match self.nth_index(n) {
            Some(idx) if n > 0 => self.nth_index(n - 1) == Some(idx - 1),
            _ => false,
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    pub(crate) fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    pub(crate) fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Consume everything that is left, trivia included.
    pub(crate) fn bump_remaining(&mut self) {
        while self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = match self.nth_index(0) {
            Some(idx) => {
                let t = &self.tokens[idx];
                TextRange::at(t.offset, TextSize::of(t.text))
            }
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            }
        };
        self.errors.push(SyntaxError::new(message, range));
    }

    pub(crate) fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    /// Start the root node. Leading trivia stays inside it.
    pub(crate) fn start_root(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());
    }

    /// Start a node at the next significant token, so preceding trivia
    /// (doc comments included) stays outside of it.
    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    /// Wrap the next token in a node of the given kind (`NAME`, `NAME_REF`).
    pub(crate) fn wrap_token(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// Position marker used by loops to guarantee progress.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}
