//! Logos-based lexers for every supported language
//!
//! Each language has its own logos token enum; all of them map into the
//! shared [`SyntaxKind`] so one parser infrastructure can consume them.

use super::syntax_kind::SyntaxKind;
use crate::base::Language;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping a logos-generated tokenizer
pub struct Lexer<'a, T: Logos<'a>> {
    inner: logos::Lexer<'a, T>,
    offset: u32,
}

impl<'a, T> Lexer<'a, T>
where
    T: Logos<'a, Source = str>,
    T::Extras: Default,
{
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: T::lexer(input),
            offset: 0,
        }
    }
}

impl<'a, T> Iterator for Lexer<'a, T>
where
    T: Logos<'a, Source = str> + Into<SyntaxKind>,
{
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(_) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string in the given language
pub fn tokenize(language: Language, input: &str) -> Vec<Token<'_>> {
    match language {
        Language::Tolk => Lexer::<TolkToken>::new(input).collect(),
        Language::Tlb => Lexer::<TlbToken>::new(input).collect(),
        Language::Fift => Lexer::<FiftToken>::new(input).collect(),
    }
}

/// Tolk tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum TolkToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    #[regex(r"`[^`\n]+`")]
    Ident,

    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"[0-9][0-9_]*")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("tolk")]
    Tolk,
    #[token("import")]
    Import,
    #[token("fun")]
    Fun,
    #[token("get")]
    Get,
    #[token("val")]
    Val,
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("global")]
    Global,
    #[token("type")]
    Type,
    #[token("struct")]
    Struct,
    #[token("enum")]
    Enum,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("repeat")]
    Repeat,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("throw")]
    Throw,
    #[token("assert")]
    Assert,
    #[token("match")]
    Match,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("as")]
    As,
    #[token("is")]
    Is,
    #[token("mutate")]
    Mutate,
    #[token("asm")]
    Asm,
    #[token("builtin")]
    Builtin,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token("<=>")]
    Spaceship,
    #[token("<<")]
    LtLt,
    #[token("<<=")]
    LtLtEq,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("@")]
    At,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("~/")]
    TildeSlash,
    #[token("^/")]
    CaretSlash,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
}

impl From<TolkToken> for SyntaxKind {
    fn from(token: TolkToken) -> Self {
        use TolkToken as T;
        match token {
            T::Whitespace => SyntaxKind::WHITESPACE,
            T::LineComment => SyntaxKind::LINE_COMMENT,
            T::BlockComment => SyntaxKind::BLOCK_COMMENT,
            T::Ident => SyntaxKind::IDENT,
            T::Number => SyntaxKind::INT_NUMBER,
            T::String => SyntaxKind::STRING,
            T::Tolk => SyntaxKind::TOLK_KW,
            T::Import => SyntaxKind::IMPORT_KW,
            T::Fun => SyntaxKind::FUN_KW,
            T::Get => SyntaxKind::GET_KW,
            T::Val => SyntaxKind::VAL_KW,
            T::Var => SyntaxKind::VAR_KW,
            T::Const => SyntaxKind::CONST_KW,
            T::Global => SyntaxKind::GLOBAL_KW,
            T::Type => SyntaxKind::TYPE_KW,
            T::Struct => SyntaxKind::STRUCT_KW,
            T::Enum => SyntaxKind::ENUM_KW,
            T::Return => SyntaxKind::RETURN_KW,
            T::If => SyntaxKind::IF_KW,
            T::Else => SyntaxKind::ELSE_KW,
            T::While => SyntaxKind::WHILE_KW,
            T::Do => SyntaxKind::DO_KW,
            T::Repeat => SyntaxKind::REPEAT_KW,
            T::Try => SyntaxKind::TRY_KW,
            T::Catch => SyntaxKind::CATCH_KW,
            T::Throw => SyntaxKind::THROW_KW,
            T::Assert => SyntaxKind::ASSERT_KW,
            T::Match => SyntaxKind::MATCH_KW,
            T::Break => SyntaxKind::BREAK_KW,
            T::Continue => SyntaxKind::CONTINUE_KW,
            T::True => SyntaxKind::TRUE_KW,
            T::False => SyntaxKind::FALSE_KW,
            T::Null => SyntaxKind::NULL_KW,
            T::As => SyntaxKind::AS_KW,
            T::Is => SyntaxKind::IS_KW,
            T::Mutate => SyntaxKind::MUTATE_KW,
            T::Asm => SyntaxKind::ASM_KW,
            T::Builtin => SyntaxKind::BUILTIN_KW,
            T::LBrace => SyntaxKind::L_BRACE,
            T::RBrace => SyntaxKind::R_BRACE,
            T::LBracket => SyntaxKind::L_BRACKET,
            T::RBracket => SyntaxKind::R_BRACKET,
            T::LParen => SyntaxKind::L_PAREN,
            T::RParen => SyntaxKind::R_PAREN,
            T::Semicolon => SyntaxKind::SEMICOLON,
            T::Colon => SyntaxKind::COLON,
            T::Comma => SyntaxKind::COMMA,
            T::Dot => SyntaxKind::DOT,
            T::Eq => SyntaxKind::EQ,
            T::EqEq => SyntaxKind::EQ_EQ,
            T::BangEq => SyntaxKind::BANG_EQ,
            T::Lt => SyntaxKind::LT,
            T::Gt => SyntaxKind::GT,
            T::LtEq => SyntaxKind::LT_EQ,
            T::Spaceship => SyntaxKind::LT_EQ_GT,
            T::LtLt => SyntaxKind::LT_LT,
            T::LtLtEq => SyntaxKind::LT_LT_EQ,
            T::Arrow => SyntaxKind::ARROW,
            T::FatArrow => SyntaxKind::FAT_ARROW,
            T::At => SyntaxKind::AT,
            T::Question => SyntaxKind::QUESTION,
            T::Bang => SyntaxKind::BANG,
            T::Plus => SyntaxKind::PLUS,
            T::Minus => SyntaxKind::MINUS,
            T::Star => SyntaxKind::STAR,
            T::Slash => SyntaxKind::SLASH,
            T::Percent => SyntaxKind::PERCENT,
            T::Caret => SyntaxKind::CARET,
            T::Amp => SyntaxKind::AMP,
            T::Pipe => SyntaxKind::PIPE,
            T::Tilde => SyntaxKind::TILDE,
            T::AmpAmp => SyntaxKind::AMP_AMP,
            T::PipePipe => SyntaxKind::PIPE_PIPE,
            T::TildeSlash => SyntaxKind::TILDE_SLASH,
            T::CaretSlash => SyntaxKind::CARET_SLASH,
            T::PlusEq => SyntaxKind::PLUS_EQ,
            T::MinusEq => SyntaxKind::MINUS_EQ,
            T::StarEq => SyntaxKind::STAR_EQ,
            T::SlashEq => SyntaxKind::SLASH_EQ,
            T::PercentEq => SyntaxKind::PERCENT_EQ,
            T::AmpEq => SyntaxKind::AMP_EQ,
            T::PipeEq => SyntaxKind::PIPE_EQ,
            T::CaretEq => SyntaxKind::CARET_EQ,
        }
    }
}

/// TL-B tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum TlbToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"#[0-9a-fA-F_]+")]
    #[regex(r"\$[01_]+")]
    Tag,

    #[token("#")]
    Hash,
    #[token("##")]
    HashHash,
    #[token("#<")]
    HashLt,
    #[token("#<=")]
    HashLtEq,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(",")]
    Comma,
}

impl From<TlbToken> for SyntaxKind {
    fn from(token: TlbToken) -> Self {
        use TlbToken as T;
        match token {
            T::Whitespace => SyntaxKind::WHITESPACE,
            T::LineComment => SyntaxKind::LINE_COMMENT,
            T::BlockComment => SyntaxKind::BLOCK_COMMENT,
            T::Ident => SyntaxKind::IDENT,
            T::Number => SyntaxKind::INT_NUMBER,
            T::Tag => SyntaxKind::TLB_TAG,
            T::Hash => SyntaxKind::HASH,
            T::HashHash => SyntaxKind::HASH_HASH,
            T::HashLt => SyntaxKind::HASH_LT,
            T::HashLtEq => SyntaxKind::HASH_LT_EQ,
            T::LBrace => SyntaxKind::L_BRACE,
            T::RBrace => SyntaxKind::R_BRACE,
            T::LBracket => SyntaxKind::L_BRACKET,
            T::RBracket => SyntaxKind::R_BRACKET,
            T::LParen => SyntaxKind::L_PAREN,
            T::RParen => SyntaxKind::R_PAREN,
            T::Semicolon => SyntaxKind::SEMICOLON,
            T::Colon => SyntaxKind::COLON,
            T::Eq => SyntaxKind::EQ,
            T::Caret => SyntaxKind::CARET,
            T::Tilde => SyntaxKind::TILDE,
            T::Star => SyntaxKind::STAR,
            T::Plus => SyntaxKind::PLUS,
            T::Minus => SyntaxKind::MINUS,
            T::Dot => SyntaxKind::DOT,
            T::Question => SyntaxKind::QUESTION,
            T::Bang => SyntaxKind::BANG,
            T::Lt => SyntaxKind::LT,
            T::Gt => SyntaxKind::GT,
            T::LtEq => SyntaxKind::LT_EQ,
            T::Comma => SyntaxKind::COMMA,
        }
    }
}

/// Fift tokens. Fift is word based: everything that is not whitespace, a
/// comment or a string literal is a word, classified later by the parser.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum FiftToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r#""[^"]*""#)]
    String,

    #[regex(r#"[^ \t\r\n"]+"#)]
    Word,
}

impl From<FiftToken> for SyntaxKind {
    fn from(token: FiftToken) -> Self {
        match token {
            FiftToken::Whitespace => SyntaxKind::WHITESPACE,
            FiftToken::LineComment => SyntaxKind::LINE_COMMENT,
            FiftToken::String => SyntaxKind::STRING,
            FiftToken::Word => SyntaxKind::FIFT_WORD,
        }
    }
}
