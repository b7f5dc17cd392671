//! Syntax kinds for the Rowan-based CST
//!
//! One enum covers the tokens and nodes of every supported language, so all
//! trees share a single `rowan::Language` and the semantic layer can work
//! with one node type. Kinds specific to a language carry its prefix
//! (`TLB_`, `FIFT_`).

/// All syntax kinds (tokens and nodes).
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, statements, expressions, types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,      // foo, `backticked name`
    INT_NUMBER, // 42, 0xFF, 0b101
    STRING,     // "hello"

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,    // {
    R_BRACE,    // }
    L_BRACKET,  // [
    R_BRACKET,  // ]
    L_PAREN,    // (
    R_PAREN,    // )
    SEMICOLON,  // ;
    COLON,      // :
    COMMA,      // ,
    DOT,        // .
    EQ,         // =
    EQ_EQ,      // ==
    BANG_EQ,    // !=
    LT,         // <
    GT,         // >  (>= and >> are glued by the parser)
    LT_EQ,      // <=
    LT_EQ_GT,   // <=>
    LT_LT,      // <<
    ARROW,      // ->
    FAT_ARROW,  // =>
    AT,         // @
    HASH,       // #
    DOLLAR,     // $
    QUESTION,   // ?
    BANG,       // !
    PLUS,       // +
    MINUS,      // -
    STAR,       // *
    SLASH,      // /
    PERCENT,    // %
    CARET,      // ^
    AMP,        // &
    PIPE,       // |
    TILDE,      // ~
    AMP_AMP,    // &&
    PIPE_PIPE,  // ||
    TILDE_SLASH, // ~/
    CARET_SLASH, // ^/
    PLUS_EQ,    // +=
    MINUS_EQ,   // -=
    STAR_EQ,    // *=
    SLASH_EQ,   // /=
    PERCENT_EQ, // %=
    AMP_EQ,     // &=
    PIPE_EQ,    // |=
    CARET_EQ,   // ^=
    LT_LT_EQ,   // <<=

    // =========================================================================
    // TOLK KEYWORDS
    // =========================================================================
    TOLK_KW,
    IMPORT_KW,
    FUN_KW,
    GET_KW,
    VAL_KW,
    VAR_KW,
    CONST_KW,
    GLOBAL_KW,
    TYPE_KW,
    STRUCT_KW,
    ENUM_KW,
    RETURN_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    DO_KW,
    REPEAT_KW,
    TRY_KW,
    CATCH_KW,
    THROW_KW,
    ASSERT_KW,
    MATCH_KW,
    BREAK_KW,
    CONTINUE_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    AS_KW,
    IS_KW,
    MUTATE_KW,
    ASM_KW,
    BUILTIN_KW,

    // =========================================================================
    // TL-B TOKENS
    // =========================================================================
    TLB_TAG,        // #1f, $10, #_, $_
    HASH_HASH,      // ##
    HASH_LT,        // #<
    HASH_LT_EQ,     // #<=

    // =========================================================================
    // FIFT TOKENS
    // =========================================================================
    FIFT_WORD,      // any whitespace-delimited word

    /// Unrecognized input.
    ERROR,

    // =========================================================================
    // COMMON NODES
    // =========================================================================
    SOURCE_FILE,
    /// The name of a declaration.
    NAME,
    /// An identifier occurrence that refers to a declaration.
    NAME_REF,

    // =========================================================================
    // TOLK DECLARATIONS
    // =========================================================================
    TOLK_VERSION,
    IMPORT,
    ANNOTATION,
    ANNOTATION_ARGS,
    FUNCTION,
    METHOD,
    GET_METHOD,
    RECEIVER,
    PARAM_LIST,
    PARAM,
    TYPE_PARAM_LIST,
    TYPE_PARAM,
    RET_TYPE,
    ASM_BODY,
    BUILTIN_BODY,
    CONST,
    GLOBAL,
    TYPE_ALIAS,
    STRUCT,
    STRUCT_PREFIX,
    STRUCT_BODY,
    FIELD,
    ENUM,
    ENUM_BODY,
    ENUM_MEMBER,
    DEFAULT_VALUE,

    // =========================================================================
    // TOLK TYPES
    // =========================================================================
    TYPE_NAME,
    TYPE_ARG_LIST,
    NULLABLE_TYPE,
    UNION_TYPE,
    TENSOR_TYPE,
    TUPLE_TYPE,
    FUNC_TYPE,
    NULL_TYPE,

    // =========================================================================
    // TOLK STATEMENTS
    // =========================================================================
    BLOCK,
    LET_STMT,
    VAR,
    VAR_TENSOR,
    VAR_TUPLE,
    RETURN_STMT,
    IF_STMT,
    WHILE_STMT,
    DO_WHILE_STMT,
    REPEAT_STMT,
    TRY_STMT,
    CATCH_CLAUSE,
    CATCH_VAR,
    THROW_STMT,
    ASSERT_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    EXPR_STMT,

    // =========================================================================
    // TOLK EXPRESSIONS
    // =========================================================================
    LITERAL,
    PAREN_EXPR,
    TENSOR_EXPR,
    TUPLE_EXPR,
    OBJECT_LITERAL,
    OBJECT_BODY,
    OBJECT_FIELD,
    DOT_EXPR,
    CALL_EXPR,
    ARG_LIST,
    ARG,
    GENERIC_EXPR,
    BIN_EXPR,
    PREFIX_EXPR,
    NOT_NULL_EXPR,
    AS_EXPR,
    IS_EXPR,
    TERNARY_EXPR,
    ASSIGN_EXPR,
    MATCH_EXPR,
    MATCH_BODY,
    MATCH_ARM,
    MATCH_PATTERN,

    // =========================================================================
    // TL-B NODES
    // =========================================================================
    TLB_DECLARATION,
    TLB_CONSTRUCTOR,
    TLB_IMPLICIT_PARAM,
    TLB_CONSTRAINT,
    TLB_FIELD,
    TLB_ANON_FIELD,
    TLB_CELL_REF,
    TLB_COMBINATOR,
    TLB_COMBINATOR_EXPR,
    TLB_TYPE_EXPR,

    // =========================================================================
    // FIFT NODES
    // =========================================================================
    FIFT_INCLUDE,
    FIFT_PROGRAM,
    FIFT_DECLARATION,
    FIFT_PROC,
    FIFT_METHOD,
    FIFT_PROC_CALL,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::TOLK_KW as u16) && (self as u16) <= (Self::BUILTIN_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::LT_LT_EQ as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INT_NUMBER | Self::STRING | Self::TRUE_KW | Self::FALSE_KW | Self::NULL_KW
        )
    }

    /// Tolk declarations that may appear at the top level of a file.
    pub fn is_top_level_decl(self) -> bool {
        matches!(
            self,
            Self::FUNCTION
                | Self::METHOD
                | Self::GET_METHOD
                | Self::CONST
                | Self::GLOBAL
                | Self::TYPE_ALIAS
                | Self::STRUCT
                | Self::ENUM
        )
    }

    /// Tolk statement nodes.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::LET_STMT
                | Self::RETURN_STMT
                | Self::IF_STMT
                | Self::WHILE_STMT
                | Self::DO_WHILE_STMT
                | Self::REPEAT_STMT
                | Self::TRY_STMT
                | Self::THROW_STMT
                | Self::ASSERT_STMT
                | Self::BREAK_STMT
                | Self::CONTINUE_STMT
                | Self::EXPR_STMT
                | Self::BLOCK
        )
    }

    /// Tolk expression nodes. A bare `NAME_REF` counts as an expression.
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            Self::LITERAL
                | Self::PAREN_EXPR
                | Self::TENSOR_EXPR
                | Self::TUPLE_EXPR
                | Self::OBJECT_LITERAL
                | Self::DOT_EXPR
                | Self::CALL_EXPR
                | Self::GENERIC_EXPR
                | Self::BIN_EXPR
                | Self::PREFIX_EXPR
                | Self::NOT_NULL_EXPR
                | Self::AS_EXPR
                | Self::IS_EXPR
                | Self::TERNARY_EXPR
                | Self::ASSIGN_EXPR
                | Self::MATCH_EXPR
                | Self::NAME_REF
        )
    }

    /// Tolk type nodes.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::TYPE_NAME
                | Self::NULLABLE_TYPE
                | Self::UNION_TYPE
                | Self::TENSOR_TYPE
                | Self::TUPLE_TYPE
                | Self::FUNC_TYPE
                | Self::NULL_TYPE
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TonLanguage {}

impl rowan::Language for TonLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<TonLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TonLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TonLanguage>;
