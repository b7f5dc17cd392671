//! Tolk grammar
//!
//! ```text
//! SourceFile  = (TolkVersion | Import | Decl)*
//! Decl        = Annotation* (Function | Method | GetMethod | Struct)
//!             | Const | Global | TypeAlias | Enum
//! Function    = 'fun' Name TypeParams? Params RetType? Body
//! Method      = 'fun' Receiver '.' Name TypeParams? Params RetType? Body
//! GetMethod   = 'get' 'fun'? Name Params RetType? Block
//! Struct      = 'struct' StructPrefix? Name TypeParams? StructBody
//! Enum        = 'enum' Name (':' Type)? EnumBody
//! ```

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind::{self, *};

const TOP_LEVEL_START: &[SyntaxKind] = &[
    TOLK_KW, IMPORT_KW, FUN_KW, GET_KW, CONST_KW, GLOBAL_KW, TYPE_KW, STRUCT_KW, ENUM_KW, AT,
];

const STMT_RECOVERY: &[SyntaxKind] = &[SEMICOLON, R_BRACE, L_BRACE, COMMA, R_PAREN, R_BRACKET];

const ASSIGN_OPS: &[SyntaxKind] = &[
    EQ, PLUS_EQ, MINUS_EQ, STAR_EQ, SLASH_EQ, PERCENT_EQ, AMP_EQ, PIPE_EQ, CARET_EQ, LT_LT_EQ,
];

/// Parse a whole Tolk file.
pub(crate) fn source_file(p: &mut Parser) {
    p.start_root();
    while !p.at_eof() {
        let before = p.position();
        top_level_item(p);
        if p.position() == before {
            p.error_recover("unexpected token", &[]);
        }
    }
    p.bump_remaining();
    p.finish_node();
}

fn top_level_item(p: &mut Parser) {
    match p.current_kind() {
        TOLK_KW => tolk_version(p),
        IMPORT_KW => import(p),
        AT | FUN_KW | GET_KW | STRUCT_KW => annotated_declaration(p),
        CONST_KW => constant(p),
        GLOBAL_KW => global(p),
        TYPE_KW => type_alias(p),
        ENUM_KW => enum_decl(p),
        SEMICOLON => p.bump(),
        _ => p.error_recover("expected a top-level declaration", TOP_LEVEL_START),
    }
}

fn tolk_version(p: &mut Parser) {
    p.start_node(TOLK_VERSION);
    p.bump();
    while p.at_any(&[INT_NUMBER, DOT]) {
        p.bump();
    }
    p.eat(SEMICOLON);
    p.finish_node();
}

fn import(p: &mut Parser) {
    p.start_node(IMPORT);
    p.bump();
    p.expect(STRING);
    p.eat(SEMICOLON);
    p.finish_node();
}

// =============================================================================
// Declarations
// =============================================================================

fn annotated_declaration(p: &mut Parser) {
    let cp = p.checkpoint();
    while p.at(AT) {
        annotation(p);
    }
    match p.current_kind() {
        STRUCT_KW => {
            p.start_node_at(cp, STRUCT);
            struct_rest(p);
            p.finish_node();
        }
        GET_KW => {
            p.start_node_at(cp, GET_METHOD);
            p.bump();
            p.eat(FUN_KW);
            name(p);
            param_list(p);
            ret_type(p);
            function_body(p);
            p.finish_node();
        }
        FUN_KW => {
            let is_method = at_method_head(p);
            p.start_node_at(cp, if is_method { METHOD } else { FUNCTION });
            p.bump();
            if is_method {
                p.start_node(RECEIVER);
                nullable_type(p);
                p.finish_node();
                p.expect(DOT);
            }
            name(p);
            if p.at(LT) {
                type_param_list(p);
            }
            param_list(p);
            ret_type(p);
            function_body(p);
            p.finish_node();
        }
        _ => {
            p.start_node_at(cp, ERROR);
            p.error("expected a declaration after annotations");
            p.finish_node();
        }
    }
}

/// `fun Point.sum`, `fun Box<T>.get`, `fun (int, int).swap`
fn at_method_head(p: &Parser) -> bool {
    match p.nth(1) {
        L_PAREN | L_BRACKET => true,
        IDENT => match p.nth(2) {
            DOT | QUESTION => true,
            LT => skip_angle_args(p, 2).is_some_and(|next| p.nth(next) == DOT),
            _ => false,
        },
        _ => false,
    }
}

fn annotation(p: &mut Parser) {
    p.start_node(ANNOTATION);
    p.bump();
    p.expect(IDENT);
    if p.at(L_PAREN) {
        p.start_node(ANNOTATION_ARGS);
        p.bump();
        while !p.at(R_PAREN) && !p.at_eof() {
            let before = p.position();
            expr(p);
            if !p.eat(COMMA) && p.position() == before {
                break;
            }
        }
        p.expect(R_PAREN);
        p.finish_node();
    }
    p.finish_node();
}

fn name(p: &mut Parser) {
    if p.at(IDENT) {
        p.wrap_token(NAME);
    } else {
        p.error("expected a name");
    }
}

fn name_ref(p: &mut Parser) {
    p.wrap_token(NAME_REF);
}

fn type_param_list(p: &mut Parser) {
    p.start_node(TYPE_PARAM_LIST);
    p.bump();
    while p.at(IDENT) {
        p.start_node(TYPE_PARAM);
        name(p);
        if p.eat(EQ) {
            type_(p);
        }
        p.finish_node();
        if !p.eat(COMMA) {
            break;
        }
    }
    p.expect(GT);
    p.finish_node();
}

fn param_list(p: &mut Parser) {
    p.start_node(PARAM_LIST);
    if !p.expect(L_PAREN) {
        p.finish_node();
        return;
    }
    while !p.at(R_PAREN) && !p.at_eof() {
        if p.at_any(&[IDENT, MUTATE_KW]) {
            param(p);
        } else {
            p.error_recover("expected a parameter", &[COMMA, R_PAREN, L_BRACE]);
        }
        if !p.eat(COMMA) && !p.at(R_PAREN) {
            break;
        }
    }
    p.expect(R_PAREN);
    p.finish_node();
}

fn param(p: &mut Parser) {
    p.start_node(PARAM);
    p.eat(MUTATE_KW);
    name(p);
    if p.eat(COLON) {
        type_(p);
    }
    if p.at(EQ) {
        default_value(p);
    }
    p.finish_node();
}

fn default_value(p: &mut Parser) {
    p.start_node(DEFAULT_VALUE);
    p.bump();
    expr(p);
    p.finish_node();
}

fn ret_type(p: &mut Parser) {
    if p.at(COLON) {
        p.start_node(RET_TYPE);
        p.bump();
        type_(p);
        p.finish_node();
    }
}

fn function_body(p: &mut Parser) {
    match p.current_kind() {
        L_BRACE => block(p),
        ASM_KW => {
            p.start_node(ASM_BODY);
            p.bump();
            if p.eat(L_PAREN) {
                while !p.at(R_PAREN) && !p.at_eof() && !p.at(SEMICOLON) {
                    p.bump();
                }
                p.expect(R_PAREN);
            }
            while p.at(STRING) {
                p.bump();
            }
            p.eat(SEMICOLON);
            p.finish_node();
        }
        BUILTIN_KW => {
            p.start_node(BUILTIN_BODY);
            p.bump();
            p.eat(SEMICOLON);
            p.finish_node();
        }
        SEMICOLON => p.bump(),
        _ => p.error("expected a function body"),
    }
}

fn constant(p: &mut Parser) {
    p.start_node(CONST);
    p.bump();
    name(p);
    if p.eat(COLON) {
        type_(p);
    }
    if p.expect(EQ) {
        expr(p);
    }
    p.eat(SEMICOLON);
    p.finish_node();
}

fn global(p: &mut Parser) {
    p.start_node(GLOBAL);
    p.bump();
    name(p);
    if p.expect(COLON) {
        type_(p);
    }
    p.eat(SEMICOLON);
    p.finish_node();
}

fn type_alias(p: &mut Parser) {
    p.start_node(TYPE_ALIAS);
    p.bump();
    name(p);
    if p.at(LT) {
        type_param_list(p);
    }
    if p.expect(EQ) {
        p.eat(PIPE);
        type_(p);
    }
    p.eat(SEMICOLON);
    p.finish_node();
}

/// Everything after annotations, starting at `struct`.
fn struct_rest(p: &mut Parser) {
    p.bump();
    if p.at(L_PAREN) {
        p.start_node(STRUCT_PREFIX);
        p.bump();
        expr(p);
        p.expect(R_PAREN);
        p.finish_node();
    }
    name(p);
    if p.at(LT) {
        type_param_list(p);
    }
    if p.at(L_BRACE) {
        struct_body(p);
    } else {
        p.eat(SEMICOLON);
    }
}

fn struct_body(p: &mut Parser) {
    p.start_node(STRUCT_BODY);
    p.bump();
    while !p.at(R_BRACE) && !p.at_eof() {
        match p.current_kind() {
            IDENT => field(p),
            SEMICOLON | COMMA => p.bump(),
            _ => p.error_recover("expected a field", &[R_BRACE, IDENT]),
        }
    }
    p.expect(R_BRACE);
    p.finish_node();
}

fn field(p: &mut Parser) {
    p.start_node(FIELD);
    // `private` / `readonly` modifiers
    while p.at(IDENT) && p.nth(1) == IDENT && matches!(p.current_text(), "private" | "readonly") {
        p.bump();
    }
    name(p);
    if p.expect(COLON) {
        type_(p);
    }
    if p.at(EQ) {
        default_value(p);
    }
    p.finish_node();
}

fn enum_decl(p: &mut Parser) {
    p.start_node(ENUM);
    p.bump();
    name(p);
    if p.eat(COLON) {
        type_(p);
    }
    if p.at(L_BRACE) {
        p.start_node(ENUM_BODY);
        p.bump();
        while !p.at(R_BRACE) && !p.at_eof() {
            match p.current_kind() {
                IDENT => {
                    p.start_node(ENUM_MEMBER);
                    name(p);
                    if p.at(EQ) {
                        default_value(p);
                    }
                    p.finish_node();
                }
                SEMICOLON | COMMA => p.bump(),
                _ => p.error_recover("expected an enum member", &[R_BRACE, IDENT]),
            }
        }
        p.expect(R_BRACE);
        p.finish_node();
    }
    p.finish_node();
}

// =============================================================================
// Types
// =============================================================================

pub(crate) fn type_(p: &mut Parser) {
    let cp = p.checkpoint();
    nullable_type(p);
    if p.at(PIPE) {
        p.start_node_at(cp, UNION_TYPE);
        while p.eat(PIPE) {
            nullable_type(p);
        }
        p.finish_node();
    }
}

fn nullable_type(p: &mut Parser) {
    let cp = p.checkpoint();
    primary_type(p);
    while p.at(QUESTION) {
        p.start_node_at(cp, NULLABLE_TYPE);
        p.bump();
        p.finish_node();
    }
}

fn primary_type(p: &mut Parser) {
    match p.current_kind() {
        IDENT => {
            p.start_node(TYPE_NAME);
            name_ref(p);
            if p.at(LT) {
                type_arg_list(p);
            }
            p.finish_node();
        }
        NULL_KW => {
            p.start_node(NULL_TYPE);
            p.bump();
            p.finish_node();
        }
        L_PAREN => {
            let cp = p.checkpoint();
            p.start_node(TENSOR_TYPE);
            p.bump();
            type_list(p, R_PAREN);
            p.expect(R_PAREN);
            p.finish_node();
            if p.at(ARROW) {
                p.start_node_at(cp, FUNC_TYPE);
                p.bump();
                type_(p);
                p.finish_node();
            }
        }
        L_BRACKET => {
            p.start_node(TUPLE_TYPE);
            p.bump();
            type_list(p, R_BRACKET);
            p.expect(R_BRACKET);
            p.finish_node();
        }
        _ => p.error("expected a type"),
    }
}

fn type_list(p: &mut Parser, close: SyntaxKind) {
    while !p.at(close) && !p.at_eof() {
        let before = p.position();
        type_(p);
        if !p.eat(COMMA) || p.position() == before {
            break;
        }
    }
}

fn type_arg_list(p: &mut Parser) {
    p.start_node(TYPE_ARG_LIST);
    p.bump();
    type_list(p, GT);
    p.expect(GT);
    p.finish_node();
}

/// If the n-th token opens a `<...>` that can only be a type argument list,
/// returns the lookahead index just past the closing `>`.
fn skip_angle_args(p: &Parser, n: usize) -> Option<usize> {
    if p.nth(n) != LT {
        return None;
    }
    let mut depth = 0usize;
    let mut idx = n;
    loop {
        match p.nth(idx) {
            LT => depth += 1,
            GT => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            IDENT | COMMA | QUESTION | PIPE | L_PAREN | R_PAREN | L_BRACKET | R_BRACKET
            | NULL_KW | ARROW => {}
            _ => return None,
        }
        idx += 1;
        if idx > n + 64 {
            return None;
        }
    }
}

/// `foo<int>(`, `Box<int> {`, `Wrapper<T>.create(`
fn at_generic_args(p: &Parser, n: usize) -> bool {
    skip_angle_args(p, n).is_some_and(|next| matches!(p.nth(next), L_PAREN | DOT | L_BRACE))
}

// =============================================================================
// Statements
// =============================================================================

fn block(p: &mut Parser) {
    p.start_node(BLOCK);
    p.expect(L_BRACE);
    while !p.at(R_BRACE) && !p.at_eof() {
        let before = p.position();
        statement(p);
        if p.position() == before {
            p.error_recover("unexpected token", &[R_BRACE]);
        }
    }
    p.expect(R_BRACE);
    p.finish_node();
}

fn statement(p: &mut Parser) {
    match p.current_kind() {
        VAL_KW | VAR_KW => let_stmt(p),
        RETURN_KW => {
            p.start_node(RETURN_STMT);
            p.bump();
            if !p.at_any(&[SEMICOLON, R_BRACE]) {
                expr(p);
            }
            p.eat(SEMICOLON);
            p.finish_node();
        }
        IF_KW => if_stmt(p),
        WHILE_KW => {
            p.start_node(WHILE_STMT);
            p.bump();
            paren_condition(p);
            block(p);
            p.finish_node();
        }
        DO_KW => {
            p.start_node(DO_WHILE_STMT);
            p.bump();
            block(p);
            if p.expect(WHILE_KW) {
                paren_condition(p);
            }
            p.eat(SEMICOLON);
            p.finish_node();
        }
        REPEAT_KW => {
            p.start_node(REPEAT_STMT);
            p.bump();
            paren_condition(p);
            block(p);
            p.finish_node();
        }
        TRY_KW => try_stmt(p),
        THROW_KW => {
            p.start_node(THROW_STMT);
            p.bump();
            expr(p);
            p.eat(SEMICOLON);
            p.finish_node();
        }
        ASSERT_KW => {
            p.start_node(ASSERT_STMT);
            p.bump();
            if p.expect(L_PAREN) {
                expr(p);
                if p.eat(COMMA) {
                    expr(p);
                }
                p.expect(R_PAREN);
            }
            if p.eat(THROW_KW) {
                expr(p);
            }
            p.eat(SEMICOLON);
            p.finish_node();
        }
        BREAK_KW | CONTINUE_KW => {
            let kind = if p.at(BREAK_KW) { BREAK_STMT } else { CONTINUE_STMT };
            p.start_node(kind);
            p.bump();
            p.eat(SEMICOLON);
            p.finish_node();
        }
        L_BRACE => block(p),
        SEMICOLON => p.bump(),
        _ => {
            let is_match = p.at(MATCH_KW);
            p.start_node(EXPR_STMT);
            expr(p);
            if !p.eat(SEMICOLON) && !is_match && !p.at(R_BRACE) {
                p.error("expected ';'");
            }
            p.finish_node();
        }
    }
}

fn let_stmt(p: &mut Parser) {
    p.start_node(LET_STMT);
    p.bump();
    var_pattern(p);
    if p.eat(EQ) {
        expr(p);
    }
    if !p.eat(SEMICOLON) && !p.at(R_BRACE) {
        p.error("expected ';'");
    }
    p.finish_node();
}

fn var_pattern(p: &mut Parser) {
    match p.current_kind() {
        L_PAREN | L_BRACKET => {
            let (kind, close) = if p.at(L_PAREN) {
                (VAR_TENSOR, R_PAREN)
            } else {
                (VAR_TUPLE, R_BRACKET)
            };
            p.start_node(kind);
            p.bump();
            while !p.at(close) && !p.at_eof() {
                let before = p.position();
                var_pattern(p);
                if !p.eat(COMMA) || p.position() == before {
                    break;
                }
            }
            p.expect(close);
            p.finish_node();
        }
        IDENT => {
            p.start_node(VAR);
            name(p);
            if p.eat(COLON) {
                type_(p);
            }
            p.finish_node();
        }
        _ => p.error("expected a variable name"),
    }
}

fn paren_condition(p: &mut Parser) {
    if p.expect(L_PAREN) {
        expr(p);
        p.expect(R_PAREN);
    }
}

fn if_stmt(p: &mut Parser) {
    p.start_node(IF_STMT);
    p.bump();
    paren_condition(p);
    block(p);
    if p.eat(ELSE_KW) {
        if p.at(IF_KW) {
            if_stmt(p);
        } else {
            block(p);
        }
    }
    p.finish_node();
}

fn try_stmt(p: &mut Parser) {
    p.start_node(TRY_STMT);
    p.bump();
    block(p);
    if p.at(CATCH_KW) {
        p.start_node(CATCH_CLAUSE);
        p.bump();
        if p.eat(L_PAREN) {
            while p.at(IDENT) {
                p.start_node(CATCH_VAR);
                name(p);
                p.finish_node();
                if !p.eat(COMMA) {
                    break;
                }
            }
            p.expect(R_PAREN);
        }
        block(p);
        p.finish_node();
    }
    p.finish_node();
}

// =============================================================================
// Expressions
// =============================================================================

pub(crate) fn expr(p: &mut Parser) {
    let cp = p.checkpoint();
    ternary(p);
    let op_len = if p.at_any(ASSIGN_OPS) {
        1
    } else if p.at(GT) && p.nth(1) == GT && p.nth(2) == EQ && p.nth_is_joint(1) && p.nth_is_joint(2)
    {
        3
    } else {
        0
    };
    if op_len > 0 {
        p.start_node_at(cp, ASSIGN_EXPR);
        for _ in 0..op_len {
            p.bump();
        }
        expr(p);
        p.finish_node();
    }
}

fn ternary(p: &mut Parser) {
    let cp = p.checkpoint();
    binary(p, 1);
    if p.at(QUESTION) {
        p.start_node_at(cp, TERNARY_EXPR);
        p.bump();
        expr(p);
        p.expect(COLON);
        ternary(p);
        p.finish_node();
    }
}

/// Binary operator at the cursor: (precedence, token count).
fn binary_op(p: &Parser) -> Option<(u8, usize)> {
    let op = match p.current_kind() {
        PIPE_PIPE => (1, 1),
        AMP_AMP => (2, 1),
        PIPE => (3, 1),
        CARET => (4, 1),
        AMP => (5, 1),
        EQ_EQ | BANG_EQ => (6, 1),
        LT | LT_EQ | LT_EQ_GT => (7, 1),
        GT => {
            let glued = |n: usize, kind: SyntaxKind| p.nth(n) == kind && p.nth_is_joint(n);
            if glued(1, GT) {
                if glued(2, EQ) {
                    return None;
                }
                (8, 2)
            } else if glued(1, EQ) {
                (7, 2)
            } else {
                (7, 1)
            }
        }
        LT_LT => (8, 1),
        PLUS | MINUS => (9, 1),
        STAR | SLASH | PERCENT | TILDE_SLASH | CARET_SLASH => (10, 1),
        _ => return None,
    };
    Some(op)
}

fn binary(p: &mut Parser, min_prec: u8) {
    let cp = p.checkpoint();
    unary(p);
    while let Some((prec, len)) = binary_op(p) {
        if prec < min_prec {
            break;
        }
        p.start_node_at(cp, BIN_EXPR);
        for _ in 0..len {
            p.bump();
        }
        binary(p, prec + 1);
        p.finish_node();
    }
}

fn unary(p: &mut Parser) {
    if p.at_any(&[BANG, MINUS, PLUS, TILDE]) {
        p.start_node(PREFIX_EXPR);
        p.bump();
        unary(p);
        p.finish_node();
    } else {
        postfix(p);
    }
}

fn postfix(p: &mut Parser) {
    let cp = p.checkpoint();
    primary(p);
    loop {
        match p.current_kind() {
            DOT => {
                p.start_node_at(cp, DOT_EXPR);
                p.bump();
                match p.current_kind() {
                    IDENT => {
                        name_ref(p);
                        if p.at(LT) && at_generic_args(p, 0) {
                            type_arg_list(p);
                        }
                    }
                    INT_NUMBER => p.bump(),
                    _ => p.error("expected a member name"),
                }
                p.finish_node();
            }
            L_PAREN => {
                p.start_node_at(cp, CALL_EXPR);
                arg_list(p);
                p.finish_node();
            }
            BANG if p.nth(1) == IS_KW => {
                p.start_node_at(cp, IS_EXPR);
                p.bump();
                p.bump();
                type_(p);
                p.finish_node();
            }
            BANG => {
                p.start_node_at(cp, NOT_NULL_EXPR);
                p.bump();
                p.finish_node();
            }
            AS_KW | IS_KW => {
                let kind = if p.at(AS_KW) { AS_EXPR } else { IS_EXPR };
                p.start_node_at(cp, kind);
                p.bump();
                nullable_type(p);
                p.finish_node();
            }
            _ => break,
        }
    }
}

fn primary(p: &mut Parser) {
    match p.current_kind() {
        INT_NUMBER | STRING | TRUE_KW | FALSE_KW | NULL_KW => {
            p.start_node(LITERAL);
            p.bump();
            p.finish_node();
        }
        IDENT => {
            if p.nth(1) == LT && at_generic_args(p, 1) {
                let is_object = skip_angle_args(p, 1).is_some_and(|next| p.nth(next) == L_BRACE);
                if is_object {
                    p.start_node(OBJECT_LITERAL);
                    p.start_node(TYPE_NAME);
                    name_ref(p);
                    type_arg_list(p);
                    p.finish_node();
                    object_body(p);
                } else {
                    p.start_node(GENERIC_EXPR);
                    name_ref(p);
                    type_arg_list(p);
                }
                p.finish_node();
            } else if p.nth(1) == L_BRACE {
                p.start_node(OBJECT_LITERAL);
                p.start_node(TYPE_NAME);
                name_ref(p);
                p.finish_node();
                object_body(p);
                p.finish_node();
            } else {
                name_ref(p);
            }
        }
        L_PAREN => {
            let cp = p.checkpoint();
            p.bump();
            let mut kind = TENSOR_EXPR;
            if !p.at(R_PAREN) {
                expr(p);
                if p.at(COMMA) {
                    while p.eat(COMMA) {
                        if p.at(R_PAREN) {
                            break;
                        }
                        expr(p);
                    }
                } else {
                    kind = PAREN_EXPR;
                }
            }
            p.expect(R_PAREN);
            p.start_node_at(cp, kind);
            p.finish_node();
        }
        L_BRACKET => {
            p.start_node(TUPLE_EXPR);
            p.bump();
            while !p.at(R_BRACKET) && !p.at_eof() {
                let before = p.position();
                expr(p);
                if !p.eat(COMMA) || p.position() == before {
                    break;
                }
            }
            p.expect(R_BRACKET);
            p.finish_node();
        }
        L_BRACE => {
            p.start_node(OBJECT_LITERAL);
            object_body(p);
            p.finish_node();
        }
        MATCH_KW => match_expr(p),
        _ => p.error_recover("expected an expression", STMT_RECOVERY),
    }
}

fn object_body(p: &mut Parser) {
    p.start_node(OBJECT_BODY);
    p.bump();
    while !p.at(R_BRACE) && !p.at_eof() {
        if p.at(IDENT) {
            p.start_node(OBJECT_FIELD);
            name_ref(p);
            if p.eat(COLON) {
                expr(p);
            }
            p.finish_node();
        } else {
            p.error_recover("expected a field initializer", &[COMMA, R_BRACE]);
        }
        if !p.eat(COMMA) && !p.at(R_BRACE) {
            p.error("expected ','");
            break;
        }
    }
    p.expect(R_BRACE);
    p.finish_node();
}

fn arg_list(p: &mut Parser) {
    p.start_node(ARG_LIST);
    p.bump();
    while !p.at(R_PAREN) && !p.at_eof() {
        let before = p.position();
        p.start_node(ARG);
        p.eat(MUTATE_KW);
        expr(p);
        p.finish_node();
        if !p.eat(COMMA) || p.position() == before {
            break;
        }
    }
    p.expect(R_PAREN);
    p.finish_node();
}

fn match_expr(p: &mut Parser) {
    p.start_node(MATCH_EXPR);
    p.bump();
    if p.expect(L_PAREN) {
        if p.at_any(&[VAL_KW, VAR_KW]) {
            p.bump();
            var_pattern(p);
            p.expect(EQ);
        }
        expr(p);
        p.expect(R_PAREN);
    }
    if p.at(L_BRACE) {
        p.start_node(MATCH_BODY);
        p.bump();
        while !p.at(R_BRACE) && !p.at_eof() {
            let before = p.position();
            match_arm(p);
            p.eat(COMMA);
            if p.position() == before {
                p.error_recover("expected a match arm", &[R_BRACE, COMMA]);
            }
        }
        p.expect(R_BRACE);
        p.finish_node();
    }
    p.finish_node();
}

fn match_arm(p: &mut Parser) {
    p.start_node(MATCH_ARM);
    p.start_node(MATCH_PATTERN);
    if p.at(ELSE_KW) {
        p.bump();
    } else if p.at(IDENT) && matches!(p.nth(1), FAT_ARROW | PIPE | LT | QUESTION) {
        type_(p);
    } else {
        expr(p);
    }
    p.finish_node();
    p.expect(FAT_ARROW);
    match p.current_kind() {
        L_BRACE => block(p),
        RETURN_KW | THROW_KW => statement(p),
        _ => expr(p),
    }
    p.finish_node();
}
