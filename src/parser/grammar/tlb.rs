//! TL-B grammar
//!
//! ```text
//! SourceFile  = Declaration*
//! Declaration = Constructor Field* '=' Combinator ';'
//! Constructor = ('_' | Ident) Tag?
//! Field       = '{' Ident ':' ('#' | 'Type') '}'     -- implicit parameter
//!             | '{' Expr '}'                        -- constraint
//!             | Ident ':' TypeExpr                  -- named field
//!             | TypeExpr                            -- anonymous field
//! Combinator  = Name TypeExpr*
//! ```

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind::*;

/// Parse a whole TL-B schema.
pub(crate) fn source_file(p: &mut Parser) {
    p.start_root();
    while !p.at_eof() {
        let before = p.position();
        match p.current_kind() {
            IDENT => declaration(p),
            SEMICOLON => p.bump(),
            _ => {
                p.error_recover("expected a constructor", &[SEMICOLON]);
                p.eat(SEMICOLON);
            }
        }
        if p.position() == before {
            p.error_recover("unexpected token", &[]);
        }
    }
    p.bump_remaining();
    p.finish_node();
}

fn declaration(p: &mut Parser) {
    p.start_node(TLB_DECLARATION);

    p.start_node(TLB_CONSTRUCTOR);
    p.bump();
    p.eat(TLB_TAG);
    p.finish_node();

    while !p.at_eof() && !p.at_any(&[EQ, SEMICOLON]) {
        let before = p.position();
        field(p);
        if p.position() == before {
            p.error_recover("unexpected token in constructor", &[EQ, SEMICOLON]);
        }
    }

    if p.expect(EQ) {
        combinator(p);
    }
    p.expect(SEMICOLON);
    p.finish_node();
}

fn field(p: &mut Parser) {
    match p.current_kind() {
        L_BRACE if p.nth(1) == IDENT && p.nth(2) == COLON => implicit_param(p),
        L_BRACE => constraint(p),
        IDENT if p.nth(1) == COLON => {
            p.start_node(TLB_FIELD);
            p.wrap_token(NAME);
            p.bump();
            type_expr(p);
            p.finish_node();
        }
        _ => {
            p.start_node(TLB_ANON_FIELD);
            type_expr(p);
            p.finish_node();
        }
    }
}

/// `{n:#}` or `{X:Type}`
fn implicit_param(p: &mut Parser) {
    p.start_node(TLB_IMPLICIT_PARAM);
    p.bump();
    p.wrap_token(NAME);
    p.bump();
    if p.at(HASH) || p.at(IDENT) {
        p.bump();
    } else {
        p.error("expected '#' or 'Type'");
    }
    p.expect(R_BRACE);
    p.finish_node();
}

/// `{n <= 32}`, `{~m + 1 = n}`
fn constraint(p: &mut Parser) {
    p.start_node(TLB_CONSTRAINT);
    p.bump();
    while !p.at_eof() && !p.at_any(&[R_BRACE, SEMICOLON]) {
        type_expr(p);
        // comparison and arithmetic operators are kept as plain tokens
        if p.at_any(&[EQ, LT, GT, LT_EQ, PLUS, STAR, MINUS, DOT, QUESTION]) {
            p.bump();
        }
    }
    p.expect(R_BRACE);
    p.finish_node();
}

fn combinator(p: &mut Parser) {
    p.start_node(TLB_COMBINATOR);
    if p.at(IDENT) {
        p.wrap_token(NAME);
    } else {
        p.error("expected a combinator name");
    }
    while !p.at_eof() && !p.at(SEMICOLON) {
        let before = p.position();
        type_term(p);
        if p.position() == before {
            p.error_recover("unexpected token in combinator", &[SEMICOLON]);
        }
    }
    p.finish_node();
}

/// A type expression with optional binary operators: `n * Bit`, `flag?X`.
fn type_expr(p: &mut Parser) {
    type_term(p);
    while p.at_any(&[STAR, PLUS, QUESTION]) {
        p.bump();
        type_term(p);
    }
}

fn type_term(p: &mut Parser) {
    match p.current_kind() {
        CARET => {
            p.start_node(TLB_CELL_REF);
            p.bump();
            type_term(p);
            p.finish_node();
        }
        TILDE => {
            p.bump();
            type_term(p);
        }
        L_PAREN => {
            p.start_node(TLB_COMBINATOR_EXPR);
            p.bump();
            while !p.at_eof() && !p.at_any(&[R_PAREN, SEMICOLON, EQ]) {
                let before = p.position();
                type_expr(p);
                if p.position() == before {
                    p.error_recover("unexpected token in expression", &[R_PAREN, SEMICOLON]);
                }
            }
            p.expect(R_PAREN);
            p.finish_node();
        }
        L_BRACKET => {
            p.start_node(TLB_TYPE_EXPR);
            p.bump();
            while !p.at_eof() && !p.at_any(&[R_BRACKET, SEMICOLON, EQ]) {
                let before = p.position();
                field(p);
                if p.position() == before {
                    p.error_recover("unexpected token in cell", &[R_BRACKET, SEMICOLON]);
                }
            }
            p.expect(R_BRACKET);
            p.finish_node();
        }
        IDENT => p.wrap_token(NAME_REF),
        INT_NUMBER | HASH => p.bump(),
        HASH_HASH | HASH_LT | HASH_LT_EQ => {
            p.bump();
            if p.at_any(&[IDENT, INT_NUMBER, L_PAREN]) {
                type_term(p);
            }
        }
        _ => p.error("expected a type expression"),
    }
}

#[cfg(test)]
mod tests {
    use crate::base::Language;
    use crate::parser::{SyntaxKind, parse};

    fn count(source: &str, kind: SyntaxKind) -> usize {
        parse(Language::Tlb, source)
            .syntax()
            .descendants()
            .filter(|n| n.kind() == kind)
            .count()
    }

    #[test]
    fn test_parse_simple_declarations() {
        let source = "bool_false$0 = Bool;\nbool_true$1 = Bool;\n";
        let parse = parse(Language::Tlb, source);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert_eq!(parse.syntax().to_string(), source);
        assert_eq!(count(source, SyntaxKind::TLB_DECLARATION), 2);
        assert_eq!(count(source, SyntaxKind::TLB_COMBINATOR), 2);
    }

    #[test]
    fn test_parse_implicit_params_and_fields() {
        let source = "hm_edge#_ {n:#} {X:Type} {l:#} {m:#} label:(HmLabel ~l n)\n  {n = (~m) + l} node:(HashmapNode m X) = Hashmap n X;";
        let parse = parse(Language::Tlb, source);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert_eq!(count(source, SyntaxKind::TLB_IMPLICIT_PARAM), 4);
        assert_eq!(count(source, SyntaxKind::TLB_CONSTRAINT), 1);
        assert_eq!(count(source, SyntaxKind::TLB_FIELD), 2);
    }

    #[test]
    fn test_parse_cell_refs_and_anonymous_fields() {
        let source = "message$_ {X:Type} info:CommonMsgInfo init:(Maybe (Either StateInit ^StateInit)) body:(Either X ^X) = Message X;\n_ ^[ a:# b:(## 32) ] = Pair;";
        let parse = parse(Language::Tlb, source);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert_eq!(count(source, SyntaxKind::TLB_CELL_REF), 3);
        assert_eq!(count(source, SyntaxKind::TLB_ANON_FIELD), 1);
    }

    #[test]
    fn test_parse_recovers_from_garbage() {
        let source = "= = ;\nunit$_ = Unit;";
        let parse = parse(Language::Tlb, source);
        assert!(!parse.ok());
        assert_eq!(parse.syntax().to_string(), source);
        assert_eq!(count(source, SyntaxKind::TLB_DECLARATION), 1);
    }
}
