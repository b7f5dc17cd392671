//! Fift assembler grammar
//!
//! Only the structure produced by the Tolk/FunC compilers is modelled:
//!
//! ```text
//! SourceFile  = Include* Program?
//! Include     = String 'include'
//! Program     = 'PROGRAM{' (Declaration | Proc | Method)* '}END>c'
//! Declaration = 'DECLPROC' NameRef | Int 'DECLMETHOD' NameRef | 'DECLGLOBVAR' NameRef
//! Proc        = Name ('PROC:<{' | 'PROCINLINE:<{' | 'PROCREF:<{') Word* '}>'
//! Method      = Name 'METHOD:<{' Word* '}>'
//! ```
//!
//! Inside bodies only procedure calls (`foo CALLDICT`) get their own node;
//! every other word stays a plain token.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind::{self, *};

const PROC_OPENERS: &[&str] = &["PROC:<{", "PROCINLINE:<{", "PROCREF:<{"];
const METHOD_OPENER: &str = "METHOD:<{";
const CALL_WORDS: &[&str] = &["CALLDICT", "INLINECALLDICT", "JMPDICT", "PREPAREDICT", "CALL"];
const DECL_WORDS: &[&str] = &["DECLPROC", "DECLMETHOD", "DECLGLOBVAR"];

/// Parse a whole Fift file.
pub(crate) fn source_file(p: &mut Parser) {
    p.start_root();
    while !p.at_eof() {
        if p.at(STRING) && p.nth_text(1) == "include" {
            p.start_node(FIFT_INCLUDE);
            p.bump();
            p.bump();
            p.finish_node();
        } else if p.current_text().ends_with("PROGRAM{") {
            program(p);
        } else {
            p.bump();
        }
    }
    p.bump_remaining();
    p.finish_node();
}

fn program(p: &mut Parser) {
    p.start_node(FIFT_PROGRAM);
    p.bump();
    while !p.at_eof() {
        let text = p.current_text();
        if text.starts_with("}END>") {
            p.bump();
            break;
        }
        if DECL_WORDS.contains(&text) {
            declaration(p);
        } else if DECL_WORDS.contains(&p.nth_text(1)) {
            // `42 DECLMETHOD foo`
            p.start_node(FIFT_DECLARATION);
            p.bump();
            declaration_tail(p);
            p.finish_node();
        } else if PROC_OPENERS.contains(&p.nth_text(1)) {
            definition(p, FIFT_PROC);
        } else if p.nth_text(1) == METHOD_OPENER {
            definition(p, FIFT_METHOD);
        } else {
            p.bump();
        }
    }
    p.finish_node();
}

fn declaration(p: &mut Parser) {
    p.start_node(FIFT_DECLARATION);
    declaration_tail(p);
    p.finish_node();
}

fn declaration_tail(p: &mut Parser) {
    p.bump();
    if p.at(FIFT_WORD) {
        p.wrap_token(NAME_REF);
    } else {
        p.error("expected a procedure name");
    }
}

/// `name PROC:<{ ... }>`; nested `<{ ... }>` blocks are tracked by depth.
fn definition(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.wrap_token(NAME);
    p.bump();
    let mut depth = 1usize;
    while !p.at_eof() {
        let text = p.current_text();
        if CALL_WORDS.contains(&p.nth_text(1)) && p.at(FIFT_WORD) && !is_block_word(text) {
            p.start_node(FIFT_PROC_CALL);
            p.wrap_token(NAME_REF);
            p.bump();
            p.finish_node();
            continue;
        }
        if text.starts_with("}>") {
            depth -= 1;
        }
        if text.ends_with("<{") {
            depth += 1;
        }
        p.bump();
        if depth == 0 {
            break;
        }
    }
    if depth != 0 {
        p.error("unterminated procedure body");
    }
    p.finish_node();
}

fn is_block_word(text: &str) -> bool {
    text.starts_with("}>") || text.ends_with("<{")
}
