//! Hover tests for the IDE layer.

use crate::helpers::cursor::position;
use crate::helpers::hir_helpers::*;
use ton_analyzer::hir::method_id::{crc16, method_id};

fn hover_text(sources: &[(&str, &str)], uri: &str, marker: &str) -> Option<String> {
    let host = analysis_from_sources(sources);
    let (file, line, col) = position(&host, uri, marker);
    host.analysis().hover(file, line, col).map(|h| h.contents)
}

#[test]
fn test_get_method_id_from_name() {
    let expected = (u32::from(crc16(b"seqno")) & 0xffff) | 0x10000;
    assert_eq!(method_id("seqno"), expected);

    let contents = hover_text(
        &[("/ws/main.tolk", "get fun seqno(): int { return 0; }")],
        "/ws/main.tolk",
        "seqno",
    )
    .unwrap();
    assert!(contents.contains(&format!("Method ID: `0x{expected:x}`")));
}

#[test]
fn test_get_method_id_override() {
    let contents = hover_text(
        &[("/ws/main.tolk", "@method_id(7)\nget fun custom(): int { return 0; }")],
        "/ws/main.tolk",
        "custom",
    )
    .unwrap();
    assert!(contents.ends_with("Method ID: `0x7`"));
}

#[test]
fn test_plain_function_has_no_method_id() {
    let contents = hover_text(&[("/ws/main.tolk", "fun f() {}")], "/ws/main.tolk", "f()").unwrap();
    assert!(!contents.contains("Method ID"));
}

#[test]
fn test_hover_inferred_return_type() {
    let source = "fun pair() { return (1, true); }\nfun main() { pair(); }";
    let contents = hover_text(&[("/ws/main.tolk", source)], "/ws/main.tolk", "pair();").unwrap();
    assert_eq!(contents, "```tolk\nfun pair(): (int, bool)\n```");
}

#[test]
fn test_hover_tlb_declaration() {
    let schema = "// A flag.\nflag_set$1 = Flag;\nwrap$_ f:Flag = Wrap;";
    let contents = hover_text(&[("/ws/block.tlb", schema)], "/ws/block.tlb", "Flag = Wrap").unwrap();
    assert_eq!(contents, "```tlb\nflag_set$1 = Flag;\n```\n\nA flag.");
}
