//! Get-method ids.
//!
//! A `get fun name()` is called by id, not by name. The id is derived from
//! the CRC-16/XMODEM of the name unless `@method_id(N)` sets it explicitly.

use crate::parser::ast::FnDecl;
use crate::parser::{SyntaxKind, SyntaxNode};

/// CRC-16/XMODEM: polynomial 0x1021, initial value 0, no reflection.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Id derived from a get-method name.
pub fn method_id(name: &str) -> u32 {
    (u32::from(crc16(name.as_bytes())) & 0xffff) | 0x10000
}

/// Parse a decimal or `0x` hex literal.
fn parse_int(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Id of a get method: the `@method_id` argument when present, otherwise
/// derived from the name. `None` for other declarations.
pub fn get_method_id(func: &FnDecl) -> Option<u32> {
    if !func.is_get_method() {
        return None;
    }
    let explicit = func
        .annotation("method_id")
        .and_then(|a| a.args().into_iter().next())
        .and_then(|arg| int_literal(&arg));
    if explicit.is_some() {
        return explicit;
    }
    let name = func.name()?.text();
    Some(method_id(&name))
}

fn int_literal(node: &SyntaxNode) -> Option<u32> {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::INT_NUMBER)
        .and_then(|t| parse_int(t.text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Language;
    use crate::parser::{AstNode, parse};

    fn first_fn(text: &str) -> FnDecl {
        parse(Language::Tolk, text)
            .syntax()
            .descendants()
            .find_map(FnDecl::cast)
            .unwrap()
    }

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16(b"123456789"), 0x31c3);
    }

    #[test]
    fn test_known_method_ids() {
        assert_eq!(method_id("seqno"), 85143);
        assert_eq!(method_id("get_public_key"), 78748);
    }

    #[test]
    fn test_get_method_id_from_name() {
        let func = first_fn("get fun seqno(): int { return 0; }");
        assert_eq!(get_method_id(&func), Some(85143));
    }

    #[test]
    fn test_explicit_method_id_wins() {
        let func = first_fn("@method_id(7)\nget fun seqno(): int { return 0; }");
        assert_eq!(get_method_id(&func), Some(7));
        let func = first_fn("@method_id(0x10)\nget fun seqno(): int { return 0; }");
        assert_eq!(get_method_id(&func), Some(16));
    }

    #[test]
    fn test_plain_function_has_no_id() {
        let func = first_fn("fun seqno(): int { return 0; }");
        assert_eq!(get_method_id(&func), None);
    }
}
