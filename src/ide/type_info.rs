//! Type of the expression under the cursor.

use smol_str::SmolStr;

use super::offset_at;
use crate::base::{FileId, Span};
use crate::hir::{Ty, TypeInferer, Workspace};

/// Inferred type of the innermost expression or declaration at a position.
#[derive(Clone, Debug)]
pub struct TypeInfo {
    pub ty: Ty,
    /// Display form of `ty`.
    pub name: SmolStr,
    /// Range of the node the type belongs to.
    pub span: Span,
}

pub fn type_at(ws: &Workspace, file: FileId, line: u32, col: u32) -> Option<TypeInfo> {
    let parsed = ws.file(file)?;
    let offset = offset_at(&parsed, line, col)?;
    let (ty, range) = TypeInferer::type_at(ws, &parsed, offset)?;
    Some(TypeInfo {
        name: SmolStr::new(ty.name()),
        span: parsed.span(range),
        ty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ide::fixture::{cursor, host};

    #[test]
    fn test_type_of_call_result() {
        let text = "fun two(): int { return 2; }\nfun main() { val s = two() == 2; }";
        let host = host(&[("/ws/main.tolk", text)]);
        let (file, line, col) = cursor(&host, "/ws/main.tolk", "s =");

        let info = type_at(host.workspace(), file, line, col).unwrap();
        assert_eq!(info.ty, Ty::Bool);
        assert_eq!(info.name, "bool");
    }

    #[test]
    fn test_no_type_outside_code() {
        let host = host(&[("/ws/main.tolk", "\n\nfun main() {}")]);
        let file = host.file_id("/ws/main.tolk").unwrap();
        assert!(type_at(host.workspace(), file, 0, 0).is_none());
        assert!(type_at(host.workspace(), file, 99, 0).is_none());
    }
}
