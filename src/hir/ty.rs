//! Type algebra for Tolk.
//!
//! [`Ty`] is a closed set of variants with structural equality: named types
//! compare by name (anchors are ignored), unions compare as sets, and
//! composite types compare element-wise. Two independently built types of
//! the same shape are always equal.

use std::fmt;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::psi::NamedNode;

/// Builtin opaque types that have no declaration of their own.
pub const BUILTIN_TYPES: &[&str] = &[
    "cell",
    "slice",
    "builder",
    "continuation",
    "tuple",
    "address",
    "string",
];

/// Substitution of type parameters by name.
pub type TyMapping = FxHashMap<SmolStr, Ty>;

#[derive(Clone)]
pub enum Ty {
    Int,
    IntN { bits: u32, unsigned: bool },
    VarIntN { bits: u32, unsigned: bool },
    Coins,
    Bool,
    BitsN(u32),
    BytesN(u32),
    Builtin(SmolStr),
    Null,
    Void,
    Never,
    Unknown,
    Struct {
        name: SmolStr,
        anchor: Option<NamedNode>,
        fields: Vec<Ty>,
    },
    Enum {
        name: SmolStr,
        anchor: Option<NamedNode>,
    },
    TypeAlias {
        name: SmolStr,
        anchor: Option<NamedNode>,
        inner: Box<Ty>,
    },
    TypeParameter {
        name: SmolStr,
        anchor: Option<NamedNode>,
        default: Option<Box<Ty>>,
    },
    Tensor(Vec<Ty>),
    Tuple(Vec<Ty>),
    Union(Vec<Ty>),
    Func {
        params: Vec<Ty>,
        ret: Box<Ty>,
    },
    Instantiation {
        inner: Box<Ty>,
        args: Vec<Ty>,
    },
}

/// Parse a primitive or builtin type name: `int`, `uint8`, `bits256`, `cell`...
pub fn name_to_type(name: &str) -> Option<Ty> {
    if let Some((prefix, bits)) = split_sized(name) {
        return match prefix {
            "int" => Some(Ty::IntN { bits, unsigned: false }),
            "uint" => Some(Ty::IntN { bits, unsigned: true }),
            "varint" => Some(Ty::VarIntN { bits, unsigned: false }),
            "varuint" => Some(Ty::VarIntN { bits, unsigned: true }),
            "bits" => Some(Ty::BitsN(bits)),
            "bytes" => Some(Ty::BytesN(bits)),
            _ => None,
        };
    }
    let ty = match name {
        "int" => Ty::Int,
        "bool" => Ty::Bool,
        "coins" => Ty::Coins,
        "void" => Ty::Void,
        "null" => Ty::Null,
        "never" => Ty::Never,
        _ if BUILTIN_TYPES.contains(&name) => Ty::Builtin(SmolStr::new(name)),
        _ => return None,
    };
    Some(ty)
}

/// `int32` → (`int`, 32)
fn split_sized(name: &str) -> Option<(&str, u32)> {
    let digits_at = name.find(|c: char| c.is_ascii_digit())?;
    let (prefix, digits) = name.split_at(digits_at);
    if !matches!(prefix, "int" | "uint" | "varint" | "varuint" | "bits" | "bytes") {
        return None;
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|bits| (prefix, bits))
}

/// Whether `name` denotes a type without a declaration.
pub fn is_builtin_type_name(name: &str) -> bool {
    name_to_type(name).is_some()
}

/// The family name sized types are declared under: `int32` → `intN`.
pub fn sized_family_name(name: &str) -> Option<&'static str> {
    let (prefix, _) = split_sized(name)?;
    Some(match prefix {
        "int" => "intN",
        "uint" => "uintN",
        "varint" => "varintN",
        "varuint" => "varuintN",
        "bits" => "bitsN",
        _ => "bytesN",
    })
}

impl Ty {
    /// Canonical display form.
    pub fn name(&self) -> String {
        match self {
            Ty::Int => "int".to_string(),
            Ty::IntN { bits, unsigned } => {
                format!("{}int{bits}", if *unsigned { "u" } else { "" })
            }
            Ty::VarIntN { bits, unsigned } => {
                format!("var{}int{bits}", if *unsigned { "u" } else { "" })
            }
            Ty::Coins => "coins".to_string(),
            Ty::Bool => "bool".to_string(),
            Ty::BitsN(n) => format!("bits{n}"),
            Ty::BytesN(n) => format!("bytes{n}"),
            Ty::Builtin(name) => name.to_string(),
            Ty::Null => "null".to_string(),
            Ty::Void => "void".to_string(),
            Ty::Never => "never".to_string(),
            Ty::Unknown => "unknown".to_string(),
            Ty::Struct { name, .. }
            | Ty::Enum { name, .. }
            | Ty::TypeAlias { name, .. }
            | Ty::TypeParameter { name, .. } => name.to_string(),
            Ty::Tensor(elements) => format!("({})", join_names(elements)),
            Ty::Tuple(elements) => format!("[{}]", join_names(elements)),
            Ty::Union(elements) => match self.as_nullable() {
                Some(inner) => format!("{}?", inner.name()),
                None => elements
                    .iter()
                    .map(Ty::name)
                    .collect::<Vec<_>>()
                    .join(" | "),
            },
            Ty::Func { params, ret } => format!("({}) -> {}", join_names(params), ret.name()),
            Ty::Instantiation { inner, args } => format!("{}<{}>", inner.name(), join_names(args)),
        }
    }

    /// Build a union: nested unions are flattened, duplicates dropped, and a
    /// single remaining alternative is returned as is.
    pub fn union(types: impl IntoIterator<Item = Ty>) -> Ty {
        let mut variants: Vec<Ty> = Vec::new();
        for ty in types {
            match ty.base_type() {
                Ty::Union(elements) => {
                    for element in elements {
                        add_unique(&mut variants, element);
                    }
                }
                _ => add_unique(&mut variants, ty),
            }
        }
        match variants.len() {
            0 => Ty::Never,
            1 => variants.pop().unwrap_or(Ty::Never),
            _ => Ty::Union(variants),
        }
    }

    pub fn nullable(inner: Ty) -> Ty {
        Ty::union([inner, Ty::Null])
    }

    /// `T` for a `T | null` union.
    pub fn as_nullable(&self) -> Option<&Ty> {
        match self {
            Ty::Union(elements) if elements.len() == 2 => match (&elements[0], &elements[1]) {
                (Ty::Null, other) | (other, Ty::Null) => Some(other),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Ty::Null => true,
            Ty::Union(elements) => elements.iter().any(|e| matches!(e, Ty::Null)),
            _ => false,
        }
    }

    /// Strip type aliases.
    pub fn unwrap_alias(&self) -> Ty {
        match self {
            Ty::TypeAlias { inner, .. } => inner.unwrap_alias(),
            Ty::Instantiation { inner, args } => match inner.as_ref() {
                Ty::TypeAlias { inner: aliased, .. } => match aliased.as_ref() {
                    Ty::Union(_) => aliased.as_ref().clone(),
                    other => Ty::Instantiation {
                        inner: Box::new(other.unwrap_alias()),
                        args: args.clone(),
                    },
                },
                _ => self.clone(),
            },
            _ => self.clone(),
        }
    }

    /// `T` for `T?`; other types unchanged.
    pub fn unwrap_option(&self) -> Ty {
        match self.as_nullable() {
            Some(inner) => inner.clone(),
            None => self.clone(),
        }
    }

    /// Strip generic instantiations.
    pub fn unwrap_instantiation(&self) -> Ty {
        match self {
            Ty::Instantiation { inner, .. } => inner.unwrap_instantiation(),
            _ => self.clone(),
        }
    }

    /// Strip aliases and instantiations.
    pub fn base_type(&self) -> Ty {
        match self {
            Ty::TypeAlias { inner, .. } | Ty::Instantiation { inner, .. } => inner.base_type(),
            _ => self.clone(),
        }
    }

    pub fn anchor(&self) -> Option<&NamedNode> {
        match self {
            Ty::Struct { anchor, .. }
            | Ty::Enum { anchor, .. }
            | Ty::TypeAlias { anchor, .. }
            | Ty::TypeParameter { anchor, .. } => anchor.as_ref(),
            _ => None,
        }
    }

    pub fn has_generics(&self) -> bool {
        match self {
            Ty::TypeParameter { .. } => true,
            Ty::TypeAlias { inner, .. } => inner.has_generics(),
            Ty::Tensor(elements) | Ty::Tuple(elements) | Ty::Union(elements) => {
                elements.iter().any(Ty::has_generics)
            }
            Ty::Func { params, ret } => params.iter().any(Ty::has_generics) || ret.has_generics(),
            Ty::Instantiation { args, .. } => args.iter().any(Ty::has_generics),
            _ => false,
        }
    }

    /// Replace type parameters by the mapped types.
    pub fn substitute(&self, mapping: &TyMapping) -> Ty {
        if mapping.is_empty() {
            return self.clone();
        }
        let all = |elements: &[Ty]| elements.iter().map(|e| e.substitute(mapping)).collect();
        match self {
            Ty::TypeParameter { name, .. } => {
                mapping.get(name).cloned().unwrap_or_else(|| self.clone())
            }
            Ty::Struct { name, anchor, fields } => Ty::Struct {
                name: name.clone(),
                anchor: anchor.clone(),
                fields: all(fields),
            },
            Ty::TypeAlias { name, anchor, inner } => Ty::TypeAlias {
                name: name.clone(),
                anchor: anchor.clone(),
                inner: Box::new(inner.substitute(mapping)),
            },
            Ty::Tensor(elements) => Ty::Tensor(all(elements)),
            Ty::Tuple(elements) => Ty::Tuple(all(elements)),
            Ty::Union(elements) => Ty::union(elements.iter().map(|e| e.substitute(mapping))),
            Ty::Func { params, ret } => Ty::Func {
                params: all(params),
                ret: Box::new(ret.substitute(mapping)),
            },
            Ty::Instantiation { inner, args } => Ty::Instantiation {
                inner: Box::new(inner.substitute(mapping)),
                args: all(args),
            },
            _ => self.clone(),
        }
    }

    /// Least type covering both `left` and `right`.
    pub fn join(left: &Ty, right: &Ty) -> Ty {
        if left == right {
            return left.clone();
        }
        match (left, right) {
            (Ty::Unknown, _) | (_, Ty::Unknown) => Ty::Unknown,
            (_, Ty::Never) => left.clone(),
            (Ty::Never, _) => right.clone(),
            (_, Ty::Null) => Ty::union([left.clone(), Ty::Null]),
            (Ty::Tensor(l), Ty::Tensor(r)) if l.len() == r.len() => {
                Ty::Tensor(l.iter().zip(r).map(|(a, b)| Ty::join(a, b)).collect())
            }
            (Ty::Tuple(l), Ty::Tuple(r)) if l.len() == r.len() => {
                Ty::Tuple(l.iter().zip(r).map(|(a, b)| Ty::join(a, b)).collect())
            }
            (Ty::TypeAlias { inner, .. }, _) => Ty::join(inner, right),
            (_, Ty::TypeAlias { inner, .. }) => Ty::join(left, inner),
            _ => Ty::union([left.clone(), right.clone()]),
        }
    }

    /// `T` such that `T | right` covers `left`: `int?` - `null` = `int`.
    pub fn subtract(left: &Ty, right: &Ty) -> Ty {
        let Ty::Union(variants) = left else {
            return left.clone();
        };
        let contains = |ty: &Ty| variants.iter().any(|v| v == ty);
        let rest: Vec<Ty> = match right {
            Ty::Union(removed) if removed.iter().all(|r| contains(r)) => variants
                .iter()
                .filter(|v| !removed.contains(v))
                .cloned()
                .collect(),
            Ty::Union(_) => Vec::new(),
            _ if contains(right) => variants.iter().filter(|v| *v != right).cloned().collect(),
            _ => Vec::new(),
        };
        Ty::union(rest)
    }

    /// Source text of a default value of this type, used by hover.
    pub fn default_value(&self) -> String {
        match self {
            ty if ty.is_nullable() => "null".to_string(),
            Ty::Bool => "false".to_string(),
            Ty::Coins => "ton(\"0.1\")".to_string(),
            Ty::Int | Ty::IntN { .. } | Ty::VarIntN { .. } => "0".to_string(),
            Ty::BitsN(_) | Ty::BytesN(_) => "createEmptySlice()".to_string(),
            Ty::Builtin(name) => match name.as_str() {
                "address" => "address(\"\")".to_string(),
                "cell" => "createEmptyCell()".to_string(),
                "builder" => "beginCell()".to_string(),
                "slice" => "createEmptySlice()".to_string(),
                _ => "null".to_string(),
            },
            Ty::Struct { name, .. } => format!("{name} {{}}"),
            Ty::Enum { name, anchor } => anchor
                .as_ref()
                .and_then(|a| {
                    a.node()
                        .descendants()
                        .find(|n| n.kind() == crate::parser::SyntaxKind::ENUM_MEMBER)
                        .map(|m| format!("{name}.{}", a.with_node(m).name()))
                })
                .unwrap_or_else(|| name.to_string()),
            Ty::Tuple(elements) => format!(
                "[{}]",
                elements
                    .iter()
                    .map(Ty::default_value)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Ty::Tensor(elements) => format!(
                "({})",
                elements
                    .iter()
                    .map(Ty::default_value)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Ty::Union(elements) => elements
                .first()
                .map(Ty::default_value)
                .unwrap_or_else(|| "null".to_string()),
            Ty::TypeAlias { inner, .. } => inner.default_value(),
            Ty::Instantiation { inner, .. } => inner.default_value(),
            _ => "null".to_string(),
        }
    }
}

fn join_names(elements: &[Ty]) -> String {
    elements
        .iter()
        .map(Ty::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn add_unique(to: &mut Vec<Ty>, ty: Ty) {
    let unwrapped = ty.unwrap_alias();
    if to.iter().any(|existing| existing.unwrap_alias() == unwrapped) {
        return;
    }
    to.push(ty);
}

impl PartialEq for Ty {
    fn eq(&self, other: &Self) -> bool {
        use Ty::*;
        match (self, other) {
            (Int, Int)
            | (Coins, Coins)
            | (Bool, Bool)
            | (Null, Null)
            | (Void, Void)
            | (Never, Never)
            | (Unknown, Unknown) => true,
            (IntN { bits: a, unsigned: ua }, IntN { bits: b, unsigned: ub })
            | (VarIntN { bits: a, unsigned: ua }, VarIntN { bits: b, unsigned: ub }) => {
                a == b && ua == ub
            }
            (BitsN(a), BitsN(b)) | (BytesN(a), BytesN(b)) => a == b,
            (Builtin(a), Builtin(b)) => a == b,
            (TypeAlias { name: a, inner: ia, .. }, TypeAlias { name: b, inner: ib, .. }) => {
                a == b && ia == ib
            }
            (Struct { name: a, .. }, Struct { name: b, .. })
            | (Enum { name: a, .. }, Enum { name: b, .. })
            | (TypeParameter { name: a, .. }, TypeParameter { name: b, .. }) => a == b,
            (Tensor(a), Tensor(b)) | (Tuple(a), Tuple(b)) => a == b,
            (Union(a), Union(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.contains(x)) && b.iter().all(|x| a.contains(x))
            }
            (Func { params: pa, ret: ra }, Func { params: pb, ret: rb }) => pa == pb && ra == rb,
            (Instantiation { inner: ia, args: aa }, Instantiation { inner: ib, args: ab }) => {
                ia == ib && aa == ab
            }
            _ => false,
        }
    }
}

impl Eq for Ty {}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty({})", self.name())
    }
}
