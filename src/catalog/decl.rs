//! Declaration specifiers (DECL column).
//!
//! A DECL tag is a base — MACRO, CONST, VAR — optionally joined to a
//! primitive type by the first underscore: `MACRO`, `MACRO_INT8`,
//! `CONST_CHAR_ARRAY`, `VAR_UINT32`. Tags are parsed once into a tagged
//! variant and validated against the closed enumerations below; emission
//! never re-inspects the tag text.

use std::fmt;

/// Primitive types usable in typed declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimType {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    IntPtr,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    UintPtr,
    Float,
    Double,
    CharArray,
}

impl PrimType {
    /// Parse the type suffix of a DECL tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BOOL" => Some(PrimType::Bool),
            "CHAR" => Some(PrimType::Char),
            "INT8" => Some(PrimType::Int8),
            "INT16" => Some(PrimType::Int16),
            "INT32" => Some(PrimType::Int32),
            "INT64" => Some(PrimType::Int64),
            "INTPTR" => Some(PrimType::IntPtr),
            "UINT8" => Some(PrimType::Uint8),
            "UINT16" => Some(PrimType::Uint16),
            "UINT32" => Some(PrimType::Uint32),
            "UINT64" => Some(PrimType::Uint64),
            "UINTPTR" => Some(PrimType::UintPtr),
            "FLOAT" => Some(PrimType::Float),
            "DOUBLE" => Some(PrimType::Double),
            "CHAR_ARRAY" => Some(PrimType::CharArray),
            _ => None,
        }
    }

    /// The tag spelling, for diagnostics.
    pub fn tag(self) -> &'static str {
        match self {
            PrimType::Bool => "BOOL",
            PrimType::Char => "CHAR",
            PrimType::Int8 => "INT8",
            PrimType::Int16 => "INT16",
            PrimType::Int32 => "INT32",
            PrimType::Int64 => "INT64",
            PrimType::IntPtr => "INTPTR",
            PrimType::Uint8 => "UINT8",
            PrimType::Uint16 => "UINT16",
            PrimType::Uint32 => "UINT32",
            PrimType::Uint64 => "UINT64",
            PrimType::UintPtr => "UINTPTR",
            PrimType::Float => "FLOAT",
            PrimType::Double => "DOUBLE",
            PrimType::CharArray => "CHAR_ARRAY",
        }
    }

    /// The underlying C type name.
    pub fn c_type(self) -> &'static str {
        match self {
            PrimType::Bool => "bool",
            PrimType::Char | PrimType::CharArray => "char",
            PrimType::Int8 => "int8_t",
            PrimType::Int16 => "int16_t",
            PrimType::Int32 => "int32_t",
            PrimType::Int64 => "int64_t",
            PrimType::IntPtr => "intptr_t",
            PrimType::Uint8 => "uint8_t",
            PrimType::Uint16 => "uint16_t",
            PrimType::Uint32 => "uint32_t",
            PrimType::Uint64 => "uint64_t",
            PrimType::UintPtr => "uintptr_t",
            PrimType::Float => "float",
            PrimType::Double => "double",
        }
    }

    /// C declarator for a variable of this type, e.g. `int8_t NAME` or
    /// `char NAME[]`.
    pub fn declarator(self, name: &str) -> String {
        match self {
            PrimType::CharArray => format!("char {}[]", name),
            _ => format!("{} {}", self.c_type(), name),
        }
    }
}

/// Declaration base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclBase {
    Macro,
    Const,
    Var,
}

impl DeclBase {
    /// The tag spelling, for diagnostics.
    pub fn tag(self) -> &'static str {
        match self {
            DeclBase::Macro => "MACRO",
            DeclBase::Const => "CONST",
            DeclBase::Var => "VAR",
        }
    }
}

/// Parsed DECL tag.
///
/// `parse` guarantees that CONST and VAR always carry a type; only MACRO
/// may appear bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclSpec {
    pub base: DeclBase,
    pub ty: Option<PrimType>,
}

impl DeclSpec {
    /// Parse a DECL tag, splitting base and type on the first underscore.
    pub fn parse(tag: &str) -> Option<Self> {
        let (base, ty) = match tag.split_once('_') {
            Some((base, suffix)) => (base, Some(suffix)),
            None => (tag, None),
        };
        match (base, ty) {
            ("MACRO", None) => Some(DeclSpec {
                base: DeclBase::Macro,
                ty: None,
            }),
            ("MACRO", Some(suffix)) => PrimType::from_tag(suffix).map(|ty| DeclSpec {
                base: DeclBase::Macro,
                ty: Some(ty),
            }),
            ("CONST", Some(suffix)) => PrimType::from_tag(suffix).map(|ty| DeclSpec {
                base: DeclBase::Const,
                ty: Some(ty),
            }),
            ("VAR", Some(suffix)) => PrimType::from_tag(suffix).map(|ty| DeclSpec {
                base: DeclBase::Var,
                ty: Some(ty),
            }),
            _ => None,
        }
    }

    /// Whether TESTING can reclassify this declaration into a mutable
    /// runtime variable. A bare macro has no declared type to carry the
    /// value at runtime; a VAR is already mutable.
    pub fn is_testable(&self) -> bool {
        match self.base {
            DeclBase::Const => true,
            DeclBase::Macro => self.ty.is_some(),
            DeclBase::Var => false,
        }
    }

    /// Final emitted kind, with or without the TESTING reclassification.
    pub fn emitted_kind(&self, transformed: bool) -> EmittedKind {
        match (self.base, self.ty) {
            (_, None) => EmittedKind::Macro,
            (DeclBase::Macro, Some(ty)) => {
                if transformed {
                    EmittedKind::Var(ty)
                } else {
                    EmittedKind::Macro
                }
            }
            (DeclBase::Const, Some(ty)) => {
                if transformed {
                    EmittedKind::Var(ty)
                } else {
                    EmittedKind::Const(ty)
                }
            }
            (DeclBase::Var, Some(ty)) => EmittedKind::Var(ty),
        }
    }
}

impl fmt::Display for DeclSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Some(ty) => write!(f, "{}_{}", self.base.tag(), ty.tag()),
            None => write!(f, "{}", self.base.tag()),
        }
    }
}

/// Declaration kind actually emitted for one option in one
/// characterization, after the TESTING reclassification has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmittedKind {
    /// `#define NAME VALUE`
    Macro,
    /// `extern const T NAME;` in the header, `const T NAME = VALUE;` in
    /// the source.
    Const(PrimType),
    /// As [`EmittedKind::Const`] without the qualifier.
    Var(PrimType),
}

impl EmittedKind {
    /// Human-readable label for reports.
    pub fn describe(self) -> String {
        match self {
            EmittedKind::Macro => "macro".to_string(),
            EmittedKind::Const(ty) => format!("const {} variable", ty.c_type()),
            EmittedKind::Var(ty) => format!("mutable {} variable", ty.c_type()),
        }
    }
}
