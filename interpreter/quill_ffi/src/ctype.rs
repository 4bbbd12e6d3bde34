//! The closed C type table and composite layouts.

use std::fmt;
use std::mem;
use std::os::raw::{c_char, c_long};

use libffi::middle::Type;

use crate::FfiError;

/// Foreign type vocabulary exposed to scripts.
///
/// This is a closed table: every variant must be handled in sizing,
/// descriptor construction, marshaling, and unmarshaling. `Int` and
/// `Long` are both the machine `long`; they exist as distinct script
/// constants but share a representation.
#[derive(Clone, Debug, PartialEq)]
pub enum CType {
    Void,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    Struct(StructLayout),
}

impl CType {
    /// Native size in bytes. `Void` has no size.
    pub fn size(&self) -> usize {
        match self {
            CType::Void => 0,
            CType::Char => mem::size_of::<c_char>(),
            CType::Int | CType::Long => mem::size_of::<c_long>(),
            CType::Float => mem::size_of::<f32>(),
            CType::Double => mem::size_of::<f64>(),
            CType::String => mem::size_of::<*const c_char>(),
            CType::Struct(layout) => layout.size(),
        }
    }

    /// The libffi descriptor for this type.
    pub(crate) fn ffi_type(&self) -> Type {
        match self {
            CType::Void => Type::void(),
            CType::Char => Type::i8(),
            CType::Int | CType::Long => Type::i64(),
            CType::Float => Type::f32(),
            CType::Double => Type::f64(),
            CType::String => Type::pointer(),
            CType::Struct(layout) => {
                Type::structure(layout.members().iter().map(CType::ffi_type))
            }
        }
    }

    /// Whether this type can be a composite member.
    ///
    /// Strings are excluded: a pointer member has no owner once packed
    /// into a byte buffer, so the layer refuses to model it.
    pub fn is_struct_member(&self) -> bool {
        matches!(
            self,
            CType::Char | CType::Int | CType::Long | CType::Float | CType::Double
        )
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Void => write!(f, "Void"),
            CType::Char => write!(f, "Char"),
            CType::Int => write!(f, "Int"),
            CType::Long => write!(f, "Long"),
            CType::Float => write!(f, "Float"),
            CType::Double => write!(f, "Double"),
            CType::String => write!(f, "String"),
            CType::Struct(layout) => write!(f, "{}", layout.name()),
        }
    }
}

/// A user-declared composite type: named, ordered primitive members,
/// laid out contiguously in declaration order with no implicit padding.
#[derive(Clone, Debug, PartialEq)]
pub struct StructLayout {
    name: String,
    members: Vec<CType>,
    size: usize,
}

impl StructLayout {
    /// Build a layout from ordered members.
    ///
    /// Members must be sized primitives; `Void`, `String`, and nested
    /// structs are rejected.
    pub fn new(name: impl Into<String>, members: Vec<CType>) -> Result<Self, FfiError> {
        let name = name.into();
        if members.is_empty() {
            return Err(FfiError::EmptyLayout { name });
        }
        for member in &members {
            if !member.is_struct_member() {
                return Err(FfiError::InvalidMember {
                    name,
                    member: member.to_string(),
                });
            }
        }
        let size = members.iter().map(CType::size).sum();
        Ok(StructLayout {
            name,
            members,
            size,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[CType] {
        &self.members
    }

    /// Total packed byte size: the sum of the member sizes.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primitive_sizes() {
        assert_eq!(CType::Char.size(), 1);
        assert_eq!(CType::Int.size(), mem::size_of::<c_long>());
        assert_eq!(CType::Float.size(), 4);
        assert_eq!(CType::Double.size(), 8);
        assert_eq!(CType::Void.size(), 0);
    }

    #[test]
    fn color_layout_is_four_bytes() {
        let layout = StructLayout::new(
            "Color",
            vec![CType::Char, CType::Char, CType::Char, CType::Char],
        )
        .unwrap();
        assert_eq!(layout.size(), 4);
    }

    #[test]
    fn packed_layout_has_no_padding() {
        // Char followed by Double would be padded to 16 by the platform
        // ABI; the packed contract says 9.
        let layout = StructLayout::new("Pair", vec![CType::Char, CType::Double]).unwrap();
        assert_eq!(layout.size(), 9);
    }

    #[test]
    fn layout_rejects_void_members() {
        assert!(matches!(
            StructLayout::new("Bad", vec![CType::Void]),
            Err(FfiError::InvalidMember { .. })
        ));
    }

    #[test]
    fn layout_rejects_string_members() {
        assert!(matches!(
            StructLayout::new("Bad", vec![CType::Int, CType::String]),
            Err(FfiError::InvalidMember { .. })
        ));
    }

    #[test]
    fn layout_rejects_empty_member_list() {
        assert!(matches!(
            StructLayout::new("Empty", vec![]),
            Err(FfiError::EmptyLayout { .. })
        ));
    }
}
