//! Prepared foreign calls and the marshaling representation.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use libffi::middle::{Cif, CodePtr};
use tracing::trace;

use crate::{CType, FfiError, StructLayout};

/// Marshaling-level value: what actually crosses the ABI boundary.
///
/// The evaluator converts script values into `CValue`s against the
/// declared parameter types, and converts the returned `CValue` back.
/// `Struct` carries the tightly-packed member bytes of a
/// [`StructLayout`].
#[derive(Clone, Debug, PartialEq)]
pub enum CValue {
    Void,
    Char(i8),
    Int(i64),
    Float(f32),
    Double(f64),
    Str(CString),
    Struct(Vec<u8>),
}

impl CValue {
    /// Build a string argument, surfacing interior NULs as errors.
    pub fn string(text: &str, symbol: &str, index: usize) -> Result<Self, FfiError> {
        CString::new(text)
            .map(CValue::Str)
            .map_err(|_| FfiError::InteriorNul {
                symbol: symbol.to_string(),
                index,
            })
    }

    /// Short kind name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CValue::Void => "Void",
            CValue::Char(_) => "Char",
            CValue::Int(_) => "Int",
            CValue::Float(_) => "Float",
            CValue::Double(_) => "Double",
            CValue::Str(_) => "String",
            CValue::Struct(_) => "Struct",
        }
    }

    fn matches(&self, param: &CType) -> bool {
        matches!(
            (self, param),
            (CValue::Char(_), CType::Char)
                | (CValue::Int(_), CType::Int | CType::Long)
                | (CValue::Float(_), CType::Float)
                | (CValue::Double(_), CType::Double)
                | (CValue::Str(_), CType::String)
                | (CValue::Struct(_), CType::Struct(_))
        )
    }
}

/// Serialize ordered members into a layout's packed byte buffer.
pub fn pack_members(layout: &StructLayout, members: &[CValue]) -> Result<Vec<u8>, FfiError> {
    if members.len() != layout.members().len() {
        return Err(FfiError::ArityMismatch {
            symbol: layout.name().to_string(),
            expected: layout.members().len(),
            given: members.len(),
        });
    }
    let mut bytes = Vec::with_capacity(layout.size());
    for (index, (member, declared)) in members.iter().zip(layout.members()).enumerate() {
        if !member.matches(declared) {
            return Err(FfiError::ArgumentMismatch {
                symbol: layout.name().to_string(),
                index,
                expected: declared.to_string(),
                given: member.kind().to_string(),
            });
        }
        match member {
            CValue::Char(v) => bytes.extend_from_slice(&v.to_ne_bytes()),
            CValue::Int(v) => bytes.extend_from_slice(&v.to_ne_bytes()),
            CValue::Float(v) => bytes.extend_from_slice(&v.to_ne_bytes()),
            CValue::Double(v) => bytes.extend_from_slice(&v.to_ne_bytes()),
            CValue::Void | CValue::Str(_) | CValue::Struct(_) => {
                unreachable!("layout construction rejects these members")
            }
        }
    }
    Ok(bytes)
}

/// Deserialize a packed byte buffer back into ordered members.
pub fn unpack_members(layout: &StructLayout, bytes: &[u8]) -> Result<Vec<CValue>, FfiError> {
    if bytes.len() < layout.size() {
        return Err(FfiError::StructSizeMismatch {
            symbol: layout.name().to_string(),
            index: 0,
            expected: layout.size(),
            given: bytes.len(),
        });
    }
    let mut members = Vec::with_capacity(layout.members().len());
    let mut offset = 0;
    for member in layout.members() {
        let size = member.size();
        let chunk = &bytes[offset..offset + size];
        members.push(match member {
            CType::Char => CValue::Char(chunk[0] as i8),
            CType::Int | CType::Long => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                CValue::Int(i64::from_ne_bytes(buf))
            }
            CType::Float => {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(chunk);
                CValue::Float(f32::from_ne_bytes(buf))
            }
            CType::Double => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                CValue::Double(f64::from_ne_bytes(buf))
            }
            CType::Void | CType::String | CType::Struct(_) => {
                unreachable!("layout construction rejects these members")
            }
        });
        offset += size;
    }
    Ok(members)
}

fn member_align(member: &CType) -> usize {
    match member {
        CType::Char => 1,
        CType::Float => 4,
        CType::Int | CType::Long | CType::Double => 8,
        CType::Void | CType::String | CType::Struct(_) => {
            unreachable!("layout construction rejects these members")
        }
    }
}

/// ABI member offsets and padded total size for a layout. libffi reads
/// and writes struct buffers at these offsets, not the packed ones.
fn abi_layout(layout: &StructLayout) -> (Vec<usize>, usize) {
    let mut offsets = Vec::with_capacity(layout.members().len());
    let mut cursor = 0usize;
    let mut align = 1usize;
    for member in layout.members() {
        let a = member_align(member);
        align = align.max(a);
        cursor = cursor.div_ceil(a) * a;
        offsets.push(cursor);
        cursor += member.size();
    }
    (offsets, cursor.div_ceil(align) * align)
}

fn tight_to_abi(layout: &StructLayout, tight: &[u8]) -> Vec<u8> {
    let (offsets, total) = abi_layout(layout);
    let mut abi = vec![0u8; total];
    let mut src = 0;
    for (member, off) in layout.members().iter().zip(offsets) {
        let size = member.size();
        abi[off..off + size].copy_from_slice(&tight[src..src + size]);
        src += size;
    }
    abi
}

fn abi_to_tight(layout: &StructLayout, abi: &[u8]) -> Vec<u8> {
    let (offsets, _) = abi_layout(layout);
    let mut tight = Vec::with_capacity(layout.size());
    for (member, off) in layout.members().iter().zip(offsets) {
        tight.extend_from_slice(&abi[off..off + member.size()]);
    }
    tight
}

/// A bound external function: resolved code address plus the prepared
/// call descriptor and declared signature.
#[derive(Debug)]
pub struct ExternFn {
    symbol: String,
    code: CodePtr,
    cif: Cif,
    params: Vec<CType>,
    ret: CType,
}

impl ExternFn {
    /// Prepare a call descriptor for a resolved symbol.
    ///
    /// A single `Void` parameter declares a zero-argument function (the
    /// script-facing convention); `Void` anywhere else is rejected.
    pub fn prepare(
        symbol: impl Into<String>,
        code: CodePtr,
        mut params: Vec<CType>,
        ret: CType,
    ) -> Result<Self, FfiError> {
        let symbol = symbol.into();
        if params == [CType::Void] {
            params.clear();
        }
        if params.contains(&CType::Void) {
            return Err(FfiError::VoidParameter { symbol });
        }
        let cif = Cif::new(params.iter().map(CType::ffi_type), ret.ffi_type());
        trace!(symbol = %symbol, params = params.len(), ret = %ret, "prepared extern descriptor");
        Ok(ExternFn {
            symbol,
            code,
            cif,
            params,
            ret,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn params(&self) -> &[CType] {
        &self.params
    }

    pub fn ret(&self) -> &CType {
        &self.ret
    }

    /// Code address, for identity comparison of bound functions.
    pub fn code_addr(&self) -> usize {
        self.code.as_ptr() as usize
    }

    /// Invoke the foreign function with marshaled arguments.
    pub fn call(&self, args: &[CValue]) -> Result<CValue, FfiError> {
        if args.len() != self.params.len() {
            return Err(FfiError::ArityMismatch {
                symbol: self.symbol.clone(),
                expected: self.params.len(),
                given: args.len(),
            });
        }
        for (index, (arg, param)) in args.iter().zip(&self.params).enumerate() {
            if !arg.matches(param) {
                return Err(FfiError::ArgumentMismatch {
                    symbol: self.symbol.clone(),
                    index,
                    expected: param.to_string(),
                    given: arg.kind().to_string(),
                });
            }
            if let (CValue::Struct(bytes), CType::Struct(layout)) = (arg, param) {
                if bytes.len() != layout.size() {
                    return Err(FfiError::StructSizeMismatch {
                        symbol: self.symbol.clone(),
                        index,
                        expected: layout.size(),
                        given: bytes.len(),
                    });
                }
            }
        }

        // String arguments need an addressable slot holding the char*
        // value itself, and struct arguments need their packed bytes
        // re-spread to ABI offsets. Everything else is passed by
        // pointing libffi at the payload inside the CValue.
        let str_slots: Vec<*const c_char> = args
            .iter()
            .map(|arg| match arg {
                CValue::Str(s) => s.as_ptr(),
                _ => ptr::null(),
            })
            .collect();
        let struct_slots: Vec<Vec<u8>> = args
            .iter()
            .zip(&self.params)
            .map(|(arg, param)| match (arg, param) {
                (CValue::Struct(bytes), CType::Struct(layout)) => tight_to_abi(layout, bytes),
                _ => Vec::new(),
            })
            .collect();
        let mut avalues: Vec<*mut c_void> = args
            .iter()
            .enumerate()
            .map(|(i, arg)| match arg {
                CValue::Char(v) => ptr::from_ref(v) as *mut c_void,
                CValue::Int(v) => ptr::from_ref(v) as *mut c_void,
                CValue::Float(v) => ptr::from_ref(v) as *mut c_void,
                CValue::Double(v) => ptr::from_ref(v) as *mut c_void,
                CValue::Str(_) => ptr::from_ref(&str_slots[i]) as *mut c_void,
                CValue::Struct(_) => struct_slots[i].as_ptr() as *mut c_void,
                CValue::Void => unreachable!("kind check rejects Void arguments"),
            })
            .collect();

        // Return buffer: word-aligned, at least one libffi return word,
        // large enough for the ABI size of a struct return.
        let ret_words = self.return_buffer_words();
        let mut ret_buf = vec![0u64; ret_words.max(1)];
        let ret_ptr = if self.ret == CType::Void {
            ptr::null_mut()
        } else {
            ret_buf.as_mut_ptr().cast::<c_void>()
        };

        trace!(symbol = %self.symbol, args = args.len(), "ffi call");
        // SAFETY: the CIF was prepared from the declared signature, every
        // argument slot points at live storage of the matching native
        // type, and the return buffer is large enough for the declared
        // return type.
        unsafe {
            libffi::raw::ffi_call(
                self.cif.as_raw_ptr(),
                Some(*self.code.as_fun()),
                ret_ptr,
                avalues.as_mut_ptr(),
            );
        }

        self.read_return(&ret_buf)
    }

    /// Number of u64 words the return buffer needs.
    fn return_buffer_words(&self) -> usize {
        let abi_size = match &self.ret {
            // libffi fills in the ABI size of composite return types
            // when the CIF is prepared.
            CType::Struct(_) => {
                // SAFETY: the CIF owns its rtype descriptor.
                unsafe { (*(*self.cif.as_raw_ptr()).rtype).size }
            }
            other => other.size(),
        };
        abi_size.div_ceil(8)
    }

    fn read_return(&self, ret_buf: &[u64]) -> Result<CValue, FfiError> {
        // SAFETY: reinterpreting the return words as bytes; the buffer
        // outlives this borrow.
        let bytes =
            unsafe { slice::from_raw_parts(ret_buf.as_ptr().cast::<u8>(), ret_buf.len() * 8) };
        Ok(match &self.ret {
            CType::Void => CValue::Void,
            // Small integer returns are widened to a full return word by
            // the libffi calling convention; take the low byte.
            CType::Char => CValue::Int(i64::from(bytes[0] as i8)),
            CType::Int | CType::Long => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[..8]);
                CValue::Int(i64::from_ne_bytes(buf))
            }
            CType::Float => {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(&bytes[..4]);
                CValue::Float(f32::from_ne_bytes(buf))
            }
            CType::Double => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[..8]);
                CValue::Double(f64::from_ne_bytes(buf))
            }
            CType::String => {
                let mut buf = [0usize; 1];
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                buf[0] = usize::from_ne_bytes(raw);
                let p = buf[0] as *const c_char;
                if p.is_null() {
                    return Err(FfiError::NullStringReturn {
                        symbol: self.symbol.clone(),
                    });
                }
                // SAFETY: non-null pointer returned by the callee for a
                // declared String return; copied out immediately.
                let owned = unsafe { CStr::from_ptr(p) }.to_owned();
                CValue::Str(owned)
            }
            CType::Struct(layout) => {
                let (_, abi_size) = abi_layout(layout);
                CValue::Struct(abi_to_tight(layout, &bytes[..abi_size]))
            }
        })
    }
}
