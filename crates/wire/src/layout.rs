//! Fixed-layout record descriptors.
//!
//! A [`Layout`] is pure data: the total record length plus an ordered list
//! of named fields at fixed byte offsets. Descriptors are validated once at
//! construction and shared immutably; the codec in [`crate::codec`] is
//! driven entirely by them. Byte ranges not covered by any field are
//! reserved and stay zero on encode.

use crate::error::LayoutError;

/// How a single field is encoded on the wire.
///
/// Integers are little-endian; signed integers are two's-complement.
/// Widths are whole bytes only, so any record can be checked against a raw
/// hex dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    I64,
    I128,
    /// One byte, `0` or `1`.
    Bool,
    /// Fixed-length byte array, copied verbatim.
    Bytes(usize),
}

impl FieldKind {
    /// Encoded width in bytes.
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Bool => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::U64 | FieldKind::I64 => 8,
            FieldKind::I128 => 16,
            FieldKind::Bytes(len) => len,
        }
    }
}

/// One named field at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Field { name, offset, kind }
    }

    /// One past the last byte this field occupies.
    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }
}

/// Magic constant expected at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct Magic {
    pub offset: usize,
    pub bytes: [u8; 8],
}

/// Version byte at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct Version {
    pub offset: usize,
    /// Version stamped on encode.
    pub current: u8,
    /// Versions accepted on decode.
    pub supported: &'static [u8],
}

/// A complete record descriptor. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Layout {
    name: &'static str,
    len: usize,
    magic: Option<Magic>,
    version: Option<Version>,
    fields: Vec<Field>,
}

impl Layout {
    /// Build and validate a descriptor.
    ///
    /// Fields must be declared in ascending offset order, must not overlap
    /// each other or the magic/version regions, and must fit inside `len`.
    /// A violation is a bug in the registry, reported here before any
    /// caller data is touched.
    pub fn new(
        name: &'static str,
        len: usize,
        magic: Option<Magic>,
        version: Option<Version>,
        fields: Vec<Field>,
    ) -> Result<Self, LayoutError> {
        if let Some(m) = &magic {
            if m.offset + m.bytes.len() > len {
                return Err(LayoutError::MagicPastEnd { layout: name });
            }
        }
        if let Some(v) = &version {
            if v.offset >= len {
                return Err(LayoutError::VersionPastEnd { layout: name });
            }
        }

        // Regions the declared fields must stay clear of.
        let mut reserved: Vec<(usize, usize)> = Vec::new();
        if let Some(m) = &magic {
            reserved.push((m.offset, m.offset + m.bytes.len()));
        }
        if let Some(v) = &version {
            reserved.push((v.offset, v.offset + 1));
        }

        let mut prev_end = 0usize;
        for field in &fields {
            if field.end() > len {
                return Err(LayoutError::FieldPastEnd {
                    layout: name,
                    field: field.name,
                });
            }
            // Ascending offsets and no overlap with the previous field.
            if field.offset < prev_end {
                return Err(LayoutError::OverlappingFields {
                    layout: name,
                    field: field.name,
                });
            }
            for &(start, end) in &reserved {
                if field.offset < end && field.end() > start {
                    return Err(LayoutError::OverlappingFields {
                        layout: name,
                        field: field.name,
                    });
                }
            }
            prev_end = field.end();
        }

        Ok(Layout {
            name,
            len,
            magic,
            version,
            fields,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Total record length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn magic(&self) -> Option<&Magic> {
        self.magic.as_ref()
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Declared fields in wire order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}
