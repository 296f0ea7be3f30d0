//! Descriptor-driven encode and decode.
//!
//! [`Writer`] and [`Reader`] walk a [`Layout`]'s fields in declaration
//! order. Every accessor names the field it expects, so a call site that
//! drifts out of sync with the registry fails with a typed
//! [`WireError::SchemaMismatch`] instead of silently touching bytes at the
//! wrong offset. Both halves are pure transforms: identical input yields
//! identical output byte for byte.

use crate::error::WireError;
use crate::layout::{Field, FieldKind, Layout};

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Sequential encoder for one record.
///
/// Created from a layout with the buffer zeroed and the magic/version
/// regions stamped. Every declared field must be written exactly once, in
/// declaration order, before [`Writer::finish`] releases the buffer.
pub struct Writer<'l> {
    layout: &'l Layout,
    buf: Vec<u8>,
    next: usize,
}

impl<'l> Writer<'l> {
    pub fn new(layout: &'l Layout) -> Self {
        let mut buf = vec![0u8; layout.len()];
        if let Some(m) = layout.magic() {
            buf[m.offset..m.offset + m.bytes.len()].copy_from_slice(&m.bytes);
        }
        if let Some(v) = layout.version() {
            buf[v.offset] = v.current;
        }
        Writer {
            layout,
            buf,
            next: 0,
        }
    }

    /// Advance to the next declared field, checking the caller named it.
    fn take(&mut self, name: &'static str) -> Result<Field, WireError> {
        let field = self
            .layout
            .fields()
            .get(self.next)
            .copied()
            .ok_or(WireError::SchemaMismatch {
                layout: self.layout.name(),
                expected: "<end of record>",
                got: name,
            })?;
        if field.name != name {
            return Err(WireError::SchemaMismatch {
                layout: self.layout.name(),
                expected: field.name,
                got: name,
            });
        }
        self.next += 1;
        Ok(field)
    }

    fn kind_mismatch(&self, field: &Field, got: &'static str) -> WireError {
        WireError::SchemaMismatch {
            layout: self.layout.name(),
            expected: field.name,
            got,
        }
    }

    pub fn put_u8(&mut self, name: &'static str, value: u8) -> Result<(), WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U8 {
            return Err(self.kind_mismatch(&f, "put_u8"));
        }
        self.buf[f.offset] = value;
        Ok(())
    }

    pub fn put_u16(&mut self, name: &'static str, value: u16) -> Result<(), WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U16 {
            return Err(self.kind_mismatch(&f, "put_u16"));
        }
        self.buf[f.offset..f.end()].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn put_u32(&mut self, name: &'static str, value: u32) -> Result<(), WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U32 {
            return Err(self.kind_mismatch(&f, "put_u32"));
        }
        self.buf[f.offset..f.end()].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn put_u64(&mut self, name: &'static str, value: u64) -> Result<(), WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U64 {
            return Err(self.kind_mismatch(&f, "put_u64"));
        }
        self.buf[f.offset..f.end()].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn put_i64(&mut self, name: &'static str, value: i64) -> Result<(), WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::I64 {
            return Err(self.kind_mismatch(&f, "put_i64"));
        }
        self.buf[f.offset..f.end()].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn put_i128(&mut self, name: &'static str, value: i128) -> Result<(), WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::I128 {
            return Err(self.kind_mismatch(&f, "put_i128"));
        }
        self.buf[f.offset..f.end()].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn put_bool(&mut self, name: &'static str, value: bool) -> Result<(), WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::Bool {
            return Err(self.kind_mismatch(&f, "put_bool"));
        }
        self.buf[f.offset] = u8::from(value);
        Ok(())
    }

    /// Copy `value` into a fixed-length byte field, zero-padding on the
    /// right. Over-length input is an error, never silent truncation.
    pub fn put_bytes(&mut self, name: &'static str, value: &[u8]) -> Result<(), WireError> {
        let f = self.take(name)?;
        let width = match f.kind {
            FieldKind::Bytes(width) => width,
            _ => return Err(self.kind_mismatch(&f, "put_bytes")),
        };
        if value.len() > width {
            return Err(WireError::ValueTooLargeForWidth {
                layout: self.layout.name(),
                field: f.name,
                width,
            });
        }
        self.buf[f.offset..f.offset + value.len()].copy_from_slice(value);
        Ok(())
    }

    /// Release the encoded buffer. Every declared field must have been
    /// written; a partial record never escapes.
    pub fn finish(self) -> Result<Vec<u8>, WireError> {
        let total = self.layout.fields().len();
        if self.next != total {
            return Err(WireError::MissingFields {
                layout: self.layout.name(),
                missing: total - self.next,
            });
        }
        Ok(self.buf)
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Sequential decoder for one record.
///
/// [`Reader::new`] performs the validity gate in a fixed order — length,
/// then magic, then version — and only hands out field accessors once all
/// three pass. A buffer that fails any gate produces a typed error and no
/// partially-populated data.
#[derive(Debug)]
pub struct Reader<'l, 'b> {
    layout: &'l Layout,
    buf: &'b [u8],
    next: usize,
}

impl<'l, 'b> Reader<'l, 'b> {
    pub fn new(layout: &'l Layout, buf: &'b [u8]) -> Result<Self, WireError> {
        if buf.len() < layout.len() {
            return Err(WireError::TooShort {
                layout: layout.name(),
                need: layout.len(),
                got: buf.len(),
            });
        }
        if let Some(m) = layout.magic() {
            let found = &buf[m.offset..m.offset + m.bytes.len()];
            if found != m.bytes {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(found);
                return Err(WireError::BadMagic {
                    layout: layout.name(),
                    found: arr,
                });
            }
        }
        if let Some(v) = layout.version() {
            let version = buf[v.offset];
            if !v.supported.contains(&version) {
                return Err(WireError::UnsupportedVersion {
                    layout: layout.name(),
                    version,
                });
            }
        }
        Ok(Reader {
            layout,
            buf,
            next: 0,
        })
    }

    /// Layout name, for callers composing their own range errors.
    pub fn layout_name(&self) -> &'static str {
        self.layout.name()
    }

    fn take(&mut self, name: &'static str) -> Result<Field, WireError> {
        let field = self
            .layout
            .fields()
            .get(self.next)
            .copied()
            .ok_or(WireError::SchemaMismatch {
                layout: self.layout.name(),
                expected: "<end of record>",
                got: name,
            })?;
        if field.name != name {
            return Err(WireError::SchemaMismatch {
                layout: self.layout.name(),
                expected: field.name,
                got: name,
            });
        }
        self.next += 1;
        Ok(field)
    }

    fn kind_mismatch(&self, field: &Field, got: &'static str) -> WireError {
        WireError::SchemaMismatch {
            layout: self.layout.name(),
            expected: field.name,
            got,
        }
    }

    pub fn get_u8(&mut self, name: &'static str) -> Result<u8, WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U8 {
            return Err(self.kind_mismatch(&f, "get_u8"));
        }
        Ok(self.buf[f.offset])
    }

    pub fn get_u16(&mut self, name: &'static str) -> Result<u16, WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U16 {
            return Err(self.kind_mismatch(&f, "get_u16"));
        }
        let mut b = [0u8; 2];
        b.copy_from_slice(&self.buf[f.offset..f.end()]);
        Ok(u16::from_le_bytes(b))
    }

    pub fn get_u32(&mut self, name: &'static str) -> Result<u32, WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U32 {
            return Err(self.kind_mismatch(&f, "get_u32"));
        }
        let mut b = [0u8; 4];
        b.copy_from_slice(&self.buf[f.offset..f.end()]);
        Ok(u32::from_le_bytes(b))
    }

    pub fn get_u64(&mut self, name: &'static str) -> Result<u64, WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::U64 {
            return Err(self.kind_mismatch(&f, "get_u64"));
        }
        let mut b = [0u8; 8];
        b.copy_from_slice(&self.buf[f.offset..f.end()]);
        Ok(u64::from_le_bytes(b))
    }

    pub fn get_i64(&mut self, name: &'static str) -> Result<i64, WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::I64 {
            return Err(self.kind_mismatch(&f, "get_i64"));
        }
        let mut b = [0u8; 8];
        b.copy_from_slice(&self.buf[f.offset..f.end()]);
        Ok(i64::from_le_bytes(b))
    }

    pub fn get_i128(&mut self, name: &'static str) -> Result<i128, WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::I128 {
            return Err(self.kind_mismatch(&f, "get_i128"));
        }
        let mut b = [0u8; 16];
        b.copy_from_slice(&self.buf[f.offset..f.end()]);
        Ok(i128::from_le_bytes(b))
    }

    /// Read a boolean byte. Anything other than `0` or `1` is
    /// `FieldOutOfRange`, not a coerced truthy value.
    pub fn get_bool(&mut self, name: &'static str) -> Result<bool, WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::Bool {
            return Err(self.kind_mismatch(&f, "get_bool"));
        }
        match self.buf[f.offset] {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(WireError::FieldOutOfRange {
                layout: self.layout.name(),
                field: f.name,
                detail: format!("boolean byte is {byte}"),
            }),
        }
    }

    /// Borrow a fixed-length byte field.
    pub fn get_bytes(&mut self, name: &'static str) -> Result<&'b [u8], WireError> {
        let f = self.take(name)?;
        match f.kind {
            FieldKind::Bytes(_) => Ok(&self.buf[f.offset..f.end()]),
            _ => Err(self.kind_mismatch(&f, "get_bytes")),
        }
    }

    /// Read a byte field whose declared width must equal `N` exactly.
    pub fn get_array<const N: usize>(&mut self, name: &'static str) -> Result<[u8; N], WireError> {
        let f = self.take(name)?;
        if f.kind != FieldKind::Bytes(N) {
            return Err(self.kind_mismatch(&f, "get_array"));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[f.offset..f.end()]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Magic, Version};

    fn test_layout() -> Layout {
        Layout::new(
            "Test",
            64,
            Some(Magic {
                offset: 0,
                bytes: *b"TESTMGIC",
            }),
            Some(Version {
                offset: 8,
                current: 1,
                supported: &[1],
            }),
            vec![
                Field::new("flag", 9, FieldKind::Bool),
                Field::new("tag", 10, FieldKind::Bytes(6)),
                Field::new("amount", 16, FieldKind::U64),
                Field::new("delta", 24, FieldKind::I64),
                Field::new("count", 32, FieldKind::U16),
                Field::new("scale", 36, FieldKind::U32),
                Field::new("big", 40, FieldKind::I128),
            ],
        )
        .unwrap()
    }

    fn encode_fixture(layout: &Layout) -> Vec<u8> {
        let mut w = Writer::new(layout);
        w.put_bool("flag", true).unwrap();
        w.put_bytes("tag", b"abc").unwrap();
        w.put_u64("amount", 1_000_000_000).unwrap();
        w.put_i64("delta", -42).unwrap();
        w.put_u16("count", 7).unwrap();
        w.put_u32("scale", 1_000_000).unwrap();
        w.put_i128("big", -1).unwrap();
        w.finish().unwrap()
    }

    #[test]
    fn round_trip_all_field_kinds() {
        let layout = test_layout();
        let bytes = encode_fixture(&layout);
        assert_eq!(bytes.len(), 64);

        let mut r = Reader::new(&layout, &bytes).unwrap();
        assert!(r.get_bool("flag").unwrap());
        assert_eq!(r.get_bytes("tag").unwrap(), b"abc\0\0\0");
        assert_eq!(r.get_u64("amount").unwrap(), 1_000_000_000);
        assert_eq!(r.get_i64("delta").unwrap(), -42);
        assert_eq!(r.get_u16("count").unwrap(), 7);
        assert_eq!(r.get_u32("scale").unwrap(), 1_000_000);
        assert_eq!(r.get_i128("big").unwrap(), -1);
    }

    #[test]
    fn encode_is_deterministic() {
        let layout = test_layout();
        assert_eq!(encode_fixture(&layout), encode_fixture(&layout));
    }

    #[test]
    fn magic_and_version_are_stamped() {
        let layout = test_layout();
        let bytes = encode_fixture(&layout);
        assert_eq!(&bytes[0..8], b"TESTMGIC");
        assert_eq!(bytes[8], 1);
    }

    #[test]
    fn reserved_gaps_stay_zero() {
        let layout = test_layout();
        let bytes = encode_fixture(&layout);
        // 34..36 and 56..64 are not covered by any field.
        assert_eq!(&bytes[34..36], &[0, 0]);
        assert_eq!(&bytes[56..64], &[0u8; 8]);
    }

    #[test]
    fn short_buffer_is_too_short() {
        let layout = test_layout();
        let err = Reader::new(&layout, &[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            WireError::TooShort {
                layout: "Test",
                need: 64,
                got: 10
            }
        );
    }

    #[test]
    fn flipped_magic_byte_rejected() {
        let layout = test_layout();
        for i in 0..8 {
            let mut bytes = encode_fixture(&layout);
            bytes[i] ^= 0xff;
            let err = Reader::new(&layout, &bytes).unwrap_err();
            assert!(matches!(err, WireError::BadMagic { .. }), "byte {i}");
        }
    }

    #[test]
    fn unsupported_version_rejected() {
        let layout = test_layout();
        let mut bytes = encode_fixture(&layout);
        bytes[8] = 2;
        let err = Reader::new(&layout, &bytes).unwrap_err();
        assert_eq!(
            err,
            WireError::UnsupportedVersion {
                layout: "Test",
                version: 2
            }
        );
    }

    #[test]
    fn bad_bool_byte_is_out_of_range() {
        let layout = test_layout();
        let mut bytes = encode_fixture(&layout);
        bytes[9] = 3;
        let mut r = Reader::new(&layout, &bytes).unwrap();
        let err = r.get_bool("flag").unwrap_err();
        assert!(matches!(err, WireError::FieldOutOfRange { field: "flag", .. }));
    }

    #[test]
    fn over_length_bytes_rejected_not_truncated() {
        let layout = test_layout();
        let mut w = Writer::new(&layout);
        w.put_bool("flag", false).unwrap();
        let err = w.put_bytes("tag", b"seven!!").unwrap_err();
        assert_eq!(
            err,
            WireError::ValueTooLargeForWidth {
                layout: "Test",
                field: "tag",
                width: 6
            }
        );
    }

    #[test]
    fn wrong_field_name_is_schema_mismatch() {
        let layout = test_layout();
        let mut w = Writer::new(&layout);
        let err = w.put_bool("flags", false).unwrap_err();
        assert_eq!(
            err,
            WireError::SchemaMismatch {
                layout: "Test",
                expected: "flag",
                got: "flags"
            }
        );
    }

    #[test]
    fn wrong_accessor_kind_is_schema_mismatch() {
        let layout = test_layout();
        let mut w = Writer::new(&layout);
        let err = w.put_u8("flag", 1).unwrap_err();
        assert!(matches!(err, WireError::SchemaMismatch { .. }));
    }

    #[test]
    fn finish_requires_all_fields() {
        let layout = test_layout();
        let mut w = Writer::new(&layout);
        w.put_bool("flag", true).unwrap();
        let err = w.finish().unwrap_err();
        assert_eq!(
            err,
            WireError::MissingFields {
                layout: "Test",
                missing: 6
            }
        );
    }

    #[test]
    fn reading_past_last_field_is_schema_mismatch() {
        let layout = test_layout();
        let bytes = encode_fixture(&layout);
        let mut r = Reader::new(&layout, &bytes).unwrap();
        r.get_bool("flag").unwrap();
        r.get_bytes("tag").unwrap();
        r.get_u64("amount").unwrap();
        r.get_i64("delta").unwrap();
        r.get_u16("count").unwrap();
        r.get_u32("scale").unwrap();
        r.get_i128("big").unwrap();
        let err = r.get_u8("extra").unwrap_err();
        assert!(matches!(
            err,
            WireError::SchemaMismatch {
                expected: "<end of record>",
                ..
            }
        ));
    }

    #[test]
    fn get_array_checks_width() {
        let layout = test_layout();
        let bytes = encode_fixture(&layout);
        let mut r = Reader::new(&layout, &bytes).unwrap();
        r.get_bool("flag").unwrap();
        let err = r.get_array::<8>("tag").unwrap_err();
        assert!(matches!(err, WireError::SchemaMismatch { .. }));
    }
}
