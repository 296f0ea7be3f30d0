use thiserror::Error;

/// Errors produced while encoding or decoding a fixed-layout record.
///
/// Decode-side variants (`TooShort`, `BadMagic`, `UnsupportedVersion`,
/// `FieldOutOfRange`) classify untrusted input; they are ordinary values,
/// never panics. Encode-side variants (`ValueTooLargeForWidth`,
/// `SchemaMismatch`, `MissingFields`) catch call sites that drifted out of
/// sync with the layout registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("{layout}: buffer too short, need {need} bytes, got {got}")]
    TooShort {
        layout: &'static str,
        need: usize,
        got: usize,
    },

    #[error("{layout}: bad magic, found {}", hex::encode(.found))]
    BadMagic {
        layout: &'static str,
        found: [u8; 8],
    },

    #[error("{layout}: unsupported record version {version}")]
    UnsupportedVersion {
        layout: &'static str,
        version: u8,
    },

    #[error("{layout}: field `{field}` out of range: {detail}")]
    FieldOutOfRange {
        layout: &'static str,
        field: &'static str,
        detail: String,
    },

    #[error("{layout}: value for field `{field}` does not fit in {width} bytes")]
    ValueTooLargeForWidth {
        layout: &'static str,
        field: &'static str,
        width: usize,
    },

    #[error("{layout}: expected field `{expected}`, accessor asked for `{got}`")]
    SchemaMismatch {
        layout: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("{layout}: {missing} field(s) not written before finish")]
    MissingFields {
        layout: &'static str,
        missing: usize,
    },
}

/// Errors detected while constructing a layout descriptor.
///
/// These never depend on caller data: a descriptor that trips one of them
/// is a bug in the registry itself, caught at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout {layout}: field `{field}` extends past the record end")]
    FieldPastEnd {
        layout: &'static str,
        field: &'static str,
    },

    #[error("layout {layout}: field `{field}` overlaps an earlier field or reserved region")]
    OverlappingFields {
        layout: &'static str,
        field: &'static str,
    },

    #[error("layout {layout}: magic region extends past the record end")]
    MagicPastEnd { layout: &'static str },

    #[error("layout {layout}: version byte offset is past the record end")]
    VersionPastEnd { layout: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_magic_renders_hex() {
        let err = WireError::BadMagic {
            layout: "PriceRecord",
            found: [0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 0],
        };
        assert_eq!(
            err.to_string(),
            "PriceRecord: bad magic, found deadbeef00000000"
        );
    }

    #[test]
    fn too_short_display() {
        let err = WireError::TooShort {
            layout: "CommitteeRecord",
            need: 528,
            got: 12,
        };
        assert_eq!(
            err.to_string(),
            "CommitteeRecord: buffer too short, need 528 bytes, got 12"
        );
    }

    #[test]
    fn layout_error_display() {
        let err = LayoutError::FieldPastEnd {
            layout: "PriceRecord",
            field: "slot",
        };
        assert!(err.to_string().contains("slot"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(WireError::UnsupportedVersion {
            layout: "PriceRecord",
            version: 9,
        });
        assert!(err.to_string().contains("version 9"));
    }
}
