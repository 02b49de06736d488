#[cfg(test)]
mod test_roundtrip;

/// Assembles stream bytes for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct StreamBuilder {
    bytes: Vec<u8>,
}

#[cfg(test)]
impl StreamBuilder {
    /// A standard stream, starting with the header
    pub(crate) fn standard() -> Self {
        Self::headerless().raw(&[0xAC, 0xED, 0x00, 0x05])
    }

    pub(crate) fn headerless() -> Self {
        Self::default()
    }

    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend(bytes);
        self
    }

    pub(crate) fn byte(self, byte: u8) -> Self {
        self.raw(&[byte])
    }

    pub(crate) fn i32(self, value: i32) -> Self {
        self.raw(&value.to_be_bytes())
    }

    pub(crate) fn utf(self, text: &str) -> Self {
        self.raw(&(text.len() as u16).to_be_bytes()).raw(text.as_bytes())
    }

    pub(crate) fn string(self, text: &str) -> Self {
        self.byte(0x74).utf(text)
    }

    pub(crate) fn reference(self, handle: u32) -> Self {
        self.byte(0x71).raw(&handle.to_be_bytes())
    }

    pub(crate) fn null(self) -> Self {
        self.byte(0x70)
    }

    pub(crate) fn end(self) -> Self {
        self.byte(0x78)
    }

    /// A class descriptor up to and including its fields; the annotation and superclass follow
    ///
    /// Object and array fields take their type name as a new string.
    pub(crate) fn class_desc(
        self,
        name: &str,
        serial_version_uid: i64,
        flags: u8,
        fields: &[(u8, &str, Option<&str>)],
    ) -> Self {
        let mut out = self.class_desc_header(name, serial_version_uid, flags, fields.len() as u16);
        for (code, field, type_name) in fields {
            out = out.byte(*code).utf(field);
            if let Some(type_name) = type_name {
                out = out.string(type_name);
            }
        }
        out
    }

    /// A class descriptor up to its field count; the fields are written by the caller
    pub(crate) fn class_desc_header(
        self,
        name: &str,
        serial_version_uid: i64,
        flags: u8,
        field_count: u16,
    ) -> Self {
        self.byte(0x72)
            .utf(name)
            .raw(&serial_version_uid.to_be_bytes())
            .byte(flags)
            .raw(&field_count.to_be_bytes())
    }

    pub(crate) fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A `java.util.HashMap` with one entry, `"k" -> "v"`
#[cfg(test)]
pub(crate) fn hash_map_stream() -> Vec<u8> {
    StreamBuilder::standard()
        .byte(0x73)
        .class_desc(
            "java.util.HashMap",
            0x0507_DAC1_C316_60D1,
            0x03,
            &[(b'F', "loadFactor", None), (b'I', "threshold", None)],
        )
        .end()
        .null()
        .raw(&[0x3F, 0x40, 0x00, 0x00])
        .i32(12)
        .byte(0x77)
        .byte(8)
        .i32(16)
        .i32(1)
        .string("k")
        .string("v")
        .end()
        .build()
}

/// A `demo.Node` whose `next` field points back at itself
#[cfg(test)]
pub(crate) fn self_reference_stream() -> Vec<u8> {
    StreamBuilder::standard()
        .byte(0x73)
        .class_desc("demo.Node", 1, 0x02, &[(b'L', "next", Some("Ldemo/Node;"))])
        .end()
        .null()
        .reference(0x7E_0002)
        .build()
}
