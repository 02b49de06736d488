#[cfg(test)]
mod roundtrip_tests {
    use crate::stream::{
        constants::BASE_WIRE_HANDLE,
        decode_legacy_variant, decode_standard,
        models::value::Value,
        node::GraphNode,
        tests::{hash_map_stream, self_reference_stream, StreamBuilder},
        to_display_string,
    };

    fn assert_roundtrip(bytes: &[u8]) {
        let decoded = decode_standard(bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn test_roundtrip_hash_map() {
        assert_roundtrip(&hash_map_stream());
    }

    #[test]
    fn test_roundtrip_self_reference() {
        assert_roundtrip(&self_reference_stream());
    }

    #[test]
    fn test_roundtrip_every_field_type() {
        let bytes = StreamBuilder::standard()
            .byte(0x73)
            .class_desc(
                "demo.Everything",
                -1,
                0x02,
                &[
                    (b'B', "b", None),
                    (b'C', "c", None),
                    (b'D', "d", None),
                    (b'F', "f", None),
                    (b'I', "i", None),
                    (b'J', "j", None),
                    (b'S', "s", None),
                    (b'Z', "z", None),
                    (b'L', "text", Some("Ljava/lang/String;")),
                    (b'[', "ints", Some("[I")),
                ],
            )
            .end()
            .null()
            .byte(0x80)
            .raw(&[0x00, 0x41])
            .raw(&[0x40, 0x09, 0x21, 0xFB, 0x54, 0x44, 0x2D, 0x18])
            .raw(&[0x3F, 0x40, 0x00, 0x00])
            .i32(-2)
            .raw(&i64::MIN.to_be_bytes())
            .raw(&[0x7F, 0xFF])
            .byte(0x01)
            .string("caf\u{e9}")
            .byte(0x75)
            .class_desc("[I", 1, 0x02, &[])
            .end()
            .null()
            .i32(2)
            .i32(7)
            .i32(8)
            .build();

        let decoded = decode_standard(&bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);

        let display = to_display_string(&decoded);
        assert!(display.contains("@ClassName - demo.Everything"));
        assert!(display.contains("(char)'A' - 0x00 41"));
        assert!(display.contains("(long)-9223372036854775808 - 0x80 00 00 00 00 00 00 00"));
        assert!(display.contains("@Value - caf\u{e9}"));
    }

    #[test]
    fn test_roundtrip_shared_type_names() {
        let bytes = StreamBuilder::standard()
            .byte(0x73)
            .class_desc_header("demo.Pair", 1, 0x02, 2)
            .byte(b'L')
            .utf("left")
            .string("Ljava/lang/Object;")
            .byte(b'L')
            .utf("right")
            .reference(BASE_WIRE_HANDLE + 1)
            .end()
            .null()
            .string("l")
            .reference(BASE_WIRE_HANDLE + 3)
            .build();

        let decoded = decode_standard(&bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
        assert!(to_display_string(&decoded).contains("@Handler - 8257539 - 0x00 7e 00 03"));
    }

    #[test]
    fn test_roundtrip_legacy_variant() {
        let standard = hash_map_stream();
        let headerless = &standard[4..];

        let decoded = decode_legacy_variant(headerless).unwrap();
        assert_eq!(decoded.header, None);
        assert_eq!(decoded.to_bytes(), headerless);
        assert!(!to_display_string(&decoded).contains("@Magic"));
    }

    #[test]
    fn test_roundtrip_modified_utf8() {
        // NUL is written as two bytes in modified UTF-8
        let bytes = StreamBuilder::standard()
            .byte(0x74)
            .raw(&[0x00, 0x03, b'a', 0xC0, 0x80])
            .build();

        let decoded = decode_standard(&bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
        assert!(to_display_string(&decoded).contains("@Value - a\0"));
    }

    #[test]
    fn test_roundtrip_keeps_primitive_bits() {
        let value = Value::Double(f64::from_bits(0x7FF8_0000_0000_0001));
        assert_eq!(value.to_bytes(), [0x7F, 0xF8, 0, 0, 0, 0, 0, 0x01]);
    }
}
