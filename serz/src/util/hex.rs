/*!
 Helpers to show raw bytes next to decoded values.
*/

use std::fmt::Write;

/// Number of bytes shown on each line of a [`hex_dump`]
const DUMP_WIDTH: usize = 16;

/// Format bytes as `0x` followed by space separated pairs, i.e. `0xac ed`
pub fn hexify(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 3);
    out.push_str("0x");
    for (idx, byte) in bytes.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        // Writing to a String cannot fail
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Format bytes as a canonical hex dump: offset, two groups of eight bytes, and the printable characters
///
/// ```txt
/// 00000000  68 65 6c 6c 6f                                    |hello|
/// ```
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in bytes.chunks(DUMP_WIDTH).enumerate() {
        let _ = write!(out, "{:08x}  ", line * DUMP_WIDTH);
        for idx in 0..DUMP_WIDTH {
            match chunk.get(idx) {
                Some(byte) => {
                    let _ = write!(out, "{byte:02x} ");
                }
                None => out.push_str("   "),
            }
            if idx == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        chunk.iter().for_each(|byte| {
            out.push(if byte.is_ascii_graphic() || *byte == b' ' {
                *byte as char
            } else {
                '.'
            })
        });
        out.push_str("|\n");
    }
    out
}
