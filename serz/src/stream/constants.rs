/*!
 Tags, flags, and magic numbers of the Java object serialization protocol.

 Values match `java.io.ObjectStreamConstants`.
*/

/// First two bytes of a standard stream
pub const STREAM_MAGIC: u16 = 0xACED;
/// The only protocol version written by modern JVMs
pub const STREAM_VERSION: u16 = 5;
/// The first handle assigned in a stream, and the first handle after each reset
pub const BASE_WIRE_HANDLE: u32 = 0x7E_0000;

/// Null object reference
pub const TC_NULL: u8 = 0x70;
/// Reference to an object already written into the stream
pub const TC_REFERENCE: u8 = 0x71;
/// New class descriptor
pub const TC_CLASSDESC: u8 = 0x72;
/// New object
pub const TC_OBJECT: u8 = 0x73;
/// New string
pub const TC_STRING: u8 = 0x74;
/// New array
pub const TC_ARRAY: u8 = 0x75;
/// Reference to a class
pub const TC_CLASS: u8 = 0x76;
/// Block of optional data, followed by a one byte length
pub const TC_BLOCKDATA: u8 = 0x77;
/// End of optional block data for an object
pub const TC_ENDBLOCKDATA: u8 = 0x78;
/// Reset the stream context
pub const TC_RESET: u8 = 0x79;
/// Long block of optional data, followed by a four byte length
pub const TC_BLOCKDATALONG: u8 = 0x7A;
/// Exception thrown during the write
pub const TC_EXCEPTION: u8 = 0x7B;
/// Long string
pub const TC_LONGSTRING: u8 = 0x7C;
/// New proxy class descriptor
pub const TC_PROXYCLASSDESC: u8 = 0x7D;
/// New enum constant
pub const TC_ENUM: u8 = 0x7E;

/// The class defines its own `writeObject`
pub const SC_WRITE_METHOD: u8 = 0x01;
/// The class implements `java.io.Serializable`
pub const SC_SERIALIZABLE: u8 = 0x02;
/// The class implements `java.io.Externalizable`
pub const SC_EXTERNALIZABLE: u8 = 0x04;
/// External data was written in block data mode
pub const SC_BLOCK_DATA: u8 = 0x08;
/// The class is an enum type
pub const SC_ENUM: u8 = 0x10;

/// The constant name of a record tag, for rendering and error messages
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        TC_NULL => "TC_NULL",
        TC_REFERENCE => "TC_REFERENCE",
        TC_CLASSDESC => "TC_CLASSDESC",
        TC_OBJECT => "TC_OBJECT",
        TC_STRING => "TC_STRING",
        TC_ARRAY => "TC_ARRAY",
        TC_CLASS => "TC_CLASS",
        TC_BLOCKDATA => "TC_BLOCKDATA",
        TC_ENDBLOCKDATA => "TC_ENDBLOCKDATA",
        TC_RESET => "TC_RESET",
        TC_BLOCKDATALONG => "TC_BLOCKDATALONG",
        TC_EXCEPTION => "TC_EXCEPTION",
        TC_LONGSTRING => "TC_LONGSTRING",
        TC_PROXYCLASSDESC => "TC_PROXYCLASSDESC",
        TC_ENUM => "TC_ENUM",
        _ => "TC_UNKNOWN",
    }
}

/// Whether `tag` names any record kind
pub fn is_known_tag(tag: u8) -> bool {
    (TC_NULL..=TC_ENUM).contains(&tag)
}
