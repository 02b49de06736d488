/*!
 Field and array element values, and the fixed-width codec for the eight primitive types.
*/

use std::fmt::{Display, Formatter};

use crate::{
    error::stream::StreamError,
    stream::{
        cursor::ByteCursor,
        models::content::Content,
        node::{GraphNode, Node},
    },
    util::{hex::hexify, printer::Printer},
};

/// The single character type codes used in field descriptors and array class names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Integer,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
    /// `L`, an instance of a class
    Object,
    /// `[`, an array
    Array,
}

impl TypeCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Self::Byte),
            b'C' => Some(Self::Char),
            b'D' => Some(Self::Double),
            b'F' => Some(Self::Float),
            b'I' => Some(Self::Integer),
            b'J' => Some(Self::Long),
            b'S' => Some(Self::Short),
            b'Z' => Some(Self::Boolean),
            b'L' => Some(Self::Object),
            b'[' => Some(Self::Array),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Byte => b'B',
            Self::Char => b'C',
            Self::Double => b'D',
            Self::Float => b'F',
            Self::Integer => b'I',
            Self::Long => b'J',
            Self::Short => b'S',
            Self::Boolean => b'Z',
            Self::Object => b'L',
            Self::Array => b'[',
        }
    }

    /// The encoded width of a primitive, [`None`] for object and array types
    pub fn size(self) -> Option<usize> {
        match self {
            Self::Byte | Self::Boolean => Some(1),
            Self::Char | Self::Short => Some(2),
            Self::Float | Self::Integer => Some(4),
            Self::Double | Self::Long => Some(8),
            Self::Object | Self::Array => None,
        }
    }

    pub fn is_primitive(self) -> bool {
        self.size().is_some()
    }

    /// The Java keyword for the type
    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Double => "double",
            Self::Float => "float",
            Self::Integer => "int",
            Self::Long => "long",
            Self::Short => "short",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl Display for TypeCode {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}", self.as_byte() as char)
    }
}

/// A single field or array element
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Char(u16),
    Double(f64),
    Float(f32),
    Integer(i32),
    Long(i64),
    Short(i16),
    Boolean(bool),
    /// An `L` typed value: any object record, including null and back-references
    Object(Box<Content>),
    /// A `[` typed value: any object record, including null and back-references
    Array(Box<Content>),
}

impl Value {
    /// Read a primitive of the given type from the stream
    pub fn read_primitive(cursor: &mut ByteCursor, type_code: TypeCode) -> Result<Self, StreamError> {
        let value = match type_code {
            TypeCode::Byte => Self::Byte(i8::from_be_bytes(cursor.read_array()?)),
            TypeCode::Char => Self::Char(u16::from_be_bytes(cursor.read_array()?)),
            TypeCode::Double => Self::Double(f64::from_bits(u64::from_be_bytes(cursor.read_array()?))),
            TypeCode::Float => Self::Float(f32::from_bits(u32::from_be_bytes(cursor.read_array()?))),
            TypeCode::Integer => Self::Integer(i32::from_be_bytes(cursor.read_array()?)),
            TypeCode::Long => Self::Long(i64::from_be_bytes(cursor.read_array()?)),
            TypeCode::Short => Self::Short(i16::from_be_bytes(cursor.read_array()?)),
            TypeCode::Boolean => Self::Boolean(cursor.read_u8()? != 0),
            TypeCode::Object | TypeCode::Array => {
                return Err(StreamError::InvalidTypeCode(
                    type_code.as_byte(),
                    cursor.current_index(),
                ))
            }
        };
        Ok(value)
    }

    pub fn type_code(&self) -> TypeCode {
        match self {
            Self::Byte(_) => TypeCode::Byte,
            Self::Char(_) => TypeCode::Char,
            Self::Double(_) => TypeCode::Double,
            Self::Float(_) => TypeCode::Float,
            Self::Integer(_) => TypeCode::Integer,
            Self::Long(_) => TypeCode::Long,
            Self::Short(_) => TypeCode::Short,
            Self::Boolean(_) => TypeCode::Boolean,
            Self::Object(_) => TypeCode::Object,
            Self::Array(_) => TypeCode::Array,
        }
    }

    /// The encoded bytes of a primitive value, [`None`] for objects and arrays
    pub fn primitive_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Byte(byte) => Some(byte.to_be_bytes().to_vec()),
            Self::Char(unit) => Some(unit.to_be_bytes().to_vec()),
            Self::Double(double) => Some(double.to_bits().to_be_bytes().to_vec()),
            Self::Float(float) => Some(float.to_bits().to_be_bytes().to_vec()),
            Self::Integer(int) => Some(int.to_be_bytes().to_vec()),
            Self::Long(long) => Some(long.to_be_bytes().to_vec()),
            Self::Short(short) => Some(short.to_be_bytes().to_vec()),
            Self::Boolean(boolean) => Some(vec![u8::from(*boolean)]),
            Self::Object(_) | Self::Array(_) => None,
        }
    }
}

impl GraphNode for Value {
    fn write_bytes(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Object(content) | Self::Array(content) => content.write_bytes(buf),
            primitive => {
                if let Some(bytes) = primitive.primitive_bytes() {
                    buf.extend(bytes);
                }
            }
        }
    }

    fn render(&self, printer: &mut Printer) {
        let raw = self.primitive_bytes().map(|bytes| hexify(&bytes));
        match (self, raw) {
            (Self::Object(content) | Self::Array(content), _) => content.render(printer),
            (Self::Char(unit), Some(raw)) => match char::from_u32(u32::from(*unit)) {
                Some(letter) => printer.print(format!("(char){letter:?} - {raw}")),
                None => printer.print(format!("(char)U+{unit:04X} - {raw}")),
            },
            (Self::Byte(byte), Some(raw)) => printer.print(format!("(byte){byte} - {raw}")),
            (Self::Double(double), Some(raw)) => printer.print(format!("(double){double} - {raw}")),
            (Self::Float(float), Some(raw)) => printer.print(format!("(float){float} - {raw}")),
            (Self::Integer(int), Some(raw)) => printer.print(format!("(integer){int} - {raw}")),
            (Self::Long(long), Some(raw)) => printer.print(format!("(long){long} - {raw}")),
            (Self::Short(short), Some(raw)) => printer.print(format!("(short){short} - {raw}")),
            (Self::Boolean(boolean), Some(raw)) => {
                printer.print(format!("(boolean){boolean} - {raw}"))
            }
            (_, None) => {}
        }
    }

    fn walk<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        visit(Node::Value(self))?;
        match self {
            Self::Object(content) | Self::Array(content) => content.walk(visit),
            _ => Ok(()),
        }
    }
}
