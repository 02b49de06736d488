/*!
 The records that can appear anywhere a content item is expected.
*/

use std::borrow::Cow;

use simd_cesu8::mutf8::decode_lossy;

use crate::{
    stream::{
        constants::{
            tag_name, TC_ARRAY, TC_BLOCKDATA, TC_BLOCKDATALONG, TC_CLASS, TC_ENUM, TC_EXCEPTION,
            TC_LONGSTRING, TC_NULL, TC_OBJECT, TC_REFERENCE, TC_RESET, TC_STRING,
        },
        models::{
            class_data::ClassData,
            class_desc::{ClassPointer, StringRef},
            value::{TypeCode, Value},
        },
        node::{GraphNode, Node},
    },
    util::{
        hex::{hex_dump, hexify},
        printer::Printer,
    },
};

/// The first line of every rendered record, i.e. `TC_NULL - 0x70`
pub(crate) fn tag_line(tag: u8) -> String {
    format!("{} - {}", tag_name(tag), hexify(&[tag]))
}

fn handle_line(handle: u32) -> String {
    format!("@Handler - {handle}")
}

/// A back-reference to a handle assigned earlier in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub handle: u32,
}

impl Reference {
    pub(crate) fn write_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(TC_REFERENCE);
        buf.extend(self.handle.to_be_bytes());
    }

    pub(crate) fn render(&self, printer: &mut Printer) {
        printer.print(tag_line(TC_REFERENCE));
        printer.increase_indent();
        printer.print(format!(
            "@Handler - {} - {}",
            self.handle,
            hexify(&self.handle.to_be_bytes())
        ));
        printer.decrease_indent();
    }
}

/// A `TC_STRING` or `TC_LONGSTRING` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaString {
    pub handle: u32,
    /// Whether the length was written as eight bytes
    pub long: bool,
    /// Modified UTF-8 bytes exactly as they appear in the stream
    pub raw: Vec<u8>,
}

impl JavaString {
    pub fn as_str(&self) -> Cow<'_, str> {
        decode_lossy(&self.raw)
    }

    fn length_bytes(&self) -> Vec<u8> {
        if self.long {
            (self.raw.len() as u64).to_be_bytes().to_vec()
        } else {
            (self.raw.len() as u16).to_be_bytes().to_vec()
        }
    }

    pub(crate) fn write_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(if self.long { TC_LONGSTRING } else { TC_STRING });
        buf.extend(self.length_bytes());
        buf.extend(&self.raw);
    }

    pub(crate) fn render(&self, printer: &mut Printer) {
        printer.print(tag_line(if self.long { TC_LONGSTRING } else { TC_STRING }));
        printer.increase_indent();
        printer.print(handle_line(self.handle));
        printer.print(format!(
            "@Length - {} - {}",
            self.raw.len(),
            hexify(&self.length_bytes())
        ));
        printer.print(format!("@Value - {}", self.as_str()));
        printer.decrease_indent();
    }
}

/// A `TC_OBJECT` record
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub class_pointer: ClassPointer,
    pub handle: u32,
    /// One entry per class in the hierarchy, from the top-most superclass down
    pub class_data: Vec<ClassData>,
}

impl Object {
    /// Name of the most derived class
    pub fn class_name(&self) -> Option<&str> {
        self.class_data.last().map(|data| data.class_name.as_str())
    }
}

/// A `TC_ARRAY` record
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub class_pointer: ClassPointer,
    pub handle: u32,
    /// The array class name, i.e. `[I` or `[Ljava.lang.String;`
    pub class_name: String,
    pub element_type: TypeCode,
    pub values: Vec<Value>,
}

impl Array {
    /// The elements of a `byte[]` as raw bytes
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        if self.element_type != TypeCode::Byte {
            return None;
        }
        self.values
            .iter()
            .map(|value| match value {
                Value::Byte(byte) => Some(byte.to_be_bytes()[0]),
                _ => None,
            })
            .collect()
    }
}

/// A `TC_CLASS` record, a `Class` instance written as a value
#[derive(Debug, Clone, PartialEq)]
pub struct ClassValue {
    pub class_pointer: ClassPointer,
    pub handle: u32,
}

/// A `TC_ENUM` record
#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub class_pointer: ClassPointer,
    pub handle: u32,
    pub constant: StringRef,
}

/// A `TC_BLOCKDATA` or `TC_BLOCKDATALONG` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockData {
    /// Whether the length was written as four bytes
    pub long: bool,
    pub data: Vec<u8>,
}

impl BlockData {
    fn length_bytes(&self) -> Vec<u8> {
        if self.long {
            (self.data.len() as i32).to_be_bytes().to_vec()
        } else {
            vec![self.data.len() as u8]
        }
    }
}

/// A `TC_EXCEPTION` record: the throwable raised while the stream was written
#[derive(Debug, Clone, PartialEq)]
pub struct Exception {
    pub throwable: Box<Content>,
}

/// Any record allowed as stream content, an annotation entry, or an object field value
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Object(Object),
    Class(ClassValue),
    Array(Array),
    String(JavaString),
    Enum(EnumConstant),
    /// A class descriptor written on its own
    ClassDesc(ClassPointer),
    Null,
    Reference(Reference),
    Exception(Exception),
    Reset,
    BlockData(BlockData),
}

impl Content {
    /// The handle assigned to this record, if it received one
    pub fn handle(&self) -> Option<u32> {
        match self {
            Content::Object(object) => Some(object.handle),
            Content::Class(class) => Some(class.handle),
            Content::Array(array) => Some(array.handle),
            Content::String(string) => Some(string.handle),
            Content::Enum(constant) => Some(constant.handle),
            Content::ClassDesc(pointer) => match pointer {
                ClassPointer::ClassDesc(_) | ClassPointer::Proxy(_) => pointer.handle(),
                ClassPointer::Reference(_) | ClassPointer::Null => None,
            },
            Content::Null
            | Content::Reference(_)
            | Content::Exception(_)
            | Content::Reset
            | Content::BlockData(_) => None,
        }
    }
}

impl GraphNode for Content {
    fn write_bytes(&self, buf: &mut Vec<u8>) {
        match self {
            Content::Object(object) => {
                buf.push(TC_OBJECT);
                object.class_pointer.write_bytes(buf);
                object.class_data.iter().for_each(|data| data.write_bytes(buf));
            }
            Content::Class(class) => {
                buf.push(TC_CLASS);
                class.class_pointer.write_bytes(buf);
            }
            Content::Array(array) => {
                buf.push(TC_ARRAY);
                array.class_pointer.write_bytes(buf);
                buf.extend((array.values.len() as i32).to_be_bytes());
                array.values.iter().for_each(|value| value.write_bytes(buf));
            }
            Content::String(string) => string.write_bytes(buf),
            Content::Enum(constant) => {
                buf.push(TC_ENUM);
                constant.class_pointer.write_bytes(buf);
                constant.constant.write_bytes(buf);
            }
            Content::ClassDesc(pointer) => pointer.write_bytes(buf),
            Content::Null => buf.push(TC_NULL),
            Content::Reference(reference) => reference.write_bytes(buf),
            Content::Exception(exception) => {
                buf.push(TC_EXCEPTION);
                exception.throwable.write_bytes(buf);
            }
            Content::Reset => buf.push(TC_RESET),
            Content::BlockData(block) => {
                buf.push(if block.long { TC_BLOCKDATALONG } else { TC_BLOCKDATA });
                buf.extend(block.length_bytes());
                buf.extend(&block.data);
            }
        }
    }

    fn render(&self, printer: &mut Printer) {
        match self {
            Content::Object(object) => {
                printer.print(tag_line(TC_OBJECT));
                printer.increase_indent();
                object.class_pointer.render(printer);
                printer.print(handle_line(object.handle));
                printer.print("[]ClassData");
                printer.increase_indent();
                object.class_data.iter().for_each(|data| data.render(printer));
                printer.decrease_indent();
                printer.decrease_indent();
            }
            Content::Class(class) => {
                printer.print(tag_line(TC_CLASS));
                printer.increase_indent();
                class.class_pointer.render(printer);
                printer.print(handle_line(class.handle));
                printer.decrease_indent();
            }
            Content::Array(array) => {
                printer.print(tag_line(TC_ARRAY));
                printer.increase_indent();
                array.class_pointer.render(printer);
                printer.print(handle_line(array.handle));
                printer.print(format!(
                    "@ArraySize - {} - {}",
                    array.values.len(),
                    hexify(&(array.values.len() as i32).to_be_bytes())
                ));
                printer.print("[]Values");
                printer.increase_indent();
                match array.as_bytes() {
                    Some(bytes) => printer.print(hex_dump(&bytes)),
                    None => {
                        for (idx, value) in array.values.iter().enumerate() {
                            printer.print(format!("Index {idx}"));
                            printer.increase_indent();
                            value.render(printer);
                            printer.decrease_indent();
                        }
                    }
                }
                printer.decrease_indent();
                printer.decrease_indent();
            }
            Content::String(string) => string.render(printer),
            Content::Enum(constant) => {
                printer.print(tag_line(TC_ENUM));
                printer.increase_indent();
                constant.class_pointer.render(printer);
                printer.print(handle_line(constant.handle));
                printer.print("@EnumConstantName");
                printer.increase_indent();
                constant.constant.render(printer);
                printer.decrease_indent();
                printer.decrease_indent();
            }
            Content::ClassDesc(pointer) => pointer.render(printer),
            Content::Null => printer.print(tag_line(TC_NULL)),
            Content::Reference(reference) => reference.render(printer),
            Content::Exception(exception) => {
                printer.print(tag_line(TC_EXCEPTION));
                printer.increase_indent();
                exception.throwable.render(printer);
                printer.decrease_indent();
            }
            Content::Reset => printer.print(tag_line(TC_RESET)),
            Content::BlockData(block) => {
                printer.print(tag_line(if block.long { TC_BLOCKDATALONG } else { TC_BLOCKDATA }));
                printer.increase_indent();
                printer.print(format!(
                    "@Length - {} - {}",
                    block.data.len(),
                    hexify(&block.length_bytes())
                ));
                printer.print("@Blockdata");
                printer.increase_indent();
                printer.print(hex_dump(&block.data));
                printer.decrease_indent();
                printer.decrease_indent();
            }
        }
    }

    fn walk<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        visit(Node::Content(self))?;
        match self {
            Content::Object(object) => {
                object.class_pointer.walk(visit)?;
                for data in &object.class_data {
                    data.walk_children(visit)?;
                }
                Ok(())
            }
            Content::Class(class) => class.class_pointer.walk(visit),
            Content::Array(array) => {
                array.class_pointer.walk(visit)?;
                for value in &array.values {
                    value.walk(visit)?;
                }
                Ok(())
            }
            Content::Enum(constant) => {
                constant.class_pointer.walk(visit)?;
                constant.constant.walk(visit)
            }
            Content::ClassDesc(pointer) => pointer.walk(visit),
            Content::Exception(exception) => exception.throwable.walk(visit),
            Content::String(_)
            | Content::Null
            | Content::Reference(_)
            | Content::Reset
            | Content::BlockData(_) => Ok(()),
        }
    }
}
