/*!
 Class descriptors and the pointers that refer to them.
*/

use std::{
    borrow::Cow,
    fmt::{Display, Formatter},
};

use simd_cesu8::mutf8::decode_lossy;

use crate::{
    error::stream::StreamError,
    stream::{
        constants::{
            SC_BLOCK_DATA, SC_ENUM, SC_EXTERNALIZABLE, SC_SERIALIZABLE, SC_WRITE_METHOD,
            TC_CLASSDESC, TC_ENDBLOCKDATA, TC_NULL, TC_PROXYCLASSDESC,
        },
        cursor::ByteCursor,
        models::{
            content::{tag_line, Content, JavaString, Reference},
            value::TypeCode,
        },
        node::{GraphNode, Node},
    },
    util::{hex::hexify, printer::Printer},
};

/// The `classDescFlags` byte of a class descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ClassDescFlags(pub u8);

impl ClassDescFlags {
    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn is_serializable(self) -> bool {
        self.contains(SC_SERIALIZABLE)
    }

    pub fn is_externalizable(self) -> bool {
        self.contains(SC_EXTERNALIZABLE)
    }

    pub fn has_write_method(self) -> bool {
        self.contains(SC_WRITE_METHOD)
    }

    pub fn has_block_data(self) -> bool {
        self.contains(SC_BLOCK_DATA)
    }

    /// Whether instances of the class carry an object annotation after their field data
    pub fn has_object_annotation(self) -> bool {
        (self.is_serializable() && self.has_write_method())
            || (self.is_externalizable() && self.has_block_data())
    }
}

impl Display for ClassDescFlags {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (SC_WRITE_METHOD, "SC_WRITE_METHOD"),
            (SC_SERIALIZABLE, "SC_SERIALIZABLE"),
            (SC_EXTERNALIZABLE, "SC_EXTERNALIZABLE"),
            (SC_BLOCK_DATA, "SC_BLOCK_DATA"),
            (SC_ENUM, "SC_ENUM"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            write!(fmt, "NONE")
        } else {
            write!(fmt, "{}", names.join("|"))
        }
    }
}

/// A modified UTF-8 string with a two byte length prefix and no record tag, used for class,
/// field, and interface names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Utf {
    pub raw: Vec<u8>,
}

impl Utf {
    pub fn new(text: &str) -> Self {
        Self {
            raw: text.as_bytes().to_vec(),
        }
    }

    pub(crate) fn read(cursor: &mut ByteCursor) -> Result<Self, StreamError> {
        let length = cursor.read_u16()?;
        Ok(Self {
            raw: cursor.read_n(usize::from(length))?.to_vec(),
        })
    }

    pub fn as_str(&self) -> Cow<'_, str> {
        decode_lossy(&self.raw)
    }

    pub(crate) fn write_bytes(&self, buf: &mut Vec<u8>) {
        buf.extend((self.raw.len() as u16).to_be_bytes());
        buf.extend(&self.raw);
    }
}

impl Display for Utf {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}", self.as_str())
    }
}

/// A slot that must hold a string: either a new string or a reference to one
#[derive(Debug, Clone, PartialEq)]
pub enum StringRef {
    Literal(JavaString),
    Reference(Reference),
}

impl GraphNode for StringRef {
    fn write_bytes(&self, buf: &mut Vec<u8>) {
        match self {
            StringRef::Literal(string) => string.write_bytes(buf),
            StringRef::Reference(reference) => reference.write_bytes(buf),
        }
    }

    fn render(&self, printer: &mut Printer) {
        match self {
            StringRef::Literal(string) => string.render(printer),
            StringRef::Reference(reference) => reference.render(printer),
        }
    }

    fn walk<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        visit(Node::StringRef(self))
    }
}

/// One declared field of a class
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
    pub type_code: TypeCode,
    pub name: Utf,
    /// The JVM type signature, i.e. `Ljava/lang/String;`, present for object and array fields
    pub type_name: Option<StringRef>,
}

impl FieldDesc {
    fn write_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(self.type_code.as_byte());
        self.name.write_bytes(buf);
        if let Some(type_name) = &self.type_name {
            type_name.write_bytes(buf);
        }
    }

    fn render(&self, printer: &mut Printer) {
        printer.print(format!(
            "{} - {} - {}",
            self.type_code.name(),
            self.type_code,
            hexify(&[self.type_code.as_byte()])
        ));
        printer.print(format!("@FieldName - {}", self.name));
        if let Some(type_name) = &self.type_name {
            printer.print("@ClassName");
            printer.increase_indent();
            type_name.render(printer);
            printer.decrease_indent();
        }
    }
}

/// A `TC_CLASSDESC` record
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDesc {
    pub handle: u32,
    pub name: Utf,
    pub serial_version_uid: i64,
    pub flags: ClassDescFlags,
    pub fields: Vec<FieldDesc>,
    /// Records written by `annotateClass`, without the trailing `TC_ENDBLOCKDATA`
    pub annotations: Vec<Content>,
    pub super_class: ClassPointer,
}

impl ClassDesc {
    pub fn class_name(&self) -> Cow<'_, str> {
        self.name.as_str()
    }

    fn write_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(TC_CLASSDESC);
        self.name.write_bytes(buf);
        buf.extend(self.serial_version_uid.to_be_bytes());
        buf.push(self.flags.0);
        buf.extend((self.fields.len() as u16).to_be_bytes());
        self.fields.iter().for_each(|field| field.write_bytes(buf));
        write_annotations(&self.annotations, buf);
        self.super_class.write_bytes(buf);
    }

    fn render(&self, printer: &mut Printer) {
        printer.print(tag_line(TC_CLASSDESC));
        printer.increase_indent();
        printer.print(format!("@ClassName - {}", self.name));
        printer.print(format!(
            "@SerialVersionUID - {} - {}",
            self.serial_version_uid,
            hexify(&self.serial_version_uid.to_be_bytes())
        ));
        printer.print(format!("@Handler - {}", self.handle));
        printer.print(format!(
            "@ClassDescFlags - {} - {}",
            self.flags,
            hexify(&[self.flags.0])
        ));
        printer.print(format!(
            "@FieldCount - {} - {}",
            self.fields.len(),
            hexify(&(self.fields.len() as u16).to_be_bytes())
        ));
        printer.print("[]Fields");
        printer.increase_indent();
        for (idx, field) in self.fields.iter().enumerate() {
            printer.print(format!("Index {idx}"));
            printer.increase_indent();
            field.render(printer);
            printer.decrease_indent();
        }
        printer.decrease_indent();
        render_annotations("[]ClassAnnotations", &self.annotations, printer);
        printer.print("@SuperClassDesc");
        printer.increase_indent();
        self.super_class.render(printer);
        printer.decrease_indent();
        printer.decrease_indent();
    }

    fn walk_children<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        for field in &self.fields {
            if let Some(type_name) = &field.type_name {
                type_name.walk(visit)?;
            }
        }
        for annotation in &self.annotations {
            annotation.walk(visit)?;
        }
        self.super_class.walk(visit)
    }
}

/// A `TC_PROXYCLASSDESC` record, describing a dynamic proxy class by the interfaces it implements
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyClassDesc {
    pub handle: u32,
    pub interfaces: Vec<Utf>,
    /// Records written by `annotateProxyClass`, without the trailing `TC_ENDBLOCKDATA`
    pub annotations: Vec<Content>,
    pub super_class: ClassPointer,
}

impl ProxyClassDesc {
    /// A readable name for the proxy class, built from its interfaces
    pub fn display_name(&self) -> String {
        let interfaces: Vec<Cow<str>> = self.interfaces.iter().map(Utf::as_str).collect();
        format!("Proxy[{}]", interfaces.join(", "))
    }

    fn write_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(TC_PROXYCLASSDESC);
        buf.extend((self.interfaces.len() as i32).to_be_bytes());
        self.interfaces.iter().for_each(|name| name.write_bytes(buf));
        write_annotations(&self.annotations, buf);
        self.super_class.write_bytes(buf);
    }

    fn render(&self, printer: &mut Printer) {
        printer.print(tag_line(TC_PROXYCLASSDESC));
        printer.increase_indent();
        printer.print(format!("@Handler - {}", self.handle));
        printer.print(format!(
            "@InterfaceCount - {} - {}",
            self.interfaces.len(),
            hexify(&(self.interfaces.len() as i32).to_be_bytes())
        ));
        printer.print("[]InterfaceNames");
        printer.increase_indent();
        for (idx, name) in self.interfaces.iter().enumerate() {
            printer.print(format!("Index {idx} - {name}"));
        }
        printer.decrease_indent();
        render_annotations("[]ClassAnnotations", &self.annotations, printer);
        printer.print("@SuperClassDesc");
        printer.increase_indent();
        self.super_class.render(printer);
        printer.decrease_indent();
        printer.decrease_indent();
    }

    fn walk_children<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        for annotation in &self.annotations {
            annotation.walk(visit)?;
        }
        self.super_class.walk(visit)
    }
}

/// The only records allowed where a class descriptor is expected
#[derive(Debug, Clone, PartialEq)]
pub enum ClassPointer {
    ClassDesc(Box<ClassDesc>),
    Proxy(Box<ProxyClassDesc>),
    Reference(Reference),
    Null,
}

impl ClassPointer {
    /// The handle of the descriptor this pointer leads to, [`None`] for null
    pub fn handle(&self) -> Option<u32> {
        match self {
            ClassPointer::ClassDesc(desc) => Some(desc.handle),
            ClassPointer::Proxy(desc) => Some(desc.handle),
            ClassPointer::Reference(reference) => Some(reference.handle),
            ClassPointer::Null => None,
        }
    }

    /// The name of an inline, non-proxy class descriptor
    pub fn class_name(&self) -> Option<Cow<'_, str>> {
        match self {
            ClassPointer::ClassDesc(desc) => Some(desc.class_name()),
            _ => None,
        }
    }
}

impl GraphNode for ClassPointer {
    fn write_bytes(&self, buf: &mut Vec<u8>) {
        match self {
            ClassPointer::ClassDesc(desc) => desc.write_bytes(buf),
            ClassPointer::Proxy(desc) => desc.write_bytes(buf),
            ClassPointer::Reference(reference) => reference.write_bytes(buf),
            ClassPointer::Null => buf.push(TC_NULL),
        }
    }

    fn render(&self, printer: &mut Printer) {
        match self {
            ClassPointer::ClassDesc(desc) => desc.render(printer),
            ClassPointer::Proxy(desc) => desc.render(printer),
            ClassPointer::Reference(reference) => reference.render(printer),
            ClassPointer::Null => printer.print(tag_line(TC_NULL)),
        }
    }

    fn walk<'a, E, F>(&'a self, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        visit(Node::ClassPointer(self))?;
        match self {
            ClassPointer::ClassDesc(desc) => desc.walk_children(visit),
            ClassPointer::Proxy(desc) => desc.walk_children(visit),
            ClassPointer::Reference(_) | ClassPointer::Null => Ok(()),
        }
    }
}

/// Write annotation records followed by the end marker
pub(crate) fn write_annotations(annotations: &[Content], buf: &mut Vec<u8>) {
    annotations
        .iter()
        .for_each(|annotation| annotation.write_bytes(buf));
    buf.push(TC_ENDBLOCKDATA);
}

/// Render annotation records under `label`, followed by the end marker
pub(crate) fn render_annotations(label: &str, annotations: &[Content], printer: &mut Printer) {
    printer.print(label);
    printer.increase_indent();
    annotations
        .iter()
        .for_each(|annotation| annotation.render(printer));
    printer.print(tag_line(TC_ENDBLOCKDATA));
    printer.decrease_indent();
}
