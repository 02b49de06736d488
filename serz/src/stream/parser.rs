/*!
 Contains logic to turn the bytes of a serialization stream into a [`Serialization`].

 Records are read by peeking their tag and dispatching to a reader that consumes the tag itself.
 Logic referenced from the [Object Serialization Stream Protocol](https://docs.oracle.com/javase/8/docs/platform/serialization/spec/protocol.html).
*/

use std::rc::Rc;

use simd_cesu8::mutf8::decode_lossy;
use tracing::{debug, trace};

use crate::{
    error::stream::StreamError,
    stream::{
        constants::{
            is_known_tag, tag_name, SC_SERIALIZABLE, STREAM_MAGIC, STREAM_VERSION, TC_ARRAY,
            TC_BLOCKDATA, TC_BLOCKDATALONG, TC_CLASS, TC_CLASSDESC, TC_ENDBLOCKDATA, TC_ENUM,
            TC_EXCEPTION, TC_LONGSTRING, TC_NULL, TC_OBJECT, TC_PROXYCLASSDESC, TC_REFERENCE,
            TC_RESET, TC_STRING,
        },
        cursor::ByteCursor,
        handles::{ClassLayout, FieldLayout, HandleEntry, HandleTable},
        models::{
            class_data::{ClassData, FieldValue},
            class_desc::{ClassDesc, ClassDescFlags, ClassPointer, FieldDesc, ProxyClassDesc, StringRef, Utf},
            content::{
                Array, BlockData, ClassValue, Content, EnumConstant, Exception, JavaString, Object,
                Reference,
            },
            serialization::{Serialization, StreamHeader},
            value::{TypeCode, Value},
        },
    },
    util::hex::hexify,
};

/// Smallest encoding of a field descriptor: a type code and an empty name
const MIN_FIELD_DESC_SIZE: usize = 3;
/// Smallest encoding of an interface name: an empty name
const MIN_INTERFACE_NAME_SIZE: usize = 2;

/// Default for [`DecodeOptions::max_depth`], low enough to fit a 2 MiB thread stack in debug builds
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied while decoding untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How deeply records may nest inside each other
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The outcome of reading one declared field
#[derive(Debug)]
enum FieldRead {
    Value(Value),
    /// The class declared the field but its `writeObject` never wrote the default field data
    NoData,
}

/// Contains logic and data used to parse data from a serialization stream
#[derive(Debug)]
pub struct ObjectStreamReader<'a> {
    cursor: ByteCursor<'a>,
    /// Targets of every handle assigned so far
    handles: HandleTable,
    options: DecodeOptions,
    /// How many records we are currently nested inside
    depth: usize,
}

impl<'a> ObjectStreamReader<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self::with_options(stream, DecodeOptions::default())
    }

    pub fn with_options(stream: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            cursor: ByteCursor::new(stream),
            handles: HandleTable::new(),
            options,
            depth: 0,
        }
    }

    /// The handle table as it stands after the records read so far
    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    /// Read and check the magic number and version of a standard stream
    pub fn validate_header(&mut self) -> Result<StreamHeader, StreamError> {
        if self.cursor.remaining() < 4 {
            return Err(StreamError::MalformedHeader(format!(
                "expected 4 header bytes, found {}",
                self.cursor.remaining()
            )));
        }

        let magic = self.cursor.read_u16()?;
        if magic != STREAM_MAGIC {
            return Err(StreamError::MalformedHeader(format!(
                "invalid magic number {}",
                hexify(&magic.to_be_bytes())
            )));
        }

        let version = self.cursor.read_u16()?;
        if version != STREAM_VERSION {
            return Err(StreamError::MalformedHeader(format!(
                "unsupported version {}",
                hexify(&version.to_be_bytes())
            )));
        }

        Ok(StreamHeader { magic, version })
    }

    /// Parse a standard stream: the header, then every record until the end of the input
    pub fn parse(&mut self) -> Result<Serialization, StreamError> {
        let header = self.validate_header()?;
        let contents = self.read_contents()?;
        Ok(Serialization {
            header: Some(header),
            contents,
        })
    }

    /// Parse a stream written without a header, as jdk8u20 gadget payloads are
    pub fn parse_jdk8u20(&mut self) -> Result<Serialization, StreamError> {
        if self.cursor.peek_n(2) == Ok(&STREAM_MAGIC.to_be_bytes()[..]) {
            return Err(StreamError::MalformedHeader(
                "found a standard stream header in a jdk8u20 payload".to_string(),
            ));
        }
        let contents = self.read_contents()?;
        Ok(Serialization {
            header: None,
            contents,
        })
    }

    /// Read top-level records until the input is exhausted; at least one is required
    fn read_contents(&mut self) -> Result<Vec<Content>, StreamError> {
        if self.cursor.is_empty() {
            return Err(StreamError::UnexpectedEnd(self.cursor.current_index(), 1));
        }

        let mut contents = vec![];
        while !self.cursor.is_empty() {
            contents.push(self.read_content()?);
        }
        Ok(contents)
    }

    /// Run `read` one level deeper, failing once the configured depth is exceeded
    fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, StreamError>,
    ) -> Result<T, StreamError> {
        if self.depth >= self.options.max_depth {
            return Err(StreamError::DepthLimitExceeded(
                self.options.max_depth,
                self.cursor.current_index(),
            ));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    /// Read any single record
    pub fn read_content(&mut self) -> Result<Content, StreamError> {
        self.nested(|reader| {
            let offset = reader.cursor.current_index();
            let tag = reader.cursor.peek_byte()?;
            trace!("Reading {} at index {offset}", tag_name(tag));

            match tag {
                TC_NULL => {
                    reader.cursor.read_u8()?;
                    Ok(Content::Null)
                }
                TC_REFERENCE => Ok(Content::Reference(reader.read_reference()?)),
                TC_CLASSDESC | TC_PROXYCLASSDESC => {
                    Ok(Content::ClassDesc(reader.read_class_pointer()?))
                }
                TC_OBJECT => Ok(Content::Object(reader.read_object()?)),
                TC_STRING | TC_LONGSTRING => Ok(Content::String(reader.read_string()?)),
                TC_ARRAY => Ok(Content::Array(reader.read_array()?)),
                TC_CLASS => Ok(Content::Class(reader.read_class()?)),
                TC_BLOCKDATA | TC_BLOCKDATALONG => Ok(Content::BlockData(reader.read_block_data()?)),
                TC_RESET => {
                    reader.read_reset()?;
                    Ok(Content::Reset)
                }
                TC_EXCEPTION => Ok(Content::Exception(reader.read_exception()?)),
                TC_ENUM => Ok(Content::Enum(reader.read_enum()?)),
                TC_ENDBLOCKDATA => Err(StreamError::UnexpectedRecord(tag, offset, "a content record")),
                _ => Err(StreamError::UnknownRecordTag(tag, offset)),
            }
        })
    }

    /// Read a back-reference, which must name an assigned handle
    fn read_reference(&mut self) -> Result<Reference, StreamError> {
        let offset = self.cursor.current_index();
        self.cursor.read_u8()?;
        let handle = self.cursor.read_u32()?;
        self.handles.resolve(handle, offset)?;
        Ok(Reference { handle })
    }

    /// Read the record in a slot that only accepts a class descriptor
    fn read_class_pointer(&mut self) -> Result<ClassPointer, StreamError> {
        self.nested(|reader| {
            let offset = reader.cursor.current_index();
            let tag = reader.cursor.peek_byte()?;
            match tag {
                TC_NULL => {
                    reader.cursor.read_u8()?;
                    Ok(ClassPointer::Null)
                }
                TC_REFERENCE => {
                    let reference = reader.read_reference()?;
                    reader.handles.resolve_class(reference.handle, offset)?;
                    Ok(ClassPointer::Reference(reference))
                }
                TC_CLASSDESC => Ok(ClassPointer::ClassDesc(Box::new(reader.read_class_desc()?))),
                TC_PROXYCLASSDESC => Ok(ClassPointer::Proxy(Box::new(
                    reader.read_proxy_class_desc()?,
                ))),
                _ if is_known_tag(tag) => Err(StreamError::UnexpectedRecord(
                    tag,
                    offset,
                    "a class descriptor",
                )),
                _ => Err(StreamError::UnknownRecordTag(tag, offset)),
            }
        })
    }

    /// Store the layout of a class descriptor once all of it has been read
    fn complete_class(&mut self, handle: u32, layout: ClassLayout) {
        // A reset inside the descriptor's annotation may have handed the handle to another record
        if matches!(
            self.handles.resolve(handle, 0),
            Ok(HandleEntry::PendingClassDesc)
        ) {
            self.handles
                .replace(handle, HandleEntry::ClassDesc(Rc::new(layout)));
        }
    }

    fn read_class_desc(&mut self) -> Result<ClassDesc, StreamError> {
        self.cursor.read_u8()?;
        let handle = self.handles.add(HandleEntry::PendingClassDesc);

        let name = Utf::read(&mut self.cursor)?;
        let serial_version_uid = self.cursor.read_i64()?;
        let flags = ClassDescFlags(self.cursor.read_u8()?);

        let count = usize::from(self.cursor.read_u16()?);
        if count * MIN_FIELD_DESC_SIZE > self.cursor.remaining() {
            return Err(StreamError::UnexpectedEnd(
                self.cursor.current_index(),
                count * MIN_FIELD_DESC_SIZE,
            ));
        }
        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            fields.push(self.read_field_desc()?);
        }

        let annotations = self.read_annotations()?;
        let super_class = self.read_class_pointer()?;

        trace!("Parsed class descriptor {name} with handle {handle:#x}");
        self.complete_class(
            handle,
            ClassLayout {
                name: name.as_str().into_owned(),
                flags,
                fields: fields
                    .iter()
                    .map(|field| FieldLayout {
                        type_code: field.type_code,
                        name: field.name.as_str().into_owned(),
                    })
                    .collect(),
                super_handle: super_class.handle(),
                is_proxy: false,
            },
        );

        Ok(ClassDesc {
            handle,
            name,
            serial_version_uid,
            flags,
            fields,
            annotations,
            super_class,
        })
    }

    fn read_proxy_class_desc(&mut self) -> Result<ProxyClassDesc, StreamError> {
        self.cursor.read_u8()?;
        let handle = self.handles.add(HandleEntry::PendingClassDesc);

        let count_offset = self.cursor.current_index();
        let count = self.cursor.read_i32()?;
        let count = usize::try_from(count)
            .map_err(|_| StreamError::InvalidLength(i64::from(count), count_offset))?;
        if count.saturating_mul(MIN_INTERFACE_NAME_SIZE) > self.cursor.remaining() {
            return Err(StreamError::UnexpectedEnd(
                self.cursor.current_index(),
                count.saturating_mul(MIN_INTERFACE_NAME_SIZE),
            ));
        }
        let mut interfaces = Vec::with_capacity(count);
        for _ in 0..count {
            interfaces.push(Utf::read(&mut self.cursor)?);
        }

        let annotations = self.read_annotations()?;
        let super_class = self.read_class_pointer()?;

        let desc = ProxyClassDesc {
            handle,
            interfaces,
            annotations,
            super_class,
        };
        self.complete_class(
            handle,
            ClassLayout {
                name: desc.display_name(),
                flags: ClassDescFlags(SC_SERIALIZABLE),
                fields: vec![],
                super_handle: desc.super_class.handle(),
                is_proxy: true,
            },
        );
        Ok(desc)
    }

    fn read_field_desc(&mut self) -> Result<FieldDesc, StreamError> {
        let offset = self.cursor.current_index();
        let code = self.cursor.read_u8()?;
        let type_code = TypeCode::from_byte(code).ok_or(StreamError::InvalidTypeCode(code, offset))?;
        let name = Utf::read(&mut self.cursor)?;

        let type_name = if type_code.is_primitive() {
            None
        } else {
            Some(self.read_string_ref()?)
        };

        Ok(FieldDesc {
            type_code,
            name,
            type_name,
        })
    }

    /// Read records until `TC_ENDBLOCKDATA`, consuming the end marker
    fn read_annotations(&mut self) -> Result<Vec<Content>, StreamError> {
        let mut annotations = vec![];
        while self.cursor.peek_byte()? != TC_ENDBLOCKDATA {
            annotations.push(self.read_content()?);
        }
        self.cursor.read_u8()?;
        Ok(annotations)
    }

    fn read_string(&mut self) -> Result<JavaString, StreamError> {
        let long = self.cursor.read_u8()? == TC_LONGSTRING;
        let length = if long {
            let offset = self.cursor.current_index();
            let length = self.cursor.read_u64()?;
            usize::try_from(length).map_err(|_| StreamError::UnexpectedEnd(offset, usize::MAX))?
        } else {
            usize::from(self.cursor.read_u16()?)
        };

        let raw = self.cursor.read_n(length)?.to_vec();
        let handle = self
            .handles
            .add(HandleEntry::String(decode_lossy(&raw).into_owned()));
        Ok(JavaString { handle, long, raw })
    }

    /// Read the record in a slot that only accepts a string
    fn read_string_ref(&mut self) -> Result<StringRef, StreamError> {
        let offset = self.cursor.current_index();
        let tag = self.cursor.peek_byte()?;
        match tag {
            TC_STRING | TC_LONGSTRING => Ok(StringRef::Literal(self.read_string()?)),
            TC_REFERENCE => {
                let reference = self.read_reference()?;
                match self.handles.resolve(reference.handle, offset)? {
                    HandleEntry::String(_) => Ok(StringRef::Reference(reference)),
                    _ => Err(StreamError::UnexpectedRecord(
                        tag,
                        offset,
                        "a reference to a string",
                    )),
                }
            }
            _ if is_known_tag(tag) => Err(StreamError::UnexpectedRecord(tag, offset, "a string")),
            _ => Err(StreamError::UnknownRecordTag(tag, offset)),
        }
    }

    /// Collect the layouts of a class and its superclasses, most derived first
    fn class_chain(&self, handle: u32, offset: usize) -> Result<Vec<Rc<ClassLayout>>, StreamError> {
        let mut chain = vec![];
        let mut next = Some(handle);
        while let Some(handle) = next {
            if chain.len() >= self.handles.len() {
                return Err(StreamError::UnexpectedRecord(
                    TC_REFERENCE,
                    offset,
                    "an acyclic class hierarchy",
                ));
            }
            let layout = self.handles.resolve_class(handle, offset)?;
            next = layout.super_handle;
            chain.push(layout);
        }
        Ok(chain)
    }

    fn read_object(&mut self) -> Result<Object, StreamError> {
        self.cursor.read_u8()?;
        let pointer_offset = self.cursor.current_index();
        let class_pointer = self.read_class_pointer()?;
        let class_handle = class_pointer
            .handle()
            .ok_or(StreamError::UnsupportedClassPointer(TC_NULL, pointer_offset))?;

        let chain = self.class_chain(class_handle, pointer_offset)?;
        let class_name = chain
            .first()
            .map(|layout| layout.name.clone())
            .unwrap_or_default();
        let handle = self.handles.add(HandleEntry::Object(class_name));

        let mut class_data = Vec::with_capacity(chain.len());
        for layout in chain.iter().rev() {
            class_data.push(self.read_class_level(layout)?);
        }

        Ok(Object {
            class_pointer,
            handle,
            class_data,
        })
    }

    /// Read the data written by one class in an object's hierarchy
    fn read_class_level(&mut self, layout: &ClassLayout) -> Result<ClassData, StreamError> {
        let start = self.cursor.current_index();
        if layout.flags.is_externalizable() && !layout.flags.has_block_data() {
            return Err(StreamError::UnsupportedExternalContents(
                layout.name.clone(),
                start,
            ));
        }

        let checkpoint = self.handles.checkpoint();
        let mut fields = Vec::with_capacity(layout.fields.len());
        if layout.flags.is_serializable() {
            for field in &layout.fields {
                match self.read_field_value(field.type_code, layout.flags.has_write_method())? {
                    FieldRead::Value(value) => fields.push(FieldValue {
                        name: field.name.clone(),
                        value,
                    }),
                    FieldRead::NoData => {
                        // Everything the class wrote is in its annotation
                        debug!(
                            "Class {} wrote no field data at index {start}, reading its annotation instead",
                            layout.name
                        );
                        self.cursor.seek(start)?;
                        self.handles.rollback(checkpoint);
                        fields.clear();
                        break;
                    }
                }
            }
        }

        let annotations = if layout.flags.has_object_annotation() {
            Some(self.read_annotations()?)
        } else {
            None
        };

        Ok(ClassData {
            class_name: layout.name.clone(),
            fields,
            annotations,
        })
    }

    /// Read a declared field, detecting a `writeObject` that skipped the default field data
    fn read_field_value(
        &mut self,
        type_code: TypeCode,
        recoverable: bool,
    ) -> Result<FieldRead, StreamError> {
        if recoverable && !type_code.is_primitive() {
            if let Ok(TC_BLOCKDATA | TC_BLOCKDATALONG | TC_ENDBLOCKDATA) = self.cursor.peek_byte() {
                return Ok(FieldRead::NoData);
            }
        }
        self.read_value(type_code).map(FieldRead::Value)
    }

    /// Read a field value or array element
    fn read_value(&mut self, type_code: TypeCode) -> Result<Value, StreamError> {
        if type_code.is_primitive() {
            return Value::read_primitive(&mut self.cursor, type_code);
        }

        let offset = self.cursor.current_index();
        let tag = self.cursor.peek_byte()?;
        match tag {
            TC_NULL | TC_REFERENCE | TC_OBJECT | TC_STRING | TC_LONGSTRING | TC_ARRAY
            | TC_CLASS | TC_ENUM | TC_CLASSDESC | TC_PROXYCLASSDESC | TC_EXCEPTION => {
                let content = Box::new(self.read_content()?);
                Ok(match type_code {
                    TypeCode::Array => Value::Array(content),
                    _ => Value::Object(content),
                })
            }
            _ if is_known_tag(tag) => Err(StreamError::UnexpectedRecord(tag, offset, "an object")),
            _ => Err(StreamError::UnknownRecordTag(tag, offset)),
        }
    }

    fn read_array(&mut self) -> Result<Array, StreamError> {
        self.cursor.read_u8()?;
        let pointer_offset = self.cursor.current_index();
        let class_pointer = self.read_class_pointer()?;

        let class_name = match &class_pointer {
            ClassPointer::Null => {
                return Err(StreamError::UnsupportedClassPointer(TC_NULL, pointer_offset))
            }
            ClassPointer::Proxy(_) => {
                return Err(StreamError::UnsupportedClassPointer(
                    TC_PROXYCLASSDESC,
                    pointer_offset,
                ))
            }
            ClassPointer::ClassDesc(desc) => desc.class_name().into_owned(),
            ClassPointer::Reference(reference) => {
                let layout = self.handles.resolve_class(reference.handle, pointer_offset)?;
                if layout.is_proxy {
                    return Err(StreamError::UnsupportedClassPointer(
                        TC_PROXYCLASSDESC,
                        pointer_offset,
                    ));
                }
                layout.name.clone()
            }
        };

        let element_type = class_name
            .strip_prefix('[')
            .and_then(|rest| rest.bytes().next())
            .and_then(TypeCode::from_byte)
            .ok_or_else(|| StreamError::InvalidArrayElementType(class_name.clone(), pointer_offset))?;

        let handle = self.handles.add(HandleEntry::Array(class_name.clone()));

        let size_offset = self.cursor.current_index();
        let size = self.cursor.read_i32()?;
        let size =
            usize::try_from(size).map_err(|_| StreamError::InvalidLength(i64::from(size), size_offset))?;
        // Object elements take at least one byte each
        let needed = size.saturating_mul(element_type.size().unwrap_or(1));
        if needed > self.cursor.remaining() {
            return Err(StreamError::UnexpectedEnd(self.cursor.current_index(), needed));
        }

        let mut values = Vec::with_capacity(size);
        for _ in 0..size {
            values.push(self.read_value(element_type)?);
        }

        Ok(Array {
            class_pointer,
            handle,
            class_name,
            element_type,
            values,
        })
    }

    fn read_enum(&mut self) -> Result<EnumConstant, StreamError> {
        self.cursor.read_u8()?;
        let pointer_offset = self.cursor.current_index();
        let class_pointer = self.read_class_pointer()?;
        if matches!(class_pointer, ClassPointer::Null) {
            return Err(StreamError::UnsupportedClassPointer(TC_NULL, pointer_offset));
        }

        let handle = self.handles.add(HandleEntry::Enum);
        let constant = self.read_string_ref()?;

        Ok(EnumConstant {
            class_pointer,
            handle,
            constant,
        })
    }

    fn read_class(&mut self) -> Result<ClassValue, StreamError> {
        self.cursor.read_u8()?;
        let pointer_offset = self.cursor.current_index();
        let class_pointer = self.read_class_pointer()?;
        if matches!(class_pointer, ClassPointer::Null) {
            return Err(StreamError::UnsupportedClassPointer(TC_NULL, pointer_offset));
        }

        let handle = self.handles.add(HandleEntry::Class);
        Ok(ClassValue {
            class_pointer,
            handle,
        })
    }

    fn read_block_data(&mut self) -> Result<BlockData, StreamError> {
        let long = self.cursor.read_u8()? == TC_BLOCKDATALONG;
        let length = if long {
            let offset = self.cursor.current_index();
            let length = self.cursor.read_i32()?;
            usize::try_from(length).map_err(|_| StreamError::InvalidLength(i64::from(length), offset))?
        } else {
            usize::from(self.cursor.read_u8()?)
        };

        Ok(BlockData {
            long,
            data: self.cursor.read_n(length)?.to_vec(),
        })
    }

    /// Handle `TC_RESET`, which is only allowed between top-level records
    fn read_reset(&mut self) -> Result<(), StreamError> {
        let offset = self.cursor.current_index();
        if self.depth > 1 {
            return Err(StreamError::UnexpectedRecord(
                TC_RESET,
                offset,
                "a record inside an object",
            ));
        }
        self.cursor.read_u8()?;
        debug!("Resetting {} handles at index {offset}", self.handles.len());
        self.handles.reset();
        Ok(())
    }

    /// Read the throwable written when serialization was aborted; the table is reset before and after it
    fn read_exception(&mut self) -> Result<Exception, StreamError> {
        self.cursor.read_u8()?;
        self.handles.reset();

        let offset = self.cursor.current_index();
        let tag = self.cursor.peek_byte()?;
        if tag != TC_OBJECT {
            return Err(StreamError::UnexpectedRecord(tag, offset, "a throwable object"));
        }
        let throwable = Box::new(self.read_content()?);

        debug!("Read exception record ending at index {}", self.cursor.current_index());
        self.handles.reset();
        Ok(Exception { throwable })
    }
}
