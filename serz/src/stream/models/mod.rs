pub mod class_data;
pub mod class_desc;
pub mod content;
pub mod serialization;
pub mod value;

pub use class_data::{ClassData, FieldValue};
pub use class_desc::{ClassDesc, ClassDescFlags, ClassPointer, FieldDesc, ProxyClassDesc, StringRef, Utf};
pub use content::{
    Array, BlockData, ClassValue, Content, EnumConstant, Exception, JavaString, Object, Reference,
};
pub use serialization::{Serialization, StreamHeader};
pub use value::{TypeCode, Value};
