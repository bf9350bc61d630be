// Autogenerated by Thrift Compiler (0.17.0) from jaeger.thrift
// DO NOT EDIT UNLESS YOU ARE SURE THAT YOU KNOW WHAT YOU ARE DOING

#![allow(dead_code)]
#![allow(unused_imports)]

use thrift::protocol::{
    field_id, verify_required_field_exists, TFieldIdentifier, TInputProtocol, TListIdentifier,
    TOutputProtocol, TSerializable, TStructIdentifier, TType,
};
use thrift::OrderedFloat;

//
// TagType
//

#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TagType(pub i32);

impl TagType {
    pub const STRING: TagType = TagType(0);
    pub const DOUBLE: TagType = TagType(1);
    pub const BOOL: TagType = TagType(2);
    pub const LONG: TagType = TagType(3);
    pub const BINARY: TagType = TagType(4);
    pub const ENUM_VALUES: &'static [Self] = &[
        Self::STRING,
        Self::DOUBLE,
        Self::BOOL,
        Self::LONG,
        Self::BINARY,
    ];
}

impl TSerializable for TagType {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_i32(self.0)
    }
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<TagType> {
        let enum_value = i_prot.read_i32()?;
        Ok(TagType::from(enum_value))
    }
}

impl From<i32> for TagType {
    fn from(i: i32) -> Self {
        TagType(i)
    }
}

impl From<&i32> for TagType {
    fn from(i: &i32) -> Self {
        TagType(*i)
    }
}

impl From<TagType> for i32 {
    fn from(e: TagType) -> i32 {
        e.0
    }
}

impl From<&TagType> for i32 {
    fn from(e: &TagType) -> i32 {
        e.0
    }
}

//
// SpanRefType
//

#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SpanRefType(pub i32);

impl SpanRefType {
    pub const CHILD_OF: SpanRefType = SpanRefType(0);
    pub const FOLLOWS_FROM: SpanRefType = SpanRefType(1);
    pub const ENUM_VALUES: &'static [Self] = &[Self::CHILD_OF, Self::FOLLOWS_FROM];
}

impl TSerializable for SpanRefType {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_i32(self.0)
    }
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<SpanRefType> {
        let enum_value = i_prot.read_i32()?;
        Ok(SpanRefType::from(enum_value))
    }
}

impl From<i32> for SpanRefType {
    fn from(i: i32) -> Self {
        SpanRefType(i)
    }
}

impl From<&i32> for SpanRefType {
    fn from(i: &i32) -> Self {
        SpanRefType(*i)
    }
}

impl From<SpanRefType> for i32 {
    fn from(e: SpanRefType) -> i32 {
        e.0
    }
}

impl From<&SpanRefType> for i32 {
    fn from(e: &SpanRefType) -> i32 {
        e.0
    }
}

//
// Tag
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    pub key: String,
    pub v_type: TagType,
    pub v_str: Option<String>,
    pub v_double: Option<OrderedFloat<f64>>,
    pub v_bool: Option<bool>,
    pub v_long: Option<i64>,
    pub v_binary: Option<Vec<u8>>,
}

impl TSerializable for Tag {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Tag> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<String> = None;
        let mut f_2: Option<TagType> = None;
        let mut f_3: Option<String> = None;
        let mut f_4: Option<OrderedFloat<f64>> = None;
        let mut f_5: Option<bool> = None;
        let mut f_6: Option<i64> = None;
        let mut f_7: Option<Vec<u8>> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = i_prot.read_string()?;
                    f_1 = Some(val);
                }
                2 => {
                    let val = TagType::read_from_in_protocol(i_prot)?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = i_prot.read_string()?;
                    f_3 = Some(val);
                }
                4 => {
                    let val = OrderedFloat::from(i_prot.read_double()?);
                    f_4 = Some(val);
                }
                5 => {
                    let val = i_prot.read_bool()?;
                    f_5 = Some(val);
                }
                6 => {
                    let val = i_prot.read_i64()?;
                    f_6 = Some(val);
                }
                7 => {
                    let val = i_prot.read_bytes()?;
                    f_7 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("Tag.key", &f_1)?;
        verify_required_field_exists("Tag.v_type", &f_2)?;
        let ret = Tag {
            key: f_1.expect("auto-generated code should have checked for presence of required fields"),
            v_type: f_2.expect("auto-generated code should have checked for presence of required fields"),
            v_str: f_3,
            v_double: f_4,
            v_bool: f_5,
            v_long: f_6,
            v_binary: f_7,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Tag");
        o_prot.write_struct_begin(&struct_ident)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("key", TType::String, 1))?;
        o_prot.write_string(&self.key)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("vType", TType::I32, 2))?;
        self.v_type.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        if let Some(ref fld_var) = self.v_str {
            o_prot.write_field_begin(&TFieldIdentifier::new("vStr", TType::String, 3))?;
            o_prot.write_string(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.v_double {
            o_prot.write_field_begin(&TFieldIdentifier::new("vDouble", TType::Double, 4))?;
            o_prot.write_double(fld_var.into())?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.v_bool {
            o_prot.write_field_begin(&TFieldIdentifier::new("vBool", TType::Bool, 5))?;
            o_prot.write_bool(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.v_long {
            o_prot.write_field_begin(&TFieldIdentifier::new("vLong", TType::I64, 6))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.v_binary {
            o_prot.write_field_begin(&TFieldIdentifier::new("vBinary", TType::String, 7))?;
            o_prot.write_bytes(fld_var)?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// Log
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Log {
    pub timestamp: i64,
    pub fields: Vec<Tag>,
}

impl TSerializable for Log {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Log> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i64> = None;
        let mut f_2: Option<Vec<Tag>> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = i_prot.read_i64()?;
                    f_1 = Some(val);
                }
                2 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<Tag> = Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = Tag::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_2 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("Log.timestamp", &f_1)?;
        verify_required_field_exists("Log.fields", &f_2)?;
        let ret = Log {
            timestamp: f_1.expect("auto-generated code should have checked for presence of required fields"),
            fields: f_2.expect("auto-generated code should have checked for presence of required fields"),
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Log");
        o_prot.write_struct_begin(&struct_ident)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("timestamp", TType::I64, 1))?;
        o_prot.write_i64(self.timestamp)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("fields", TType::List, 2))?;
        o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, self.fields.len() as i32))?;
        for e in &self.fields {
            e.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// SpanRef
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SpanRef {
    pub ref_type: SpanRefType,
    pub trace_id_low: i64,
    pub trace_id_high: i64,
    pub span_id: i64,
}

impl TSerializable for SpanRef {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<SpanRef> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<SpanRefType> = None;
        let mut f_2: Option<i64> = None;
        let mut f_3: Option<i64> = None;
        let mut f_4: Option<i64> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = SpanRefType::read_from_in_protocol(i_prot)?;
                    f_1 = Some(val);
                }
                2 => {
                    let val = i_prot.read_i64()?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = i_prot.read_i64()?;
                    f_3 = Some(val);
                }
                4 => {
                    let val = i_prot.read_i64()?;
                    f_4 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("SpanRef.ref_type", &f_1)?;
        verify_required_field_exists("SpanRef.trace_id_low", &f_2)?;
        verify_required_field_exists("SpanRef.trace_id_high", &f_3)?;
        verify_required_field_exists("SpanRef.span_id", &f_4)?;
        let ret = SpanRef {
            ref_type: f_1.expect("auto-generated code should have checked for presence of required fields"),
            trace_id_low: f_2.expect("auto-generated code should have checked for presence of required fields"),
            trace_id_high: f_3.expect("auto-generated code should have checked for presence of required fields"),
            span_id: f_4.expect("auto-generated code should have checked for presence of required fields"),
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("SpanRef");
        o_prot.write_struct_begin(&struct_ident)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("refType", TType::I32, 1))?;
        self.ref_type.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("traceIdLow", TType::I64, 2))?;
        o_prot.write_i64(self.trace_id_low)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("traceIdHigh", TType::I64, 3))?;
        o_prot.write_i64(self.trace_id_high)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("spanId", TType::I64, 4))?;
        o_prot.write_i64(self.span_id)?;
        o_prot.write_field_end()?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// Span
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Span {
    pub trace_id_low: i64,
    pub trace_id_high: i64,
    pub span_id: i64,
    pub parent_span_id: i64,
    pub operation_name: String,
    pub references: Option<Vec<SpanRef>>,
    pub flags: i32,
    pub start_time: i64,
    pub duration: i64,
    pub tags: Option<Vec<Tag>>,
    pub logs: Option<Vec<Log>>,
}

impl TSerializable for Span {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Span> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i64> = None;
        let mut f_2: Option<i64> = None;
        let mut f_3: Option<i64> = None;
        let mut f_4: Option<i64> = None;
        let mut f_5: Option<String> = None;
        let mut f_6: Option<Vec<SpanRef>> = None;
        let mut f_7: Option<i32> = None;
        let mut f_8: Option<i64> = None;
        let mut f_9: Option<i64> = None;
        let mut f_10: Option<Vec<Tag>> = None;
        let mut f_11: Option<Vec<Log>> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = i_prot.read_i64()?;
                    f_1 = Some(val);
                }
                2 => {
                    let val = i_prot.read_i64()?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = i_prot.read_i64()?;
                    f_3 = Some(val);
                }
                4 => {
                    let val = i_prot.read_i64()?;
                    f_4 = Some(val);
                }
                5 => {
                    let val = i_prot.read_string()?;
                    f_5 = Some(val);
                }
                6 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<SpanRef> = Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = SpanRef::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_6 = Some(val);
                }
                7 => {
                    let val = i_prot.read_i32()?;
                    f_7 = Some(val);
                }
                8 => {
                    let val = i_prot.read_i64()?;
                    f_8 = Some(val);
                }
                9 => {
                    let val = i_prot.read_i64()?;
                    f_9 = Some(val);
                }
                10 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<Tag> = Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = Tag::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_10 = Some(val);
                }
                11 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<Log> = Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = Log::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_11 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("Span.trace_id_low", &f_1)?;
        verify_required_field_exists("Span.trace_id_high", &f_2)?;
        verify_required_field_exists("Span.span_id", &f_3)?;
        verify_required_field_exists("Span.parent_span_id", &f_4)?;
        verify_required_field_exists("Span.operation_name", &f_5)?;
        verify_required_field_exists("Span.flags", &f_7)?;
        verify_required_field_exists("Span.start_time", &f_8)?;
        verify_required_field_exists("Span.duration", &f_9)?;
        let ret = Span {
            trace_id_low: f_1.expect("auto-generated code should have checked for presence of required fields"),
            trace_id_high: f_2.expect("auto-generated code should have checked for presence of required fields"),
            span_id: f_3.expect("auto-generated code should have checked for presence of required fields"),
            parent_span_id: f_4.expect("auto-generated code should have checked for presence of required fields"),
            operation_name: f_5.expect("auto-generated code should have checked for presence of required fields"),
            references: f_6,
            flags: f_7.expect("auto-generated code should have checked for presence of required fields"),
            start_time: f_8.expect("auto-generated code should have checked for presence of required fields"),
            duration: f_9.expect("auto-generated code should have checked for presence of required fields"),
            tags: f_10,
            logs: f_11,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Span");
        o_prot.write_struct_begin(&struct_ident)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("traceIdLow", TType::I64, 1))?;
        o_prot.write_i64(self.trace_id_low)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("traceIdHigh", TType::I64, 2))?;
        o_prot.write_i64(self.trace_id_high)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("spanId", TType::I64, 3))?;
        o_prot.write_i64(self.span_id)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("parentSpanId", TType::I64, 4))?;
        o_prot.write_i64(self.parent_span_id)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("operationName", TType::String, 5))?;
        o_prot.write_string(&self.operation_name)?;
        o_prot.write_field_end()?;
        if let Some(ref fld_var) = self.references {
            o_prot.write_field_begin(&TFieldIdentifier::new("references", TType::List, 6))?;
            o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, fld_var.len() as i32))?;
            for e in fld_var {
                e.write_to_out_protocol(o_prot)?;
            }
            o_prot.write_list_end()?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_begin(&TFieldIdentifier::new("flags", TType::I32, 7))?;
        o_prot.write_i32(self.flags)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("startTime", TType::I64, 8))?;
        o_prot.write_i64(self.start_time)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("duration", TType::I64, 9))?;
        o_prot.write_i64(self.duration)?;
        o_prot.write_field_end()?;
        if let Some(ref fld_var) = self.tags {
            o_prot.write_field_begin(&TFieldIdentifier::new("tags", TType::List, 10))?;
            o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, fld_var.len() as i32))?;
            for e in fld_var {
                e.write_to_out_protocol(o_prot)?;
            }
            o_prot.write_list_end()?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.logs {
            o_prot.write_field_begin(&TFieldIdentifier::new("logs", TType::List, 11))?;
            o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, fld_var.len() as i32))?;
            for e in fld_var {
                e.write_to_out_protocol(o_prot)?;
            }
            o_prot.write_list_end()?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// Process
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Process {
    pub service_name: String,
    pub tags: Option<Vec<Tag>>,
}

impl TSerializable for Process {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Process> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<String> = None;
        let mut f_2: Option<Vec<Tag>> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = i_prot.read_string()?;
                    f_1 = Some(val);
                }
                2 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<Tag> = Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = Tag::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_2 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("Process.service_name", &f_1)?;
        let ret = Process {
            service_name: f_1.expect("auto-generated code should have checked for presence of required fields"),
            tags: f_2,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Process");
        o_prot.write_struct_begin(&struct_ident)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("serviceName", TType::String, 1))?;
        o_prot.write_string(&self.service_name)?;
        o_prot.write_field_end()?;
        if let Some(ref fld_var) = self.tags {
            o_prot.write_field_begin(&TFieldIdentifier::new("tags", TType::List, 2))?;
            o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, fld_var.len() as i32))?;
            for e in fld_var {
                e.write_to_out_protocol(o_prot)?;
            }
            o_prot.write_list_end()?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// ClientStats
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClientStats {
    pub full_queue_dropped_spans: i64,
    pub too_large_dropped_spans: i64,
    pub failed_to_emit_spans: i64,
}

impl TSerializable for ClientStats {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<ClientStats> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i64> = None;
        let mut f_2: Option<i64> = None;
        let mut f_3: Option<i64> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = i_prot.read_i64()?;
                    f_1 = Some(val);
                }
                2 => {
                    let val = i_prot.read_i64()?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = i_prot.read_i64()?;
                    f_3 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ClientStats.full_queue_dropped_spans", &f_1)?;
        verify_required_field_exists("ClientStats.too_large_dropped_spans", &f_2)?;
        verify_required_field_exists("ClientStats.failed_to_emit_spans", &f_3)?;
        let ret = ClientStats {
            full_queue_dropped_spans: f_1.expect("auto-generated code should have checked for presence of required fields"),
            too_large_dropped_spans: f_2.expect("auto-generated code should have checked for presence of required fields"),
            failed_to_emit_spans: f_3.expect("auto-generated code should have checked for presence of required fields"),
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("ClientStats");
        o_prot.write_struct_begin(&struct_ident)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("fullQueueDroppedSpans", TType::I64, 1))?;
        o_prot.write_i64(self.full_queue_dropped_spans)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("tooLargeDroppedSpans", TType::I64, 2))?;
        o_prot.write_i64(self.too_large_dropped_spans)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("failedToEmitSpans", TType::I64, 3))?;
        o_prot.write_i64(self.failed_to_emit_spans)?;
        o_prot.write_field_end()?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// Batch
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Batch {
    pub process: Process,
    pub spans: Vec<Span>,
    pub seq_no: Option<i64>,
    pub stats: Option<ClientStats>,
}

impl TSerializable for Batch {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Batch> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<Process> = None;
        let mut f_2: Option<Vec<Span>> = None;
        let mut f_3: Option<i64> = None;
        let mut f_4: Option<ClientStats> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = Process::read_from_in_protocol(i_prot)?;
                    f_1 = Some(val);
                }
                2 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<Span> = Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = Span::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = i_prot.read_i64()?;
                    f_3 = Some(val);
                }
                4 => {
                    let val = ClientStats::read_from_in_protocol(i_prot)?;
                    f_4 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("Batch.process", &f_1)?;
        verify_required_field_exists("Batch.spans", &f_2)?;
        let ret = Batch {
            process: f_1.expect("auto-generated code should have checked for presence of required fields"),
            spans: f_2.expect("auto-generated code should have checked for presence of required fields"),
            seq_no: f_3,
            stats: f_4,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Batch");
        o_prot.write_struct_begin(&struct_ident)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("process", TType::Struct, 1))?;
        self.process.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("spans", TType::List, 2))?;
        o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, self.spans.len() as i32))?;
        for e in &self.spans {
            e.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        if let Some(fld_var) = self.seq_no {
            o_prot.write_field_begin(&TFieldIdentifier::new("seqNo", TType::I64, 3))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.stats {
            o_prot.write_field_begin(&TFieldIdentifier::new("stats", TType::Struct, 4))?;
            fld_var.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}
