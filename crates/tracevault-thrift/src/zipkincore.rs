// Autogenerated by Thrift Compiler (0.17.0) from zipkincore.thrift
// DO NOT EDIT UNLESS YOU ARE SURE THAT YOU KNOW WHAT YOU ARE DOING

#![allow(dead_code)]
#![allow(unused_imports)]

use thrift::protocol::{
    field_id, verify_required_field_exists, TFieldIdentifier, TInputProtocol, TListIdentifier,
    TOutputProtocol, TSerializable, TStructIdentifier, TType,
};

pub const CLIENT_SEND: &str = "cs";

pub const CLIENT_RECV: &str = "cr";

pub const SERVER_SEND: &str = "ss";

pub const SERVER_RECV: &str = "sr";

pub const MESSAGE_SEND: &str = "ms";

pub const MESSAGE_RECV: &str = "mr";

pub const LOCAL_COMPONENT: &str = "lc";

//
// AnnotationType
//

#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AnnotationType(pub i32);

impl AnnotationType {
    pub const BOOL: AnnotationType = AnnotationType(0);
    pub const BYTES: AnnotationType = AnnotationType(1);
    pub const I16: AnnotationType = AnnotationType(2);
    pub const I32: AnnotationType = AnnotationType(3);
    pub const I64: AnnotationType = AnnotationType(4);
    pub const DOUBLE: AnnotationType = AnnotationType(5);
    pub const STRING: AnnotationType = AnnotationType(6);
    pub const ENUM_VALUES: &'static [Self] = &[
        Self::BOOL,
        Self::BYTES,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::DOUBLE,
        Self::STRING,
    ];
}

impl TSerializable for AnnotationType {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_i32(self.0)
    }
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<AnnotationType> {
        let enum_value = i_prot.read_i32()?;
        Ok(AnnotationType::from(enum_value))
    }
}

impl From<i32> for AnnotationType {
    fn from(i: i32) -> Self {
        AnnotationType(i)
    }
}

impl From<&i32> for AnnotationType {
    fn from(i: &i32) -> Self {
        AnnotationType(*i)
    }
}

impl From<AnnotationType> for i32 {
    fn from(e: AnnotationType) -> i32 {
        e.0
    }
}

impl From<&AnnotationType> for i32 {
    fn from(e: &AnnotationType) -> i32 {
        e.0
    }
}

//
// Endpoint
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Endpoint {
    pub ipv4: Option<i32>,
    pub port: Option<i16>,
    pub service_name: Option<String>,
    pub ipv6: Option<Vec<u8>>,
}

impl TSerializable for Endpoint {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Endpoint> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i32> = None;
        let mut f_2: Option<i16> = None;
        let mut f_3: Option<String> = None;
        let mut f_4: Option<Vec<u8>> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => {
                    let val = i_prot.read_i32()?;
                    f_1 = Some(val);
                }
                2 => {
                    let val = i_prot.read_i16()?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = i_prot.read_string()?;
                    f_3 = Some(val);
                }
                4 => {
                    let val = i_prot.read_bytes()?;
                    f_4 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        let ret = Endpoint {
            ipv4: f_1,
            port: f_2,
            service_name: f_3,
            ipv6: f_4,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Endpoint");
        o_prot.write_struct_begin(&struct_ident)?;
        if let Some(fld_var) = self.ipv4 {
            o_prot.write_field_begin(&TFieldIdentifier::new("ipv4", TType::I32, 1))?;
            o_prot.write_i32(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.port {
            o_prot.write_field_begin(&TFieldIdentifier::new("port", TType::I16, 2))?;
            o_prot.write_i16(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.service_name {
            o_prot.write_field_begin(&TFieldIdentifier::new("service_name", TType::String, 3))?;
            o_prot.write_string(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.ipv6 {
            o_prot.write_field_begin(&TFieldIdentifier::new("ipv6", TType::String, 4))?;
            o_prot.write_bytes(fld_var)?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// Annotation
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Annotation {
    pub timestamp: Option<i64>,
    pub value: Option<String>,
    pub host: Option<Endpoint>,
}

impl TSerializable for Annotation {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Annotation> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i64> = None;
        let mut f_2: Option<String> = None;
        let mut f_3: Option<Endpoint> = None;
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
                    let val = i_prot.read_string()?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = Endpoint::read_from_in_protocol(i_prot)?;
                    f_3 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        let ret = Annotation {
            timestamp: f_1,
            value: f_2,
            host: f_3,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Annotation");
        o_prot.write_struct_begin(&struct_ident)?;
        if let Some(fld_var) = self.timestamp {
            o_prot.write_field_begin(&TFieldIdentifier::new("timestamp", TType::I64, 1))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.value {
            o_prot.write_field_begin(&TFieldIdentifier::new("value", TType::String, 2))?;
            o_prot.write_string(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.host {
            o_prot.write_field_begin(&TFieldIdentifier::new("host", TType::Struct, 3))?;
            fld_var.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// BinaryAnnotation
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BinaryAnnotation {
    pub key: Option<String>,
    pub value: Option<Vec<u8>>,
    pub annotation_type: Option<AnnotationType>,
    pub host: Option<Endpoint>,
}

impl TSerializable for BinaryAnnotation {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<BinaryAnnotation> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<String> = None;
        let mut f_2: Option<Vec<u8>> = None;
        let mut f_3: Option<AnnotationType> = None;
        let mut f_4: Option<Endpoint> = None;
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
                    let val = i_prot.read_bytes()?;
                    f_2 = Some(val);
                }
                3 => {
                    let val = AnnotationType::read_from_in_protocol(i_prot)?;
                    f_3 = Some(val);
                }
                4 => {
                    let val = Endpoint::read_from_in_protocol(i_prot)?;
                    f_4 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        let ret = BinaryAnnotation {
            key: f_1,
            value: f_2,
            annotation_type: f_3,
            host: f_4,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("BinaryAnnotation");
        o_prot.write_struct_begin(&struct_ident)?;
        if let Some(ref fld_var) = self.key {
            o_prot.write_field_begin(&TFieldIdentifier::new("key", TType::String, 1))?;
            o_prot.write_string(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.value {
            o_prot.write_field_begin(&TFieldIdentifier::new("value", TType::String, 2))?;
            o_prot.write_bytes(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.annotation_type {
            o_prot.write_field_begin(&TFieldIdentifier::new("annotation_type", TType::I32, 3))?;
            fld_var.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.host {
            o_prot.write_field_begin(&TFieldIdentifier::new("host", TType::Struct, 4))?;
            fld_var.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

//
// Span
//

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Span {
    pub trace_id: Option<i64>,
    pub name: Option<String>,
    pub id: Option<i64>,
    pub parent_id: Option<i64>,
    pub annotations: Option<Vec<Annotation>>,
    pub binary_annotations: Option<Vec<BinaryAnnotation>>,
    pub debug: Option<bool>,
    pub timestamp: Option<i64>,
    pub duration: Option<i64>,
    pub trace_id_high: Option<i64>,
}

impl TSerializable for Span {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Span> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i64> = None;
        let mut f_3: Option<String> = None;
        let mut f_4: Option<i64> = None;
        let mut f_5: Option<i64> = None;
        let mut f_6: Option<Vec<Annotation>> = None;
        let mut f_8: Option<Vec<BinaryAnnotation>> = None;
        let mut f_9: Option<bool> = None;
        let mut f_10: Option<i64> = None;
        let mut f_11: Option<i64> = None;
        let mut f_12: Option<i64> = None;
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
                3 => {
                    let val = i_prot.read_string()?;
                    f_3 = Some(val);
                }
                4 => {
                    let val = i_prot.read_i64()?;
                    f_4 = Some(val);
                }
                5 => {
                    let val = i_prot.read_i64()?;
                    f_5 = Some(val);
                }
                6 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<Annotation> = Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = Annotation::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_6 = Some(val);
                }
                8 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut val: Vec<BinaryAnnotation> =
                        Vec::with_capacity(list_ident.size as usize);
                    for _ in 0..list_ident.size {
                        let list_elem = BinaryAnnotation::read_from_in_protocol(i_prot)?;
                        val.push(list_elem);
                    }
                    i_prot.read_list_end()?;
                    f_8 = Some(val);
                }
                9 => {
                    let val = i_prot.read_bool()?;
                    f_9 = Some(val);
                }
                10 => {
                    let val = i_prot.read_i64()?;
                    f_10 = Some(val);
                }
                11 => {
                    let val = i_prot.read_i64()?;
                    f_11 = Some(val);
                }
                12 => {
                    let val = i_prot.read_i64()?;
                    f_12 = Some(val);
                }
                _ => {
                    i_prot.skip(field_ident.field_type)?;
                }
            };
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        let ret = Span {
            trace_id: f_1,
            name: f_3,
            id: f_4,
            parent_id: f_5,
            annotations: f_6,
            binary_annotations: f_8,
            debug: f_9,
            timestamp: f_10,
            duration: f_11,
            trace_id_high: f_12,
        };
        Ok(ret)
    }
    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        let struct_ident = TStructIdentifier::new("Span");
        o_prot.write_struct_begin(&struct_ident)?;
        if let Some(fld_var) = self.trace_id {
            o_prot.write_field_begin(&TFieldIdentifier::new("trace_id", TType::I64, 1))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.name {
            o_prot.write_field_begin(&TFieldIdentifier::new("name", TType::String, 3))?;
            o_prot.write_string(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.id {
            o_prot.write_field_begin(&TFieldIdentifier::new("id", TType::I64, 4))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.parent_id {
            o_prot.write_field_begin(&TFieldIdentifier::new("parent_id", TType::I64, 5))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.annotations {
            o_prot.write_field_begin(&TFieldIdentifier::new("annotations", TType::List, 6))?;
            o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, fld_var.len() as i32))?;
            for e in fld_var {
                e.write_to_out_protocol(o_prot)?;
            }
            o_prot.write_list_end()?;
            o_prot.write_field_end()?
        }
        if let Some(ref fld_var) = self.binary_annotations {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "binary_annotations",
                TType::List,
                8,
            ))?;
            o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, fld_var.len() as i32))?;
            for e in fld_var {
                e.write_to_out_protocol(o_prot)?;
            }
            o_prot.write_list_end()?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.debug {
            o_prot.write_field_begin(&TFieldIdentifier::new("debug", TType::Bool, 9))?;
            o_prot.write_bool(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.timestamp {
            o_prot.write_field_begin(&TFieldIdentifier::new("timestamp", TType::I64, 10))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.duration {
            o_prot.write_field_begin(&TFieldIdentifier::new("duration", TType::I64, 11))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        if let Some(fld_var) = self.trace_id_high {
            o_prot.write_field_begin(&TFieldIdentifier::new("trace_id_high", TType::I64, 12))?;
            o_prot.write_i64(fld_var)?;
            o_prot.write_field_end()?
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}
