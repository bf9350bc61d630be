// tracevault-thrift - Jaeger and Zipkin Thrift definitions
//
// Pre-generated Thrift code, committed so the build does not depend on the
// Thrift compiler. Sources:
//   jaeger.thrift     - https://github.com/jaegertracing/jaeger-idl/blob/main/thrift/jaeger.thrift
//   zipkincore.thrift - https://github.com/jaegertracing/jaeger-idl/blob/main/thrift/zipkincore.thrift
//
// The decode helpers at the bottom are the only hand-written pieces; they
// wrap the generated structs for the collector's HTTP bodies.

pub use thrift;

pub mod jaeger;
pub mod zipkincore;

use thrift::protocol::{
    TBinaryInputProtocol, TBinaryOutputProtocol, TInputProtocol, TListIdentifier, TOutputProtocol,
    TSerializable, TType,
};

/// Decodes a Jaeger Thrift `Batch` from a binary-protocol body.
pub fn decode_jaeger_batch(body: &[u8]) -> thrift::Result<jaeger::Batch> {
    let mut prot = TBinaryInputProtocol::new(body, true);
    jaeger::Batch::read_from_in_protocol(&mut prot)
}

/// Encodes a Jaeger Thrift `Batch` with the binary protocol.
pub fn encode_jaeger_batch(batch: &jaeger::Batch) -> thrift::Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut prot = TBinaryOutputProtocol::new(&mut buf, true);
        batch.write_to_out_protocol(&mut prot)?;
        prot.flush()?;
    }
    Ok(buf)
}

/// Decodes a Zipkin v1 Thrift body: a bare `list<Span>` in binary protocol.
pub fn decode_zipkin_spans(body: &[u8]) -> thrift::Result<Vec<zipkincore::Span>> {
    let mut prot = TBinaryInputProtocol::new(body, true);
    let list_ident = prot.read_list_begin()?;
    let mut spans = Vec::with_capacity(list_ident.size.max(0) as usize);
    for _ in 0..list_ident.size {
        spans.push(zipkincore::Span::read_from_in_protocol(&mut prot)?);
    }
    prot.read_list_end()?;
    Ok(spans)
}

/// Encodes Zipkin v1 spans as a bare `list<Span>` in binary protocol.
pub fn encode_zipkin_spans(spans: &[zipkincore::Span]) -> thrift::Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut prot = TBinaryOutputProtocol::new(&mut buf, true);
        prot.write_list_begin(&TListIdentifier::new(TType::Struct, spans.len() as i32))?;
        for span in spans {
            span.write_to_out_protocol(&mut prot)?;
        }
        prot.write_list_end()?;
        prot.flush()?;
    }
    Ok(buf)
}
