// tracevault-proto - Jaeger and Zipkin protobuf definitions
//
// Pre-generated protobuf code, committed so the build does not depend on
// protoc. Sources:
//   jaeger.api_v2  - https://github.com/jaegertracing/jaeger-idl/tree/main/proto/api_v2
//   zipkin.proto3  - https://github.com/openzipkin/zipkin-api/blob/master/zipkin.proto
//
// OTLP definitions are NOT here; those come from the opentelemetry-proto
// crate, which ships its own tonic codegen.

pub mod jaeger {
    pub mod api_v2;
}

pub mod zipkin {
    pub mod proto3;
}
