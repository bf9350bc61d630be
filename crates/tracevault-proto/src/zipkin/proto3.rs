// Generated from zipkin proto (https://github.com/openzipkin/zipkin-api/blob/master/zipkin.proto)
// DO NOT EDIT

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Span {
    #[prost(bytes = "vec", tag = "1")]
    pub trace_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub parent_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub id: ::prost::alloc::vec::Vec<u8>,
    #[prost(enumeration = "span::Kind", tag = "4")]
    pub kind: i32,
    #[prost(string, tag = "5")]
    pub name: ::prost::alloc::string::String,
    /// Epoch microseconds of the start of this span.
    #[prost(fixed64, tag = "6")]
    pub timestamp: u64,
    /// Duration in microseconds of the critical path, if known.
    #[prost(uint64, tag = "7")]
    pub duration: u64,
    #[prost(message, optional, tag = "8")]
    pub local_endpoint: ::core::option::Option<Endpoint>,
    #[prost(message, optional, tag = "9")]
    pub remote_endpoint: ::core::option::Option<Endpoint>,
    #[prost(message, repeated, tag = "10")]
    pub annotations: ::prost::alloc::vec::Vec<Annotation>,
    #[prost(map = "string, string", tag = "11")]
    pub tags: ::std::collections::HashMap<
        ::prost::alloc::string::String,
        ::prost::alloc::string::String,
    >,
    #[prost(bool, tag = "12")]
    pub debug: bool,
    #[prost(bool, tag = "13")]
    pub shared: bool,
}
/// Nested message and enum types in `Span`.
pub mod span {
    /// When present, kind clarifies timestamp, duration and remote_endpoint.
    /// When absent, the span is local or incomplete.
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Kind {
        SpanKindUnspecified = 0,
        Client = 1,
        Server = 2,
        Producer = 3,
        Consumer = 4,
    }
    impl Kind {
        /// String value of the enum field names used in the ProtoBuf definition.
        ///
        /// The values are not transformed in any way and thus are considered stable
        /// (if the ProtoBuf definition does not change) and safe for programmatic use.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::SpanKindUnspecified => "SPAN_KIND_UNSPECIFIED",
                Self::Client => "CLIENT",
                Self::Server => "SERVER",
                Self::Producer => "PRODUCER",
                Self::Consumer => "CONSUMER",
            }
        }
        /// Creates an enum from field names used in the ProtoBuf definition.
        pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
            match value {
                "SPAN_KIND_UNSPECIFIED" => Some(Self::SpanKindUnspecified),
                "CLIENT" => Some(Self::Client),
                "SERVER" => Some(Self::Server),
                "PRODUCER" => Some(Self::Producer),
                "CONSUMER" => Some(Self::Consumer),
                _ => None,
            }
        }
    }
}
/// The network context of a node in the service graph.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Endpoint {
    #[prost(string, tag = "1")]
    pub service_name: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub ipv4: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub ipv6: ::prost::alloc::vec::Vec<u8>,
    #[prost(int32, tag = "4")]
    pub port: i32,
}
/// Associates an event that explains latency with a timestamp.
/// Unlike log statements, annotations are often codes. Ex. "ws" for WireSend
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Annotation {
    /// Epoch microseconds of this event.
    #[prost(fixed64, tag = "1")]
    pub timestamp: u64,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
}
/// A list of spans with possibly different trace ids, in no particular order.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListOfSpans {
    #[prost(message, repeated, tag = "1")]
    pub spans: ::prost::alloc::vec::Vec<Span>,
}
