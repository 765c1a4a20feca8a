//! Hand-written prost types for the pbf container and block schemas.
//!
//! These mirror the fixed wire contracts (fileformat + osmformat). Fields
//! the format marks required are optional here; presence is validated by
//! the decoder so a missing field becomes a typed error instead of a
//! prost decode failure.

/// Envelope preceding every blob: a type tag plus the byte length of the
/// blob message that follows.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlobHeader {
  #[prost(string, optional, tag = "1")]
  pub r#type: Option<String>,
  #[prost(bytes = "vec", optional, tag = "2")]
  pub indexdata: Option<Vec<u8>>,
  #[prost(int32, optional, tag = "3")]
  pub datasize: Option<i32>,
}

/// Compressed payload container. Exactly one data field is expected;
/// only `zlib_data` is a supported encoding.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Blob {
  #[prost(bytes = "vec", optional, tag = "1")]
  pub raw: Option<Vec<u8>>,
  #[prost(int32, optional, tag = "2")]
  pub raw_size: Option<i32>,
  #[prost(bytes = "vec", optional, tag = "3")]
  pub zlib_data: Option<Vec<u8>>,
  #[prost(bytes = "vec", optional, tag = "4")]
  pub lzma_data: Option<Vec<u8>>,
  #[prost(bytes = "vec", optional, tag = "5")]
  pub bzip2_data: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeaderBlock {
  #[prost(string, repeated, tag = "4")]
  pub required_features: Vec<String>,
  #[prost(string, repeated, tag = "5")]
  pub optional_features: Vec<String>,
  #[prost(int32, optional, tag = "17")]
  pub granularity: Option<i32>,
  #[prost(int32, optional, tag = "18")]
  pub date_granularity: Option<i32>,
  #[prost(int64, optional, tag = "19")]
  pub lat_offset: Option<i64>,
  #[prost(int64, optional, tag = "20")]
  pub lon_offset: Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringTable {
  #[prost(bytes = "vec", repeated, tag = "1")]
  pub s: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrimitiveBlock {
  #[prost(message, optional, tag = "1")]
  pub stringtable: Option<StringTable>,
  #[prost(message, repeated, tag = "2")]
  pub primitivegroup: Vec<PrimitiveGroup>,
}

/// At most one populated variant per group.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrimitiveGroup {
  #[prost(message, repeated, tag = "1")]
  pub nodes: Vec<Node>,
  #[prost(message, optional, tag = "2")]
  pub dense: Option<DenseNodes>,
  #[prost(message, repeated, tag = "3")]
  pub ways: Vec<Way>,
  #[prost(message, repeated, tag = "4")]
  pub relations: Vec<Relation>,
  #[prost(message, repeated, tag = "5")]
  pub changesets: Vec<ChangeSet>,
}

/// Plain (non-dense) node records. Decoded for the group-kind diagnostic
/// but not converted to output entities.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Node {
  #[prost(sint64, optional, tag = "1")]
  pub id: Option<i64>,
  #[prost(uint32, repeated, tag = "2")]
  pub keys: Vec<u32>,
  #[prost(uint32, repeated, tag = "3")]
  pub vals: Vec<u32>,
  #[prost(message, optional, tag = "4")]
  pub info: Option<Info>,
  #[prost(sint64, optional, tag = "8")]
  pub lat: Option<i64>,
  #[prost(sint64, optional, tag = "9")]
  pub lon: Option<i64>,
}

/// Columnar node encoding. `id`/`lat`/`lon` are deltas against a running
/// sum; `keys_vals` is a flattened key/value index list, each node's tags
/// terminated by a literal 0.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DenseNodes {
  #[prost(sint64, repeated, tag = "1")]
  pub id: Vec<i64>,
  #[prost(message, optional, tag = "5")]
  pub denseinfo: Option<DenseInfo>,
  #[prost(sint64, repeated, tag = "8")]
  pub lat: Vec<i64>,
  #[prost(sint64, repeated, tag = "9")]
  pub lon: Vec<i64>,
  #[prost(int32, repeated, tag = "10")]
  pub keys_vals: Vec<i32>,
}

/// Metadata columns parallel to `DenseNodes`. All columns but `version`
/// and `visible` are delta-encoded.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DenseInfo {
  #[prost(int32, repeated, tag = "1")]
  pub version: Vec<i32>,
  #[prost(sint64, repeated, tag = "2")]
  pub timestamp: Vec<i64>,
  #[prost(sint64, repeated, tag = "3")]
  pub changeset: Vec<i64>,
  #[prost(sint32, repeated, tag = "4")]
  pub uid: Vec<i32>,
  #[prost(sint32, repeated, tag = "5")]
  pub user_sid: Vec<i32>,
  #[prost(bool, repeated, tag = "6")]
  pub visible: Vec<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Way {
  #[prost(int64, optional, tag = "1")]
  pub id: Option<i64>,
  #[prost(uint32, repeated, tag = "2")]
  pub keys: Vec<u32>,
  #[prost(uint32, repeated, tag = "3")]
  pub vals: Vec<u32>,
  #[prost(message, optional, tag = "4")]
  pub info: Option<Info>,
  #[prost(sint64, repeated, tag = "8")]
  pub refs: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Relation {
  #[prost(int64, optional, tag = "1")]
  pub id: Option<i64>,
  #[prost(uint32, repeated, tag = "2")]
  pub keys: Vec<u32>,
  #[prost(uint32, repeated, tag = "3")]
  pub vals: Vec<u32>,
  #[prost(message, optional, tag = "4")]
  pub info: Option<Info>,
  #[prost(int32, repeated, tag = "8")]
  pub roles_sid: Vec<i32>,
  #[prost(sint64, repeated, tag = "9")]
  pub memids: Vec<i64>,
  #[prost(int32, repeated, tag = "10")]
  pub types: Vec<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Info {
  #[prost(int32, optional, tag = "1")]
  pub version: Option<i32>,
  #[prost(int64, optional, tag = "2")]
  pub timestamp: Option<i64>,
  #[prost(int64, optional, tag = "3")]
  pub changeset: Option<i64>,
  #[prost(int32, optional, tag = "4")]
  pub uid: Option<i32>,
  #[prost(uint32, optional, tag = "5")]
  pub user_sid: Option<u32>,
  #[prost(bool, optional, tag = "6")]
  pub visible: Option<bool>,
}

/// Changeset records exist on the wire but produce no output entities.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChangeSet {
  #[prost(int64, optional, tag = "1")]
  pub id: Option<i64>,
}
