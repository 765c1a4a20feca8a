//! Fixture builders: encode blocks with the crate's own prost types,
//! deflate them and wrap them in the size-prefixed blob framing.

use osm_pbf_stream::proto;
use prost::Message;
use std::io::Write;

pub fn zlib(raw: &[u8]) -> Vec<u8> {
  let mut encoder = flate2::write::ZlibEncoder::new(
    Vec::new(),
    flate2::Compression::default(),
  );
  encoder.write_all(raw).unwrap();
  encoder.finish().unwrap()
}

/// One wire frame: 4-byte big-endian header length, blob header, blob.
pub fn frame(blob_type: &str, blob_bytes: &[u8]) -> Vec<u8> {
  let header = proto::BlobHeader {
    r#type: Some(blob_type.to_string()),
    indexdata: None,
    datasize: Some(blob_bytes.len() as i32),
  };
  let header_bytes = header.encode_to_vec();
  let mut out = (header_bytes.len() as u32).to_be_bytes().to_vec();
  out.extend_from_slice(&header_bytes);
  out.extend_from_slice(blob_bytes);
  out
}

/// A frame whose blob carries the given block bytes as zlib data.
pub fn zlib_frame(blob_type: &str, block_bytes: &[u8]) -> Vec<u8> {
  let blob = proto::Blob {
    raw: None,
    raw_size: Some(block_bytes.len() as i32),
    zlib_data: Some(zlib(block_bytes)),
    lzma_data: None,
    bzip2_data: None,
  };
  frame(blob_type, &blob.encode_to_vec())
}

pub fn header_frame(required_features: &[&str]) -> Vec<u8> {
  let block = proto::HeaderBlock {
    required_features: required_features.iter().map(|f| f.to_string()).collect(),
    ..Default::default()
  };
  zlib_frame("OSMHeader", &block.encode_to_vec())
}

pub fn data_frame(block: &proto::PrimitiveBlock) -> Vec<u8> {
  zlib_frame("OSMData", &block.encode_to_vec())
}

pub fn string_table(entries: &[&str]) -> proto::StringTable {
  proto::StringTable {
    s: entries.iter().map(|e| e.as_bytes().to_vec()).collect(),
  }
}

pub fn block_with_groups(
  entries: &[&str],
  groups: Vec<proto::PrimitiveGroup>,
) -> proto::PrimitiveBlock {
  proto::PrimitiveBlock {
    stringtable: Some(string_table(entries)),
    primitivegroup: groups,
  }
}

pub fn dense_group(dense: proto::DenseNodes) -> proto::PrimitiveGroup {
  proto::PrimitiveGroup { dense: Some(dense), ..Default::default() }
}
