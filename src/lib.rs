//! # osm-pbf-stream
//!
//! streaming async osm pbf decoder
//!
//! Reassembles the length-prefixed blob framing of an osm pbf byte stream,
//! inflates each blob and decodes it into batches of [`Element`] values
//! (nodes, ways, relations), one batch per non-empty OSMData blob.
//!
//! # example
//!
//! ``` rust,no_run
//! use async_std::{prelude::*,fs::File,io};
//!
//! type Error = Box<dyn std::error::Error+Send+Sync>;
//! type R = Box<dyn io::Read+Unpin>;
//!
//! #[async_std::main]
//! async fn main() -> Result<(),Error> {
//!   let args = std::env::args().collect::<Vec<String>>();
//!   let infile: R = match args.get(1).unwrap_or(&"-".into()).as_str() {
//!     "-" => Box::new(io::stdin()),
//!     x => Box::new(File::open(x).await?),
//!   };
//!   let mut stream = osm_pbf_stream::decode(infile);
//!   while let Some(result) = stream.next().await {
//!     for element in result? {
//!       println!["{:?}", element];
//!     }
//!   }
//!   Ok(())
//! }
//! ```

use async_std::{prelude::*,stream::Stream,io};
use prost::Message;
use std::collections::VecDeque;
use tracing::trace;

mod codec;
mod data;
pub use data::*;
pub mod parse;
pub mod proto;

/// One decoded batch (the entities of one OSMData blob) or one error.
pub type DecodeItem = Result<Vec<Element>,DecodeError>;
pub type DecodeStream = std::pin::Pin<Box<dyn Stream<Item=DecodeItem>>>;

/// Feature flag that permits `visible` metadata on entities.
pub const HISTORICAL_INFORMATION: &str = "HistoricalInformation";

#[derive(Clone,PartialEq,Debug)]
enum State { Size(), Header(), Payload(), End() }

#[derive(thiserror::Error)]
pub enum DecodeError {
  #[error("malformed blob header at byte {offset}")]
  MalformedFrame {
    offset: u64,
    #[source] source: prost::DecodeError,
  },
  #[error("blob header at byte {offset} has a missing or invalid {field}")]
  SchemaViolation {
    offset: u64,
    field: &'static str,
  },
  #[error("stream ended with {remaining} byte(s) of an incomplete frame at byte {offset}")]
  Truncated {
    offset: u64,
    remaining: usize,
  },
  #[error("stream read error")]
  Read { #[source] source: std::io::Error },
  #[error("no zlib data in {blob_type} blob at byte {offset}, \
    possibly unimplemented raw/lzma/bzip2 data")]
  UnsupportedEncoding {
    offset: u64,
    blob_type: String,
  },
  #[error("failed to inflate {blob_type} blob at byte {offset}")]
  Decompression {
    offset: u64,
    blob_type: String,
    #[source] source: std::io::Error,
  },
  #[error("malformed block in {blob_type} blob at byte {offset}")]
  MalformedBlock {
    offset: u64,
    blob_type: String,
    #[source] source: prost::DecodeError,
  },
  #[error("string table entry {index} is not valid utf-8")]
  InvalidStringTable {
    index: usize,
    #[source] source: std::str::Utf8Error,
  },
}

impl std::fmt::Debug for DecodeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    std::fmt::Display::fmt(self, f)
  }
}

impl DecodeError {
  /// Structural errors lose byte alignment and end the stream; content
  /// errors are scoped to one frame or block and parsing continues at the
  /// next frame.
  pub fn is_fatal(&self) -> bool {
    matches!(self,
      Self::MalformedFrame { .. }
      | Self::SchemaViolation { .. }
      | Self::Truncated { .. }
      | Self::Read { .. })
  }
}

/// Scaling and feature state taken from the most recent OSMHeader blob,
/// applied to every subsequent OSMData blob in the same stream. Private per
/// parser instance.
#[derive(Clone,PartialEq,Debug)]
pub struct HeaderState {
  pub granularity: i32,
  pub date_granularity: i32,
  pub lat_offset: i64,
  pub lon_offset: i64,
  pub historical_information: bool,
}

impl Default for HeaderState {
  fn default() -> Self {
    Self {
      granularity: 100,
      date_granularity: 1000,
      lat_offset: 0,
      lon_offset: 0,
      historical_information: false,
    }
  }
}

impl HeaderState {
  fn from_block(block: &proto::HeaderBlock) -> Self {
    Self {
      // a zero granularity falls back to the default
      granularity: match block.granularity { Some(g) if g != 0 => g, _ => 100 },
      date_granularity: match block.date_granularity {
        Some(g) if g != 0 => g,
        _ => 1000,
      },
      lat_offset: block.lat_offset.unwrap_or(0),
      lon_offset: block.lon_offset.unwrap_or(0),
      historical_information: block.required_features.iter()
        .any(|f| f == HISTORICAL_INFORMATION),
    }
  }
}

/// Push-based frame reassembler. Feed it a contiguous byte stream in chunks
/// of arbitrary size; a chunk may end mid-frame (the remainder is carried
/// over) or span several frames (all are drained before returning).
///
/// The 4-byte big-endian size prefix and the blob header's datasize are
/// trusted as-is; callers decoding untrusted input should bound their
/// chunk source themselves.
pub struct Parser {
  state: State,
  waiting: usize,
  carry: Vec<u8>,
  pending: Option<String>,
  header: HeaderState,
  offset: u64,
  size_offset: u64,
}

impl Parser {
  pub fn new() -> Self {
    Self {
      state: State::Size(),
      waiting: 4,
      carry: vec![],
      pending: None,
      header: HeaderState::default(),
      offset: 0,
      size_offset: 0,
    }
  }

  /// Cumulative bytes consumed from the stream, for diagnostics.
  pub fn offset(&self) -> u64 {
    self.offset
  }

  /// Consume one chunk and return every item it completes, in frame order.
  /// A fatal error is always the last item; afterwards the parser ignores
  /// all further input.
  pub fn feed(&mut self, chunk: &[u8]) -> Vec<DecodeItem> {
    let mut out = vec![];
    if self.state == State::End() || chunk.is_empty() {
      return out;
    }
    let mut available = std::mem::take(&mut self.carry);
    available.extend_from_slice(chunk);
    let mut buf = &available[..];
    loop {
      if buf.len() < self.waiting {
        self.carry = buf.to_vec();
        return out;
      }
      match self.state {
        State::Size() => {
          let len = u32::from_be_bytes([buf[0],buf[1],buf[2],buf[3]]) as usize;
          trace!("blob header size {} at byte {}", len, self.offset);
          self.size_offset = self.offset;
          self.offset += 4;
          self.state = State::Header();
          self.waiting = len;
          buf = &buf[4..];
        },
        State::Header() => {
          let take = self.waiting;
          let header = match proto::BlobHeader::decode(&buf[..take]) {
            Ok(h) => h,
            Err(source) => {
              out.push(Err(DecodeError::MalformedFrame {
                offset: self.size_offset,
                source,
              }));
              self.state = State::End();
              return out;
            },
          };
          let datasize = match header.datasize {
            Some(d) if d >= 0 => d as usize,
            _ => {
              out.push(Err(DecodeError::SchemaViolation {
                offset: self.size_offset,
                field: "datasize",
              }));
              self.state = State::End();
              return out;
            },
          };
          let blob_type = match header.r#type {
            Some(t) => t,
            None => {
              out.push(Err(DecodeError::SchemaViolation {
                offset: self.size_offset,
                field: "type",
              }));
              self.state = State::End();
              return out;
            },
          };
          trace!("blob header type {} datasize {}", blob_type, datasize);
          self.offset += take as u64;
          self.pending = Some(blob_type);
          self.state = State::Payload();
          self.waiting = datasize;
          buf = &buf[take..];
        },
        State::Payload() => {
          let take = self.waiting;
          let blob_type = self.pending.take().unwrap_or_default();
          self.offset += take as u64;
          self.state = State::Size();
          self.waiting = 4;
          // the frame is fully processed before any remaining bytes of
          // this chunk are interpreted, preserving batch order
          match self.flush(&blob_type, &buf[..take]) {
            Ok(Some(items)) => out.push(Ok(items)),
            Ok(None) => {},
            Err(e) => {
              let fatal = e.is_fatal();
              out.push(Err(e));
              if fatal {
                self.state = State::End();
                return out;
              }
            },
          }
          buf = &buf[take..];
        },
        State::End() => {
          return out;
        },
      }
    }
  }

  /// Signal end of input. Returns a [`DecodeError::Truncated`] when the
  /// stream stopped mid-frame, `None` on a clean frame boundary.
  /// Idempotent; the parser accepts no input afterwards.
  pub fn finish(&mut self) -> Option<DecodeError> {
    if self.state == State::End() {
      return None;
    }
    let clean = self.state == State::Size() && self.carry.is_empty();
    let remaining = self.carry.len();
    self.state = State::End();
    self.carry = vec![];
    if clean {
      None
    } else {
      Some(DecodeError::Truncated { offset: self.offset, remaining })
    }
  }

  /// Inflate one blob payload and dispatch on the header type: OSMHeader
  /// replaces the retained header state, OSMData yields an entity batch,
  /// anything else is ignored.
  fn flush(&mut self, blob_type: &str, payload: &[u8])
  -> Result<Option<Vec<Element>>,DecodeError> {
    let blob = proto::Blob::decode(payload)
      .map_err(|source| DecodeError::MalformedBlock {
        offset: self.size_offset,
        blob_type: blob_type.to_string(),
        source,
      })?;
    let zlib = match blob.zlib_data {
      Some(data) => data,
      None => {
        return Err(DecodeError::UnsupportedEncoding {
          offset: self.size_offset,
          blob_type: blob_type.to_string(),
        });
      },
    };
    let mut raw = Vec::with_capacity(blob.raw_size
      .and_then(|x| usize::try_from(x).ok())
      .unwrap_or(zlib.len()));
    {
      use std::io::Read;
      let mut decoder = flate2::bufread::ZlibDecoder::new(&zlib[..]);
      decoder.read_to_end(&mut raw)
        .map_err(|source| DecodeError::Decompression {
          offset: self.size_offset,
          blob_type: blob_type.to_string(),
          source,
        })?;
    }
    match blob_type {
      "OSMHeader" => {
        let block = proto::HeaderBlock::decode(&raw[..])
          .map_err(|source| DecodeError::MalformedBlock {
            offset: self.size_offset,
            blob_type: blob_type.to_string(),
            source,
          })?;
        self.header = HeaderState::from_block(&block);
        trace!("header state {:?}", self.header);
        Ok(None)
      },
      "OSMData" => {
        let block = proto::PrimitiveBlock::decode(&raw[..])
          .map_err(|source| DecodeError::MalformedBlock {
            offset: self.size_offset,
            blob_type: blob_type.to_string(),
            source,
          })?;
        let items = parse::block(&block, &self.header)?;
        if items.is_empty() { Ok(None) } else { Ok(Some(items)) }
      },
      _ => Ok(None),
    }
  }
}

impl Default for Parser {
  fn default() -> Self {
    Self::new()
  }
}

struct Decoder {
  reader: Box<dyn io::Read+Unpin>,
  buffer: Vec<u8>,
  parser: Parser,
  queue: VecDeque<DecodeItem>,
  done: bool,
}

impl Decoder {
  fn new(reader: Box<dyn io::Read+Unpin>) -> Self {
    Self {
      reader,
      buffer: vec![0;4096],
      parser: Parser::new(),
      queue: VecDeque::new(),
      done: false,
    }
  }
  async fn next_item(&mut self) -> Option<DecodeItem> {
    loop {
      if let Some(item) = self.queue.pop_front() {
        if matches!(&item, Err(e) if e.is_fatal()) {
          self.done = true;
          self.queue.clear();
        }
        return Some(item);
      }
      if self.done {
        return None;
      }
      let n = match self.reader.read(&mut self.buffer).await {
        Ok(n) => n,
        Err(source) => {
          self.done = true;
          return Some(Err(DecodeError::Read { source }));
        },
      };
      if n == 0 {
        self.done = true;
        return self.parser.finish().map(Err);
      }
      self.queue.extend(self.parser.feed(&self.buffer[..n]));
    }
  }
}

/// Transform the given binary stream `reader` into a stream of fallible
/// entity batches. The stream is pull-based: no more than one read chunk
/// is decoded ahead of the consumer, and dropping the stream mid-frame is
/// a normal exit.
pub fn decode(reader: Box<dyn io::Read+Unpin>) -> DecodeStream {
  let state = Decoder::new(reader);
  Box::pin(futures::stream::unfold(state, |mut qs| async move {
    qs.next_item().await.map(|item| (item,qs))
  }))
}
