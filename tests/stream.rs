mod common;

use common::*;
use async_std::io::Cursor;
use async_std::prelude::*;
use osm_pbf_stream::{decode,proto,DecodeError,Element};
use std::pin::Pin;
use std::task::{Context,Poll};

fn sample_stream() -> Vec<u8> {
  let mut bytes = header_frame(&["DenseNodes"]);
  bytes.extend(data_frame(&block_with_groups(
    &["","amenity","cafe"],
    vec![dense_group(proto::DenseNodes {
      id: vec![5,-2,3],
      lat: vec![100,-40,10],
      lon: vec![200,-80,20],
      keys_vals: vec![1,2,0,0,0],
      denseinfo: None,
    })],
  )));
  bytes.extend(data_frame(&block_with_groups(
    &["","name","river"],
    vec![proto::PrimitiveGroup {
      ways: vec![proto::Way {
        id: Some(42),
        keys: vec![1],
        vals: vec![2],
        refs: vec![10,-3,7],
        ..Default::default()
      }],
      ..Default::default()
    }],
  )));
  bytes
}

/// Hands the underlying bytes to the decoder one byte per read call.
struct TrickleReader {
  bytes: Vec<u8>,
  pos: usize,
}

impl async_std::io::Read for TrickleReader {
  fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut [u8])
  -> Poll<std::io::Result<usize>> {
    if self.pos >= self.bytes.len() || buf.is_empty() {
      return Poll::Ready(Ok(0));
    }
    buf[0] = self.bytes[self.pos];
    self.pos += 1;
    Poll::Ready(Ok(1))
  }
}

struct FailingReader;

impl async_std::io::Read for FailingReader {
  fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut [u8])
  -> Poll<std::io::Result<usize>> {
    Poll::Ready(Err(std::io::Error::new(std::io::ErrorKind::Other, "boom")))
  }
}

#[async_std::test]
async fn yields_one_batch_per_data_blob() {
  let mut stream = decode(Box::new(Cursor::new(sample_stream())));
  let mut batches = vec![];
  while let Some(result) = stream.next().await {
    batches.push(result.unwrap());
  }
  assert_eq!(batches.len(), 2);
  assert_eq!(batches[0].len(), 3);
  assert!(matches!(batches[0][0], Element::Node(_)));
  assert_eq!(batches[1].len(), 1);
  match &batches[1][0] {
    Element::Way(w) => assert_eq!(w.refs, vec![10,7,14]),
    other => panic!("expected way, got {:?}", other),
  }
}

#[async_std::test]
async fn trickled_reads_match_a_single_read() {
  let bytes = sample_stream();

  let mut whole = decode(Box::new(Cursor::new(bytes.clone())));
  let mut whole_batches = vec![];
  while let Some(result) = whole.next().await {
    whole_batches.push(result.unwrap());
  }

  let mut trickled = decode(Box::new(TrickleReader { bytes, pos: 0 }));
  let mut trickled_batches = vec![];
  while let Some(result) = trickled.next().await {
    trickled_batches.push(result.unwrap());
  }

  assert_eq!(trickled_batches, whole_batches);
}

#[async_std::test]
async fn truncation_surfaces_as_a_final_error() {
  let bytes = sample_stream();
  let cut = bytes.len() - 9;
  let mut stream = decode(Box::new(Cursor::new(bytes[..cut].to_vec())));
  let mut saw_truncation = false;
  while let Some(result) = stream.next().await {
    match result {
      Ok(batch) => assert!(!batch.is_empty()),
      Err(e @ DecodeError::Truncated { .. }) => {
        assert!(e.is_fatal());
        saw_truncation = true;
      },
      Err(other) => panic!("unexpected error: {:?}", other),
    }
  }
  assert!(saw_truncation);
}

#[async_std::test]
async fn read_errors_end_the_stream() {
  let mut stream = decode(Box::new(FailingReader));
  match stream.next().await {
    Some(Err(DecodeError::Read { .. })) => {},
    other => panic!("expected read error, got {:?}", other),
  }
  assert!(stream.next().await.is_none());
}

#[async_std::test]
async fn separate_streams_over_the_same_bytes_agree() {
  let bytes = sample_stream();
  let mut collected = vec![];
  for _ in 0..2 {
    let mut stream = decode(Box::new(Cursor::new(bytes.clone())));
    let mut batches = vec![];
    while let Some(result) = stream.next().await {
      batches.push(result.unwrap());
    }
    collected.push(batches);
  }
  assert_eq!(collected[0], collected[1]);
}
