use crate::codec::{date_millis,CoordScale,DeltaSum};
use crate::data::{Element,ElementType,Info,Member,Node,Relation,Tags,Way};
use crate::{proto,DecodeError,HeaderState};
use tracing::warn;

/// Decode one primitive block into its ordered entity batch, in group order
/// then intra-group order. Returns an empty vector when the block holds no
/// supported entities.
pub fn block(block: &proto::PrimitiveBlock, header: &HeaderState)
-> Result<Vec<Element>,DecodeError> {
  let strings = string_table(block.stringtable.as_ref())?;
  let mut items = vec![];
  for group in &block.primitivegroup {
    if let Some(dense) = &group.dense {
      dense_nodes(dense, header, &strings, &mut items);
    }
    for w in &group.ways {
      items.push(Element::Way(way(w, header, &strings)));
    }
    for r in &group.relations {
      items.push(Element::Relation(relation(r, header, &strings)));
    }
    if !group.nodes.is_empty() {
      warn!("{} unimplemented nodes", group.nodes.len());
    }
    if !group.changesets.is_empty() {
      warn!("{} unimplemented changesets", group.changesets.len());
    }
  }
  Ok(items)
}

/// Resolve every raw entry to text up front. Any entry that is not valid
/// utf-8 fails the enclosing block.
pub fn string_table(table: Option<&proto::StringTable>)
-> Result<Vec<String>,DecodeError> {
  let entries = table.map(|t| t.s.as_slice()).unwrap_or(&[]);
  entries.iter().enumerate()
    .map(|(index,raw)| {
      std::str::from_utf8(raw)
        .map(|s| s.to_string())
        .map_err(|source| DecodeError::InvalidStringTable { index, source })
    })
    .collect()
}

fn lookup(strings: &[String], index: i64) -> Option<&String> {
  usize::try_from(index).ok().and_then(|i| strings.get(i))
}

fn dense_nodes(dense: &proto::DenseNodes, header: &HeaderState,
strings: &[String], items: &mut Vec<Element>) {
  let lat_scale = CoordScale::new(header.granularity, header.lat_offset);
  let lon_scale = CoordScale::new(header.granularity, header.lon_offset);
  let mut id = DeltaSum::new();
  let mut lat = DeltaSum::new();
  let mut lon = DeltaSum::new();
  let mut timestamp = DeltaSum::new();
  let mut changeset = DeltaSum::new();
  let mut uid = DeltaSum::new();
  let mut user_sid = DeltaSum::new();
  // The tag cursor spans the whole group; each node's pair list ends at a
  // literal 0 index and the next node continues from there.
  let mut tags_cursor = 0;
  for i in 0..dense.id.len() {
    let id_v = id.add(dense.id[i]);
    let lat_v = lat.add(dense.lat.get(i).copied().unwrap_or(0));
    let lon_v = lon.add(dense.lon.get(i).copied().unwrap_or(0));
    let mut tags = Tags::new();
    while tags_cursor + 1 < dense.keys_vals.len()
    && dense.keys_vals[tags_cursor] != 0 {
      let k = lookup(strings, dense.keys_vals[tags_cursor] as i64);
      let v = lookup(strings, dense.keys_vals[tags_cursor+1] as i64);
      if let (Some(k),Some(v)) = (k,v) {
        tags.insert(k.clone(), v.clone());
      }
      tags_cursor += 2;
    }
    tags_cursor += 1; // skip the terminating 0
    let info = dense.denseinfo.as_ref().map(|dinfo| {
      let ts = timestamp.add(dinfo.timestamp.get(i).copied().unwrap_or(0));
      let cs = changeset.add(dinfo.changeset.get(i).copied().unwrap_or(0));
      let uid_v = uid.add(dinfo.uid.get(i).copied().unwrap_or(0) as i64);
      let sid = user_sid.add(dinfo.user_sid.get(i).copied().unwrap_or(0) as i64);
      Info {
        version: dinfo.version.get(i).copied(),
        timestamp: Some(date_millis(header.date_granularity, ts)),
        changeset: Some(cs),
        uid: Some(uid_v as i32),
        user: lookup(strings, sid).cloned(),
        // visible is absolute, never delta-decoded
        visible: if header.historical_information && !dinfo.visible.is_empty() {
          dinfo.visible.get(i).copied()
        } else {
          None
        },
      }
    });
    items.push(Element::Node(Node {
      id: id_v,
      lat: lat_scale.apply(lat_v),
      lon: lon_scale.apply(lon_v),
      tags,
      info,
    }));
  }
}

fn way(data: &proto::Way, header: &HeaderState, strings: &[String]) -> Way {
  let mut refs = vec![];
  let mut sum = DeltaSum::new();
  for delta in &data.refs {
    refs.push(sum.add(*delta));
  }
  Way {
    id: data.id.unwrap_or(0),
    refs,
    tags: tags(&data.keys, &data.vals, strings),
    info: data.info.as_ref().map(|i| info(i, header, strings)),
  }
}

fn relation(data: &proto::Relation, header: &HeaderState, strings: &[String])
-> Relation {
  let mut members = vec![];
  let mut sum = DeltaSum::new();
  let count = data.roles_sid.len().min(data.memids.len()).min(data.types.len());
  for i in 0..count {
    members.push(Member {
      id: sum.add(data.memids[i]),
      element_type: ElementType::from_member_type(data.types[i]),
      role: lookup(strings, data.roles_sid[i] as i64).cloned(),
    });
  }
  Relation {
    id: data.id.unwrap_or(0),
    members,
    tags: tags(&data.keys, &data.vals, strings),
    info: data.info.as_ref().map(|i| info(i, header, strings)),
  }
}

/// Zip key/value indexes pairwise up to the shorter array. Pairs whose
/// indexes fall outside the string table are dropped.
fn tags(keys: &[u32], vals: &[u32], strings: &[String]) -> Tags {
  let mut tags = Tags::new();
  for (k,v) in keys.iter().zip(vals.iter()) {
    if let (Some(k),Some(v)) = (lookup(strings, *k as i64), lookup(strings, *v as i64)) {
      tags.insert(k.clone(), v.clone());
    }
  }
  tags
}

fn info(data: &proto::Info, header: &HeaderState, strings: &[String]) -> Info {
  Info {
    version: data.version,
    timestamp: data.timestamp.map(|t| date_millis(header.date_granularity, t)),
    changeset: data.changeset,
    uid: data.uid,
    user: data.user_sid.and_then(|sid| lookup(strings, sid as i64)).cloned(),
    visible: if header.historical_information { data.visible } else { None },
  }
}
