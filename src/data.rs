#[derive(Clone,PartialEq,Debug)]
pub enum Element {
  Node(Node),
  Way(Way),
  Relation(Relation),
}

#[derive(Clone,PartialEq,Debug)]
pub enum ElementType {
  Node(), Way(), Relation(),
  /// A relation member type outside the known range.
  Unknown(),
}

impl ElementType {
  pub fn from_member_type(t: i32) -> Self {
    match t {
      0 => Self::Node(),
      1 => Self::Way(),
      2 => Self::Relation(),
      _ => Self::Unknown(),
    }
  }
}

impl std::fmt::Display for ElementType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Self::Node() => "node",
      Self::Way() => "way",
      Self::Relation() => "relation",
      Self::Unknown() => "?",
    })
  }
}

pub type Tags = std::collections::HashMap<String,String>;

pub trait OsmObject {
  fn get_id(&self) -> i64;
  fn get_info<'a>(&'a self) -> Option<&'a Info>;
  fn get_type(&self) -> ElementType;
  fn get_tags<'a>(&'a self) -> &'a Tags;
}

/// Entity metadata. Timestamps are absolute milliseconds (already scaled
/// by the header's date granularity); `user` is the resolved string-table
/// entry for the source's user_sid. `visible` is only populated when the
/// header enabled historical information.
#[derive(Clone,PartialEq,Debug)]
pub struct Info {
  pub version: Option<i32>,
  pub timestamp: Option<i64>,
  pub changeset: Option<i64>,
  pub uid: Option<i32>,
  pub user: Option<String>,
  pub visible: Option<bool>,
}

/// A point entity with coordinates in decimal degrees.
#[derive(Clone,PartialEq,Debug)]
pub struct Node {
  pub id: i64,
  pub lat: f64,
  pub lon: f64,
  pub tags: Tags,
  pub info: Option<Info>,
}
impl OsmObject for Node {
  fn get_id(&self) -> i64 { self.id }
  fn get_info<'a>(&'a self) -> Option<&'a Info> {
    self.info.as_ref()
  }
  fn get_type(&self) -> ElementType { ElementType::Node() }
  fn get_tags<'a>(&'a self) -> &'a Tags { &self.tags }
}

/// An ordered sequence of node ids plus tags.
#[derive(Clone,PartialEq,Debug)]
pub struct Way {
  pub id: i64,
  pub refs: Vec<i64>,
  pub tags: Tags,
  pub info: Option<Info>,
}
impl OsmObject for Way {
  fn get_id(&self) -> i64 { self.id }
  fn get_info<'a>(&'a self) -> Option<&'a Info> {
    self.info.as_ref()
  }
  fn get_type(&self) -> ElementType { ElementType::Way() }
  fn get_tags<'a>(&'a self) -> &'a Tags { &self.tags }
}

#[derive(Clone,PartialEq,Debug)]
pub struct Relation {
  pub id: i64,
  pub members: Vec<Member>,
  pub tags: Tags,
  pub info: Option<Info>,
}
#[derive(Clone,PartialEq,Debug)]
pub struct Member {
  pub id: i64,
  pub element_type: ElementType,
  pub role: Option<String>,
}
impl OsmObject for Relation {
  fn get_id(&self) -> i64 { self.id }
  fn get_info<'a>(&'a self) -> Option<&'a Info> {
    self.info.as_ref()
  }
  fn get_type(&self) -> ElementType { ElementType::Relation() }
  fn get_tags<'a>(&'a self) -> &'a Tags { &self.tags }
}

impl OsmObject for Element {
  fn get_id(&self) -> i64 {
    match self {
      Self::Node(x) => x.get_id(),
      Self::Way(x) => x.get_id(),
      Self::Relation(x) => x.get_id(),
    }
  }
  fn get_info<'a>(&'a self) -> Option<&'a Info> {
    match self {
      Self::Node(x) => x.get_info(),
      Self::Way(x) => x.get_info(),
      Self::Relation(x) => x.get_info(),
    }
  }
  fn get_type(&self) -> ElementType {
    match self {
      Self::Node(x) => x.get_type(),
      Self::Way(x) => x.get_type(),
      Self::Relation(x) => x.get_type(),
    }
  }
  fn get_tags<'a>(&'a self) -> &'a Tags {
    match self {
      Self::Node(x) => x.get_tags(),
      Self::Way(x) => x.get_tags(),
      Self::Relation(x) => x.get_tags(),
    }
  }
}
