use std::{
	borrow::Borrow,
	fmt,
};

use crate::nbt::Map;

/// Tag type identifiers as they appear on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagID {
	End = 0,
	Byte = 1,
	Short = 2,
	Int = 3,
	Long = 4,
	Float = 5,
	Double = 6,
	ByteArray = 7,
	String = 8,
	List = 9,
	Compound = 10,
	IntArray = 11,
}

impl TagID {
	/// Returns `None` for ids outside of 0..=11.
	pub fn from_u8(id: u8) -> Option<TagID> {
		Some(match id {
			0 => TagID::End,
			1 => TagID::Byte,
			2 => TagID::Short,
			3 => TagID::Int,
			4 => TagID::Long,
			5 => TagID::Float,
			6 => TagID::Double,
			7 => TagID::ByteArray,
			8 => TagID::String,
			9 => TagID::List,
			10 => TagID::Compound,
			11 => TagID::IntArray,
			_ => return None,
		})
	}

	#[inline(always)]
	pub fn value(self) -> u8 {
		self as u8
	}
}

/// Raw NBT string bytes.
/// NBT strings are modified UTF-8; they are carried byte-for-byte so that
/// decoding and re-encoding never alters them.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NbtString(Vec<u8>);

impl NbtString {
	pub fn new(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Lossy text view, for display purposes.
	pub fn to_str_lossy(&self) -> std::borrow::Cow<'_, str> {
		std::string::String::from_utf8_lossy(&self.0)
	}
}

impl Borrow<[u8]> for NbtString {
	fn borrow(&self) -> &[u8] {
		&self.0
	}
}

impl From<&str> for NbtString {
	fn from(value: &str) -> Self {
		Self(value.as_bytes().to_vec())
	}
}

impl From<std::string::String> for NbtString {
	fn from(value: std::string::String) -> Self {
		Self(value.into_bytes())
	}
}

impl From<&[u8]> for NbtString {
	fn from(value: &[u8]) -> Self {
		Self(value.to_vec())
	}
}

impl PartialEq<str> for NbtString {
	fn eq(&self, other: &str) -> bool {
		self.0 == other.as_bytes()
	}
}

impl PartialEq<&str> for NbtString {
	fn eq(&self, other: &&str) -> bool {
		self.0 == other.as_bytes()
	}
}

impl fmt::Debug for NbtString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", self.to_str_lossy())
	}
}

impl fmt::Display for NbtString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_str_lossy())
	}
}

/// A single NBT value. `End` only exists on the wire and has no variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	ByteArray(Vec<i8>),
	String(NbtString),
	List(ListTag),
	Compound(Map),
	IntArray(Vec<i32>),
}

/// A homogeneous list. The variant determines the element type, so
/// mixed lists can't be represented. `Empty` is a list of element type End.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListTag {
	#[default]
	Empty,
	Byte(Vec<i8>),
	Short(Vec<i16>),
	Int(Vec<i32>),
	Long(Vec<i64>),
	Float(Vec<f32>),
	Double(Vec<f64>),
	ByteArray(Vec<Vec<i8>>),
	String(Vec<NbtString>),
	List(Vec<ListTag>),
	Compound(Vec<Map>),
	IntArray(Vec<Vec<i32>>),
}

/// The root of an NBT document: a tag with a name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
	pub name: NbtString,
	pub tag: Tag,
}

impl NamedTag {
	pub fn new<S: Into<NbtString>, T: Into<Tag>>(name: S, tag: T) -> Self {
		Self {
			name: name.into(),
			tag: tag.into(),
		}
	}
}

impl Tag {
	pub fn id(&self) -> TagID {
		match self {
			Tag::Byte(_) => TagID::Byte,
			Tag::Short(_) => TagID::Short,
			Tag::Int(_) => TagID::Int,
			Tag::Long(_) => TagID::Long,
			Tag::Float(_) => TagID::Float,
			Tag::Double(_) => TagID::Double,
			Tag::ByteArray(_) => TagID::ByteArray,
			Tag::String(_) => TagID::String,
			Tag::List(_) => TagID::List,
			Tag::Compound(_) => TagID::Compound,
			Tag::IntArray(_) => TagID::IntArray,
		}
	}

	pub fn as_compound(&self) -> Option<&Map> {
		match self {
			Tag::Compound(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_compound_mut(&mut self) -> Option<&mut Map> {
		match self {
			Tag::Compound(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&ListTag> {
		match self {
			Tag::List(list) => Some(list),
			_ => None,
		}
	}

	pub fn as_list_mut(&mut self) -> Option<&mut ListTag> {
		match self {
			Tag::List(list) => Some(list),
			_ => None,
		}
	}
}

impl ListTag {
	pub fn element_id(&self) -> TagID {
		match self {
			ListTag::Empty => TagID::End,
			ListTag::Byte(_) => TagID::Byte,
			ListTag::Short(_) => TagID::Short,
			ListTag::Int(_) => TagID::Int,
			ListTag::Long(_) => TagID::Long,
			ListTag::Float(_) => TagID::Float,
			ListTag::Double(_) => TagID::Double,
			ListTag::ByteArray(_) => TagID::ByteArray,
			ListTag::String(_) => TagID::String,
			ListTag::List(_) => TagID::List,
			ListTag::Compound(_) => TagID::Compound,
			ListTag::IntArray(_) => TagID::IntArray,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			ListTag::Empty => 0,
			ListTag::Byte(list) => list.len(),
			ListTag::Short(list) => list.len(),
			ListTag::Int(list) => list.len(),
			ListTag::Long(list) => list.len(),
			ListTag::Float(list) => list.len(),
			ListTag::Double(list) => list.len(),
			ListTag::ByteArray(list) => list.len(),
			ListTag::String(list) => list.len(),
			ListTag::List(list) => list.len(),
			ListTag::Compound(list) => list.len(),
			ListTag::IntArray(list) => list.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// An empty list whose declared element type is `id`.
	pub fn empty_of(id: TagID) -> ListTag {
		match id {
			TagID::End => ListTag::Empty,
			TagID::Byte => ListTag::Byte(Vec::new()),
			TagID::Short => ListTag::Short(Vec::new()),
			TagID::Int => ListTag::Int(Vec::new()),
			TagID::Long => ListTag::Long(Vec::new()),
			TagID::Float => ListTag::Float(Vec::new()),
			TagID::Double => ListTag::Double(Vec::new()),
			TagID::ByteArray => ListTag::ByteArray(Vec::new()),
			TagID::String => ListTag::String(Vec::new()),
			TagID::List => ListTag::List(Vec::new()),
			TagID::Compound => ListTag::Compound(Vec::new()),
			TagID::IntArray => ListTag::IntArray(Vec::new()),
		}
	}
}

/// Name based access to Compound members.
pub trait CompoundExt {
	fn get_tag(&self, name: &str) -> Option<&Tag>;
	fn get_tag_mut(&mut self, name: &str) -> Option<&mut Tag>;
	/// Removes a member without disturbing the order of the others.
	fn take_tag(&mut self, name: &str) -> Option<Tag>;
	fn has_tag(&self, name: &str) -> bool;
}

impl CompoundExt for Map {
	fn get_tag(&self, name: &str) -> Option<&Tag> {
		self.get(name.as_bytes())
	}

	fn get_tag_mut(&mut self, name: &str) -> Option<&mut Tag> {
		self.get_mut(name.as_bytes())
	}

	fn take_tag(&mut self, name: &str) -> Option<Tag> {
		self.shift_remove(name.as_bytes())
	}

	fn has_tag(&self, name: &str) -> bool {
		self.contains_key(name.as_bytes())
	}
}

macro_rules! tag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<$type> for Tag {
				fn from(value: $type) -> Self {
					Tag::$variant(value)
				}
			}
		)+
	};
}

tag_from_impls!{
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	NbtString => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
}

impl From<&str> for Tag {
	fn from(value: &str) -> Self {
		Tag::String(NbtString::from(value))
	}
}

impl From<std::string::String> for Tag {
	fn from(value: std::string::String) -> Self {
		Tag::String(NbtString::from(value))
	}
}

macro_rules! list_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<Vec<$type>> for ListTag {
				fn from(value: Vec<$type>) -> Self {
					ListTag::$variant(value)
				}
			}
		)+
	};
}

list_from_impls!{
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	NbtString => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
}

impl From<Vec<std::string::String>> for ListTag {
	fn from(value: Vec<std::string::String>) -> Self {
		ListTag::String(value.into_iter().map(NbtString::from).collect())
	}
}

impl From<Vec<&str>> for ListTag {
	fn from(value: Vec<&str>) -> Self {
		ListTag::String(value.into_iter().map(NbtString::from).collect())
	}
}
