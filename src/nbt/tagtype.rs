use crate::nbt::Map;
use crate::nbt::tag::{
	Tag,
	TagID,
	ListTag,
	NbtString,
};

pub type Byte = i8;
pub type Short = i16;
pub type Int = i32;
pub type Long = i64;
pub type Float = f32;
pub type Double = f64;
pub type ByteArray = Vec<i8>;
pub type String = NbtString;
pub type List = ListTag;
pub type Compound = Map;
pub type IntArray = Vec<i32>;

pub trait TypeId {
	fn tag_id() -> TagID;
}

/// Moves a value out of a [Tag] of the matching type.
/// On mismatch the tag is handed back untouched.
pub trait FromTag: Sized {
	fn from_tag(tag: Tag) -> Result<Self, Tag>;
}

/// Borrows a value out of a [Tag] of the matching type.
pub trait RefFromTag {
	fn ref_from_tag(tag: &Tag) -> Option<&Self>;
	fn mut_from_tag(tag: &mut Tag) -> Option<&mut Self>;
}

macro_rules! typeid_impls {
	($($types:ty => $id:ident;)+) => {
		$(
			impl TypeId for $types {
				fn tag_id() -> TagID {
					TagID::$id
				}
			}

			impl FromTag for $types {
				fn from_tag(tag: Tag) -> Result<Self, Tag> {
					match tag {
						Tag::$id(value) => Ok(value),
						other => Err(other),
					}
				}
			}

			impl RefFromTag for $types {
				fn ref_from_tag(tag: &Tag) -> Option<&Self> {
					match tag {
						Tag::$id(value) => Some(value),
						_ => None,
					}
				}

				fn mut_from_tag(tag: &mut Tag) -> Option<&mut Self> {
					match tag {
						Tag::$id(value) => Some(value),
						_ => None,
					}
				}
			}
		)+
	};
}

typeid_impls!(
	Byte => Byte;
	Short => Short;
	Int => Int;
	Long => Long;
	Float => Float;
	Double => Double;
	ByteArray => ByteArray;
	String => String;
	List => List;
	Compound => Compound;
	IntArray => IntArray;
);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_tag_test() {
		assert_eq!(Short::from_tag(Tag::Short(7)), Ok(7));
		assert_eq!(Int::from_tag(Tag::Short(7)), Err(Tag::Short(7)));
		assert_eq!(<ByteArray as TypeId>::tag_id(), TagID::ByteArray);
		let mut tag = Tag::Int(1);
		*Int::mut_from_tag(&mut tag).unwrap() += 1;
		assert_eq!(Int::ref_from_tag(&tag), Some(&2));
		assert_eq!(Long::ref_from_tag(&tag), None);
	}
}
