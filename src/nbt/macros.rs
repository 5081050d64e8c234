/// Shorthand way to create a Tag::Compound.
/// Example:
/// ```
/// use mcschem::{compound, Tag};
/// let tag = compound!{
///     ("Item One", 0i8),
///     (String::from("Item Two"), 2i32),
///     ("Item Three", Tag::Byte(1))
/// };
/// assert_eq!(tag.as_compound().unwrap().len(), 3);
/// ```
#[macro_export]
macro_rules! compound {
    ($(($name:expr, $value:expr)),+$(,)?) => {
        $crate::nbt::tag::Tag::Compound(
            [
                $(
                    ($crate::nbt::tag::NbtString::from($name), $crate::nbt::tag::Tag::from($value)),
                )+
            ]
            .into_iter()
            .collect::<$crate::nbt::Map>()
        )
    };
    () => {
        $crate::nbt::tag::Tag::Compound($crate::nbt::Map::new())
    };
}

/// Shorthand way to create a Tag::List.
/// Example:
/// ```
/// use mcschem::{list, ListTag, Tag};
/// let numbers = list![1i32, 2, 3, 4, 5, 6, 7, 8, 9, 10];
/// let words = list![
///     "One",
///     "Two",
///     "Three",
/// ];
/// assert_eq!(words, Tag::List(ListTag::from(vec!["One", "Two", "Three"])));
/// assert_eq!(list![0i8; 4], Tag::List(ListTag::Byte(vec![0; 4])));
/// assert_eq!(list![], Tag::List(ListTag::Empty));
/// # let _ = numbers;
/// ```
#[macro_export]
macro_rules! list {
    ($($item:expr),+$(,)?) => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(std::vec![
            $(
                $item,
            )+
        ]))
    };
    ($value:expr; $repititions:expr) => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(std::vec![$value; $repititions]))
    };
    () => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::Empty)
    };
}
