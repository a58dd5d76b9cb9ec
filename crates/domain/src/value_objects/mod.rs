//! Value objects: small validated types with no identity of their own.

mod attributes;
mod names;
mod quantity;

pub use attributes::{Attribute, Attributes, MAX_ATTRIBUTE_VALUE, MIN_ATTRIBUTE_VALUE};
pub use names::{
    CharacterName, ItemName, StatusName, MAX_CHARACTER_NAME_LENGTH, MAX_ITEM_NAME_LENGTH,
    MIN_CHARACTER_NAME_LENGTH, MIN_ITEM_NAME_LENGTH,
};
pub use quantity::{merged_quantity, StackChange, MAX_ITEM_QUANTITY};
