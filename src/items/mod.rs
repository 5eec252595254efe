//! Item system

pub mod attributes;
pub mod item;
pub mod record;
pub mod suffix;

pub use attributes::{derive_attributes, display_name, merge_buff_into_attributes, parse_modifier};
pub use item::{Item, ItemVariant, SoulboundStatus, VariantTag};
pub use record::{AttributeModifier, Buff, InfixUpgrade, InfusionSlot, ItemId, RawItemRecord};
pub use suffix::SuffixResolver;
