//! Item definitions
//!
//! The resolved, typed item and its closed set of variants.

use serde::Serialize;

use super::attributes::derive_attributes;
use super::record::{AttributeModifier, ItemId, RawItemRecord};
use crate::error::ResolveError;

/// Item categories known to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemVariant {
    Armor,
    Bag,
    Consumable,
    Container,
    CraftingMaterial,
    Gathering,
    Gizmo,
    MiniPet,
    Tool,
    Trinket,
    Trophy,
    UpgradeComponent,
    Weapon,
}

/// Result of mapping a raw `type` string onto the variant set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantTag {
    Known(ItemVariant),
    Unknown(String),
}

impl ItemVariant {
    pub const ALL: [ItemVariant; 13] = [
        ItemVariant::Armor,
        ItemVariant::Bag,
        ItemVariant::Consumable,
        ItemVariant::Container,
        ItemVariant::CraftingMaterial,
        ItemVariant::Gathering,
        ItemVariant::Gizmo,
        ItemVariant::MiniPet,
        ItemVariant::Tool,
        ItemVariant::Trinket,
        ItemVariant::Trophy,
        ItemVariant::UpgradeComponent,
        ItemVariant::Weapon,
    ];

    /// Map a provider type string onto the variant set (exact, case-sensitive)
    pub fn classify(type_tag: &str) -> VariantTag {
        let variant = match type_tag {
            "Armor" => ItemVariant::Armor,
            "Bag" => ItemVariant::Bag,
            "Consumable" => ItemVariant::Consumable,
            "Container" => ItemVariant::Container,
            "CraftingMaterial" => ItemVariant::CraftingMaterial,
            "Gathering" => ItemVariant::Gathering,
            "Gizmo" => ItemVariant::Gizmo,
            "MiniPet" => ItemVariant::MiniPet,
            "Tool" => ItemVariant::Tool,
            "Trinket" => ItemVariant::Trinket,
            "Trophy" => ItemVariant::Trophy,
            "UpgradeComponent" => ItemVariant::UpgradeComponent,
            "Weapon" => ItemVariant::Weapon,
            other => return VariantTag::Unknown(other.to_string()),
        };
        VariantTag::Known(variant)
    }

    /// The provider's type string for this variant
    pub fn type_tag(&self) -> &'static str {
        match self {
            ItemVariant::Armor => "Armor",
            ItemVariant::Bag => "Bag",
            ItemVariant::Consumable => "Consumable",
            ItemVariant::Container => "Container",
            ItemVariant::CraftingMaterial => "CraftingMaterial",
            ItemVariant::Gathering => "Gathering",
            ItemVariant::Gizmo => "Gizmo",
            ItemVariant::MiniPet => "MiniPet",
            ItemVariant::Tool => "Tool",
            ItemVariant::Trinket => "Trinket",
            ItemVariant::Trophy => "Trophy",
            ItemVariant::UpgradeComponent => "UpgradeComponent",
            ItemVariant::Weapon => "Weapon",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ItemVariant::CraftingMaterial => "Crafting Material",
            ItemVariant::MiniPet => "Miniature",
            ItemVariant::UpgradeComponent => "Upgrade Component",
            other => other.type_tag(),
        }
    }
}

/// Binding shown on the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoulboundStatus {
    SoulboundOnUse,
    AccountBound,
}

impl SoulboundStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SoulboundStatus::SoulboundOnUse => "Soulbound On Use",
            SoulboundStatus::AccountBound => "Account Bound",
        }
    }
}

/// A resolved item: the raw record plus its variant and icon URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    record: RawItemRecord,
    variant: ItemVariant,
    image: String,
}

impl Item {
    /// Dispatch a record onto its variant; unknown type tags are rejected
    pub fn from_record(record: RawItemRecord, render_url: &str) -> Result<Self, ResolveError> {
        let variant = match ItemVariant::classify(&record.type_tag) {
            VariantTag::Known(variant) => variant,
            VariantTag::Unknown(tag) => return Err(ResolveError::UnknownVariant(tag)),
        };

        let image = format!(
            "{}/file/{}/{}.png",
            render_url.trim_end_matches('/'),
            record.icon_file_signature,
            record.icon_file_id
        );

        Ok(Self {
            record,
            variant,
            image,
        })
    }

    pub fn id(&self) -> ItemId {
        self.record.item_id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn variant(&self) -> ItemVariant {
        self.variant
    }

    pub fn record(&self) -> &RawItemRecord {
        &self.record
    }

    pub fn image_url(&self) -> &str {
        &self.image
    }

    pub fn sub_type(&self) -> Option<&str> {
        self.record.sub_type.as_deref()
    }

    pub fn rarity(&self) -> &str {
        &self.record.rarity
    }

    pub fn rarity_lower(&self) -> String {
        self.record.rarity.to_lowercase()
    }

    /// Level requirement, if the item has one
    pub fn required_level(&self) -> Option<u32> {
        (self.record.level > 0).then_some(self.record.level)
    }

    pub fn suffix_item_id(&self) -> Option<ItemId> {
        self.record.suffix_item_id
    }

    /// `SoulBindOnUse` takes precedence over `AccountBound`
    pub fn soulbound_status(&self) -> Option<SoulboundStatus> {
        if self.record.has_flag("SoulBindOnUse") {
            Some(SoulboundStatus::SoulboundOnUse)
        } else if self.record.has_flag("AccountBound") {
            Some(SoulboundStatus::AccountBound)
        } else {
            None
        }
    }

    /// Description with markup tags removed
    pub fn plain_description(&self) -> String {
        strip_tags(&self.record.description)
    }

    pub fn buff_description(&self) -> Option<&str> {
        self.record
            .buff()
            .map(|buff| buff.description.as_str())
            .filter(|text| !text.is_empty())
    }

    /// Non-empty lines of the buff text
    pub fn buff_lines(&self) -> Vec<&str> {
        self.buff_description()
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Display-ready stat list with buff deltas folded in
    pub fn display_attributes(&self) -> Vec<AttributeModifier> {
        derive_attributes(&self.record)
    }
}

fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
