//! Raw item records
//!
//! The decoded provider payload. The v1 item API encodes most numbers as
//! strings, uses `""` for "no suffix" and tucks category data into a section
//! named after the item type, so decoding is deliberately lenient.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Provider catalog identifier
pub type ItemId = u32;

/// One structured stat bonus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub attribute: String,
    #[serde(deserialize_with = "de::number")]
    pub modifier: i32,
}

impl AttributeModifier {
    pub fn new(attribute: impl Into<String>, modifier: i32) -> Self {
        Self {
            attribute: attribute.into(),
            modifier,
        }
    }
}

/// Free-text bonus effect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buff {
    #[serde(default, deserialize_with = "de::optional_id")]
    pub skill_id: Option<u32>,
    #[serde(default)]
    pub description: String,
}

/// Stat block granted by an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfixUpgrade {
    #[serde(default)]
    pub attributes: Vec<AttributeModifier>,
    #[serde(default, deserialize_with = "de::object_or_empty")]
    pub buff: Option<Buff>,
}

/// An infusion socket on equipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfusionSlot {
    #[serde(default)]
    pub flags: BTreeSet<String>,
    #[serde(default, deserialize_with = "de::optional_id")]
    pub item_id: Option<ItemId>,
}

/// Decoded provider payload, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawItemRecord {
    pub item_id: ItemId,
    pub name: String,
    /// May contain markup
    pub description: String,
    /// Tag selecting the variant
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Category-specific subtype (e.g. "Sword", "Coat")
    pub sub_type: Option<String>,
    pub level: u32,
    pub rarity: String,
    pub vendor_value: u32,
    pub icon_file_id: String,
    pub icon_file_signature: String,
    pub game_types: BTreeSet<String>,
    pub flags: BTreeSet<String>,
    pub restrictions: BTreeSet<String>,
    pub infusion_slots: Vec<InfusionSlot>,
    pub infix_upgrade: Option<InfixUpgrade>,
    pub suffix_item_id: Option<ItemId>,
}

impl RawItemRecord {
    /// Decode a provider payload
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let wire: WireItem = serde_json::from_slice(bytes)?;
        wire.into_record()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Structured attributes as delivered, before any derivation
    pub fn attributes(&self) -> &[AttributeModifier] {
        self.infix_upgrade
            .as_ref()
            .map(|infix| infix.attributes.as_slice())
            .unwrap_or(&[])
    }

    pub fn buff(&self) -> Option<&Buff> {
        self.infix_upgrade.as_ref().and_then(|infix| infix.buff.as_ref())
    }
}

/// Payload shape as the provider sends it
#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(deserialize_with = "de::number")]
    item_id: ItemId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type", default)]
    type_tag: String,
    #[serde(default, deserialize_with = "de::number")]
    level: u32,
    #[serde(default)]
    rarity: String,
    #[serde(default, deserialize_with = "de::number")]
    vendor_value: u32,
    #[serde(default, deserialize_with = "de::text")]
    icon_file_id: String,
    #[serde(default, deserialize_with = "de::text")]
    icon_file_signature: String,
    #[serde(default)]
    game_types: BTreeSet<String>,
    #[serde(default)]
    flags: BTreeSet<String>,
    #[serde(default)]
    restrictions: BTreeSet<String>,
    #[serde(flatten)]
    top: WireDetails,
    /// Everything else, including the per-type section
    #[serde(flatten)]
    sections: BTreeMap<String, serde_json::Value>,
}

/// Fields that may sit at top level or inside the per-type section
#[derive(Debug, Default, Deserialize)]
struct WireDetails {
    /// Only meaningful inside the section; at top level `type` is the variant tag
    #[serde(rename = "type", default)]
    sub_type: Option<String>,
    #[serde(default)]
    infusion_slots: Option<Vec<InfusionSlot>>,
    #[serde(default, deserialize_with = "de::object_or_empty")]
    infix_upgrade: Option<InfixUpgrade>,
    #[serde(default, deserialize_with = "de::optional_id")]
    suffix_item_id: Option<ItemId>,
}

impl WireItem {
    /// Lift the per-type section into the record. A malformed section fails
    /// the decode exactly like the same fields would at top level.
    fn into_record(mut self) -> Result<RawItemRecord, serde_json::Error> {
        let section = match self.sections.remove(&section_key(&self.type_tag)) {
            Some(value @ serde_json::Value::Object(_)) => serde_json::from_value::<WireDetails>(value)?,
            _ => WireDetails::default(),
        };

        Ok(RawItemRecord {
            item_id: self.item_id,
            name: self.name,
            description: self.description,
            type_tag: self.type_tag,
            sub_type: section.sub_type,
            level: self.level,
            rarity: self.rarity,
            vendor_value: self.vendor_value,
            icon_file_id: self.icon_file_id,
            icon_file_signature: self.icon_file_signature,
            game_types: self.game_types,
            flags: self.flags,
            restrictions: self.restrictions,
            infusion_slots: self
                .top
                .infusion_slots
                .or(section.infusion_slots)
                .unwrap_or_default(),
            infix_upgrade: self.top.infix_upgrade.or(section.infix_upgrade),
            suffix_item_id: self.top.suffix_item_id.or(section.suffix_item_id),
        })
    }
}

/// "UpgradeComponent" -> "upgrade_component"
fn section_key(type_tag: &str) -> String {
    let mut key = String::with_capacity(type_tag.len() + 4);
    for (i, c) in type_tag.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                key.push('_');
            }
            key.push(c.to_ascii_lowercase());
        } else {
            key.push(c);
        }
    }
    key
}

/// Lenient field decoders for the provider's stringly-typed JSON
mod de {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    /// Accept `12` or `"12"`
    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        let value = match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => n,
            NumberOrString::Text(s) => s.trim().parse::<i64>().map_err(D::Error::custom)?,
        };
        T::try_from(value).map_err(|_| D::Error::custom(format!("number {} out of range", value)))
    }

    /// Accept a string or a bare number, yielding its text
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => n.to_string(),
            Some(NumberOrString::Text(s)) => s,
            None => String::new(),
        })
    }

    /// Positive id as number or string; `""`, `null`, `0` and junk mean absent
    pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(serde_json::Value::String(s)) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        Ok(id.filter(|id| *id > 0))
    }

    /// An object, or nothing when the provider sends `[]`/`null` instead
    pub fn object_or_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(value @ serde_json::Value::Object(_)) => {
                serde_json::from_value(value).map(Some).map_err(D::Error::custom)
            }
            _ => Ok(None),
        }
    }
}
