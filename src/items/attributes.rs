//! Attribute derivation
//!
//! Turns the raw stat block into the list shown to players: provider names are
//! renamed to their in-game spelling and stat deltas that only exist as buff
//! prose (e.g. "+5% Critical Damage") are folded in.

use super::record::{AttributeModifier, RawItemRecord};

/// In-game spelling of a provider attribute name
pub fn display_name(raw: &str) -> &str {
    match raw {
        "CritDamage" => "Critical Damage",
        "ConditionDamage" => "Condition Damage",
        "Healing" => "Healing Power",
        other => other,
    }
}

/// Rename every entry and merge entries that end up with the same name
pub fn rename_attributes(attributes: &[AttributeModifier]) -> Vec<AttributeModifier> {
    let mut out = Vec::with_capacity(attributes.len());
    for attr in attributes {
        accumulate(&mut out, display_name(&attr.attribute), attr.modifier);
    }
    out
}

/// Parse a buff modifier token such as `+5%`; anything malformed is 0
pub fn parse_modifier(token: &str) -> i32 {
    let token = token.trim();
    let token = token.strip_prefix('+').unwrap_or(token);
    let token = token.strip_suffix('%').unwrap_or(token);
    token.parse().unwrap_or(0)
}

/// Split one buff line into a modifier and a display attribute name
pub fn parse_buff_line(line: &str) -> Option<AttributeModifier> {
    let (token, attribute) = line.trim().split_once(char::is_whitespace)?;
    let attribute = attribute.trim();
    if attribute.is_empty() {
        return None;
    }
    Some(AttributeModifier::new(display_name(attribute), parse_modifier(token)))
}

/// Fold stat deltas described in buff text into an attribute list.
///
/// With no existing attributes every parsed line becomes an entry, in line
/// order. Otherwise lines only add to entries whose name already matches;
/// nothing new is appended. Repeated names accumulate either way.
pub fn merge_buff_into_attributes(
    attributes: &[AttributeModifier],
    buff_description: &str,
) -> Vec<AttributeModifier> {
    let mut merged = Vec::with_capacity(attributes.len());
    for attr in attributes {
        accumulate(&mut merged, &attr.attribute, attr.modifier);
    }

    let append = merged.is_empty();

    for line in buff_description.lines() {
        let Some(delta) = parse_buff_line(line) else {
            if !line.trim().is_empty() {
                log::debug!("Skipping buff line without an attribute: {:?}", line);
            }
            continue;
        };

        if append {
            accumulate(&mut merged, &delta.attribute, delta.modifier);
        } else if let Some(existing) = merged.iter_mut().find(|a| a.attribute == delta.attribute) {
            existing.modifier = existing.modifier.saturating_add(delta.modifier);
        }
    }

    merged
}

/// Display attributes for a record
pub fn derive_attributes(record: &RawItemRecord) -> Vec<AttributeModifier> {
    let renamed = rename_attributes(record.attributes());

    match record.buff().map(|buff| buff.description.as_str()) {
        Some(description) if !description.trim().is_empty() => {
            merge_buff_into_attributes(&renamed, description)
        }
        _ => renamed,
    }
}

fn accumulate(list: &mut Vec<AttributeModifier>, attribute: &str, modifier: i32) {
    match list.iter_mut().find(|a| a.attribute == attribute) {
        Some(existing) => existing.modifier = existing.modifier.saturating_add(modifier),
        None => list.push(AttributeModifier::new(attribute, modifier)),
    }
}
