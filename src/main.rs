//! gw2items - Entry Point
//!
//! Looks up item ids through the file cache and prints what a tooltip would show.
//!
//! Usage: gw2items [--config PATH] <item_id>...

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use gw2items::{FileCache, HttpItemSource, Item, ItemResolver, ResolverConfig};

const DEFAULT_CONFIG: &str = "gw2items.ron";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config_path, ids) = parse_args(std::env::args().skip(1))?;
    let config = ResolverConfig::load(&config_path);

    let cache_dir = config.cache_directory();
    log::info!("Using item cache at {:?}", cache_dir);

    let source = Arc::new(HttpItemSource::new(&config));
    let cache = Arc::new(FileCache::new(cache_dir));
    let resolver = ItemResolver::new(config, source, cache);

    for id in ids {
        match resolver.resolve(id) {
            Some(item) => print_item(&resolver, &item),
            None => println!("{}: not found", id),
        }
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(PathBuf, Vec<u32>)> {
    let mut config_path = PathBuf::from(DEFAULT_CONFIG);
    let mut ids = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next().map(PathBuf::from).context("--config needs a path")?;
        } else {
            let id = arg
                .parse::<u32>()
                .with_context(|| format!("not an item id: {:?}", arg))?;
            ids.push(id);
        }
    }

    if ids.is_empty() {
        bail!("usage: gw2items [--config PATH] <item_id>...");
    }

    Ok((config_path, ids))
}

fn print_item(resolver: &ItemResolver, item: &Item) {
    println!("{}: {} [{}]", item.id(), item.name(), item.variant().name());
    println!("  rarity: {}", item.rarity());
    if let Some(level) = item.required_level() {
        println!("  required level: {}", level);
    }
    if let Some(status) = item.soulbound_status() {
        println!("  {}", status.label());
    }

    for attr in item.display_attributes() {
        // Critical Damage is a percentage in game
        let pct = if attr.attribute == "Critical Damage" { "%" } else { "" };
        println!("  +{}{} {}", attr.modifier, pct, attr.attribute);
    }

    for line in item.buff_lines() {
        println!("  {}", line);
    }

    if let Some(suffix) = resolver.suffixes().resolve_suffix(item) {
        println!("  slotted: {}", suffix.name());
        for line in suffix.buff_lines() {
            println!("    {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_ids() {
        let (path, ids) = parse_args(args(&["12452", "24554"])).unwrap();
        assert_eq!(path, PathBuf::from(DEFAULT_CONFIG));
        assert_eq!(ids, vec![12452, 24554]);
    }

    #[test]
    fn test_parse_config_flag() {
        let (path, ids) = parse_args(args(&["--config", "local.ron", "1"])).unwrap();
        assert_eq!(path, PathBuf::from("local.ron"));
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["sword"])).is_err());
        assert!(parse_args(args(&["--config"])).is_err());
    }
}
