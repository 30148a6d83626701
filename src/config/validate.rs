//! Consistency checks run on freshly loaded settings and rules.

use super::ConfigError;
use crate::models::{FactionLevelRule, RuleSet, Settings, ZoneRule};
use crate::services::npcs::skills::SKILL_FLOOR;

pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    let ratio = settings.leveled_lists.split_ratio;
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(ConfigError::invalid(
            "settings",
            format!("leveled_lists.split_ratio must be between 0 and 1, got {}", ratio),
        ));
    }
    if settings.npcs.max_skill_level < SKILL_FLOOR {
        return Err(ConfigError::invalid(
            "settings",
            format!(
                "npcs.max_skill_level must be at least {}, got {}",
                SKILL_FLOOR, settings.npcs.max_skill_level
            ),
        ));
    }
    if settings.general.patch_plugin.trim().is_empty() {
        return Err(ConfigError::invalid("settings", "general.patch_plugin is empty"));
    }
    Ok(())
}

pub fn validate_rules(rules: &RuleSet) -> Result<(), ConfigError> {
    for (document, zones) in [("zones_by_edid", &rules.zones_by_edid), ("zones_by_keyword", &rules.zones_by_keyword)] {
        for (index, zone) in zones.iter().enumerate() {
            validate_zone(zone).map_err(|message| ConfigError::invalid(document, format!("rule {}: {}", index, message)))?;
        }
    }
    for (index, rule) in rules.npcs_by_faction.iter().enumerate() {
        validate_faction(rule)
            .map_err(|message| ConfigError::invalid("npcs_by_faction", format!("rule {}: {}", index, message)))?;
    }
    Ok(())
}

fn validate_zone(zone: &ZoneRule) -> Result<(), String> {
    if zone.min_level > zone.max_level {
        return Err(format!(
            "min_level {} is above max_level {}",
            zone.min_level, zone.max_level
        ));
    }
    if let Some(range) = zone.range {
        if range < 0 || range > zone.max_level - zone.min_level {
            return Err(format!(
                "range {} does not fit between {} and {}",
                range, zone.min_level, zone.max_level
            ));
        }
    }
    Ok(())
}

fn validate_faction(rule: &FactionLevelRule) -> Result<(), String> {
    if rule.level.is_some() {
        return Ok(());
    }
    match (rule.min_level, rule.max_level) {
        (Some(min), Some(max)) if min <= max => Ok(()),
        (Some(min), Some(max)) => Err(format!("min_level {} is above max_level {}", min, max)),
        _ => Err("needs either level or both min_level and max_level".to_string()),
    }
}
