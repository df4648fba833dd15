//! Typed view of the PokeAPI `pokemon` resource
//!
//! Only the fields the Pokédex renders are modelled; everything else in the
//! response body is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Highest base stat value a Pokémon can realistically have
pub const MAX_BASE_STAT: u32 = 255;

/// Stats shown in the Pokédex summary, in display order
pub const TRACKED_STATS: [&str; 4] = ["hp", "attack", "defense", "speed"];

/// A `{ name, url }` reference to another API resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

/// A Pokémon as returned by `GET /api/v2/pokemon/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl Pokemon {
    /// Name with its first letter upper-cased
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// National dex number, e.g. `No. 025`
    pub fn dex_number(&self) -> String {
        format!("No. {:03}", self.id)
    }

    /// Base value of a stat by its API name
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats.iter().find(|s| s.stat.name == name).map(|s| s.base_stat)
    }

    /// Tracked stats in display order; missing stats are skipped
    pub fn tracked_stats(&self) -> Vec<(&'static str, u32)> {
        TRACKED_STATS.iter().filter_map(|name| self.stat(name).map(|v| (*name, v))).collect()
    }

    /// Capitalized type names ordered by slot
    pub fn type_names(&self) -> Vec<String> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|t| t.slot);
        slots.iter().map(|t| capitalize(&t.type_ref.name)).collect()
    }

    /// Ability names with hyphens as spaces, title-cased
    pub fn ability_names(&self) -> Vec<String> {
        self.abilities.iter().map(|a| title_case(&a.ability.name.replace('-', " "))).collect()
    }

    /// Official artwork if present, otherwise the default sprite
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
            .or(self.sprites.front_default.as_deref())
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}

/// Fraction of the stat scale a value fills, clamped to 1.0
pub fn stat_ratio(value: u32) -> f64 {
    (f64::from(value) / f64::from(MAX_BASE_STAT)).min(1.0)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn title_case(text: &str) -> String {
    text.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}
