//! Stat ids the engine interprets itself.

pub const STRENGTH: u16 = 0;
pub const DEFENSE_PERCENT: u16 = 16;
pub const ENHANCED_DAMAGE: u16 = 17;
pub const MIN_DAMAGE: u16 = 21;
pub const MAX_DAMAGE: u16 = 22;
pub const DEFENSE: u16 = 31;
pub const MAX_DURABILITY: u16 = 73;
pub const MAX_DURABILITY_PERCENT: u16 = 75;
pub const REQUIREMENTS_PERCENT: u16 = 91;
pub const UNDEAD_DAMAGE: u16 = 122;
pub const INDESTRUCTIBLE: u16 = 152;
pub const BONUS_SOCKETS: u16 = 194;
/// Defense per character level, in eighths.
pub const DEFENSE_PER_LEVEL: u16 = 214;
/// Maximum damage per character level, in eighths.
pub const MAX_DAMAGE_PER_LEVEL: u16 = 218;
