//! The fixed ALttP MSU-1 track list.
//!
//! Track numbers, titles and loop behaviour come from the community track
//! list for the ALttP randomizer. Ids 35-61 are the "extended" tracks that
//! only some packs provide; each of them has a generic track it falls back to.

/// A track slot number, 1..=61. Zero is used by the observer for "unknown".
pub type TrackId = u8;

pub const TRACK_COUNT: TrackId = 61;
pub const FIRST_EXTENDED: TrackId = 35;

const LIGHT_WORLD: TrackId = 2;
const DARK_WORLD: TrackId = 9;
const CASTLE: TrackId = 16;
const LIGHT_WORLD_DUNGEON: TrackId = 17;
const BOSS: TrackId = 21;
const DARK_WORLD_DUNGEON: TrackId = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: TrackId,
    pub title: &'static str,
    pub looping: bool,
}

const fn track(id: TrackId, title: &'static str, looping: bool) -> TrackInfo {
    TrackInfo { id, title, looping }
}

static CATALOG: [TrackInfo; TRACK_COUNT as usize] = [
    track(1, "Opening Theme", false),
    track(2, "Light World Overworld", true),
    track(3, "Rain State Overworld", true),
    track(4, "Bunny Overworld", true),
    track(5, "Lost Woods", true),
    track(6, "Prologue", true),
    track(7, "Kakariko", true),
    track(8, "Portal", false),
    track(9, "Dark World Overworld", true),
    track(10, "Pull Pedestal", false),
    track(11, "File Select/Game Over", true),
    track(12, "Guards Summoned", true),
    track(13, "Dark Death Mountain", true),
    track(14, "Minigame", true),
    track(15, "Skull Woods Overworld", true),
    track(16, "Castle", true),
    track(17, "Light World Dungeon", true),
    track(18, "Cave", true),
    track(19, "Boss Victory", false),
    track(20, "Sanctuary", true),
    track(21, "Boss", true),
    track(22, "Dark World Dungeon", true),
    track(23, "Shop/Fortune Teller", true),
    track(24, "Cave 2", true),
    track(25, "Zelda's Rescue", true),
    track(26, "Crystal Cutscene", true),
    track(27, "Fairy Fountain", true),
    track(28, "Agahnim's Theme", true),
    track(29, "Ganon Reveals Himself", false),
    track(30, "Agahnim's Theme (drop in to Ganon)", true),
    track(31, "Ganon Fight", true),
    track(32, "Triforce Room", true),
    track(33, "Ending Sequence", false),
    track(34, "Credits", false),
    track(35, "Eastern Palace", true),
    track(36, "Desert Palace", true),
    track(37, "Agahnim's Tower", true),
    track(38, "Swamp Palace", true),
    track(39, "Palace of Darkness", true),
    track(40, "Misery Mire", true),
    track(41, "Skull Woods", true),
    track(42, "Ice Palace", true),
    track(43, "Tower of Hera", true),
    track(44, "Thieves' Town", true),
    track(45, "Turtle Rock", true),
    track(46, "Ganon's Tower", true),
    track(47, "Boss Eastern Palace", true),
    track(48, "Boss Desert Palace", true),
    track(49, "Boss Agahnim's Tower", true),
    track(50, "Boss Swamp Palace", true),
    track(51, "Boss Palace of Darkness", true),
    track(52, "Boss Misery Mire", true),
    track(53, "Boss Skull Woods", true),
    track(54, "Boss Ice Palace", true),
    track(55, "Boss Tower of Hera", true),
    track(56, "Boss Thieves' Town", true),
    track(57, "Boss Turtle Rock", true),
    track(58, "Boss Ganon's Tower", true),
    track(59, "Ganon's Tower 2", true),
    track(60, "Light World 2", true),
    track(61, "Dark World 2", true),
];

pub fn all() -> &'static [TrackInfo] {
    &CATALOG
}

pub fn get(id: TrackId) -> Option<&'static TrackInfo> {
    if id == 0 {
        return None;
    }
    CATALOG.get(usize::from(id) - 1)
}

/// Title for log lines, e.g. `"17 - Light World Dungeon"`.
pub fn title(id: TrackId) -> String {
    match get(id) {
        Some(t) => format!("{} - {}", t.id, t.title),
        None => format!("{id} - Unknown"),
    }
}

pub fn is_looping(id: TrackId) -> bool {
    get(id).map(|t| t.looping).unwrap_or(false)
}

pub fn is_extended(id: TrackId) -> bool {
    (FIRST_EXTENDED..=TRACK_COUNT).contains(&id)
}

/// Generic track an extended track falls back to when a pack lacks it.
pub fn backup_for(id: TrackId) -> Option<TrackId> {
    match id {
        35 | 36 | 43 => Some(LIGHT_WORLD_DUNGEON),
        37 => Some(CASTLE),
        38..=42 | 44..=46 | 59 => Some(DARK_WORLD_DUNGEON),
        47..=58 => Some(BOSS),
        60 => Some(LIGHT_WORLD),
        61 => Some(DARK_WORLD),
        _ => None,
    }
}
