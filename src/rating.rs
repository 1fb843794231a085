use crate::model::FactionRecord;

/// Map a quality index onto the faction's rating label.
///
/// Factions with a single rating level impose no rating constraint and yield
/// `None`. Otherwise the index saturates into the faction's rating system, so
/// out-of-range values resolve to the worst or best label instead of failing.
pub fn resolve_rating(faction: &FactionRecord, quality: i32) -> Option<&str> {
    if faction.rating_levels.len() == 1 {
        return None;
    }
    let system = faction.rating_level_system();
    let last = system.len().checked_sub(1)?;
    let index = usize::try_from(quality.max(0)).map_or(last, |q| q.min(last));
    system.get(index).copied()
}
