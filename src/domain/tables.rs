use crate::models::Table;

/// Tables that can seat `party_size`, in input order.
///
/// The availability flag is not consulted here; callers filter on it before
/// letting a table be picked.
pub fn available_tables(
    tables: &[Table],
    party_size: i32,
) -> impl Iterator<Item = &Table> + Clone {
    tables.iter().filter(move |t| t.capacity >= party_size)
}
