//! The fixed "Generate 4 Buildings" plan.
//!
//! Four building prefixes with twenty numbered units each, in creation order:
//! `A-Unit01 … A-Unit20, B-Unit01 … D-Unit20`.

/// Building prefixes, in generation order.
pub const BUILDING_PREFIXES: [&str; 4] = ["A", "B", "C", "D"];

/// Units generated per building.
pub const UNITS_PER_BUILDING: usize = 20;

/// One unit to create during bulk generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedUnit {
    /// Unit name, e.g. `C-Unit07`.
    pub name: String,
    /// Address, e.g. `Building C, Unit 07`.
    pub address: String,
}

/// Name of the `number`-th unit (1-based) of a building.
#[must_use]
pub fn unit_name(prefix: &str, number: usize) -> String {
    format!("{prefix}-Unit{number:02}")
}

/// The full ordered plan: every prefix × units `01..=20`.
pub fn bulk_unit_plan() -> impl Iterator<Item = PlannedUnit> {
    BUILDING_PREFIXES.iter().flat_map(|prefix| {
        (1..=UNITS_PER_BUILDING).map(move |n| PlannedUnit {
            name: unit_name(prefix, n),
            address: format!("Building {prefix}, Unit {n:02}"),
        })
    })
}
