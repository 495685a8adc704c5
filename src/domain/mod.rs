// Domain layer - Canonical record, track types and numeric coercion

pub mod coerce;
pub mod model;
