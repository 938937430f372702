pub mod coerce;
pub mod keys;
