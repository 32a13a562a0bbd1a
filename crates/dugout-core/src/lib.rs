// Shared foundation: configuration, the factor set and weights, the CSV data
// model, static venue tables and backfill checkpoints.

pub mod checkpoint;
pub mod config;
pub mod data;
pub mod factor;
pub mod io;
pub mod venues;
pub mod weights;
