pub mod ratio;
pub mod snapshots;
pub mod timeseries;
pub mod volumes;
