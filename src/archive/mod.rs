pub mod chunking;
pub mod error;
pub mod open_meteo;
pub mod resample;
pub mod series_builder;
pub mod series_cache;
pub mod source;

#[cfg(test)]
pub mod testing;
