pub mod data_exchange;
pub mod jobs;
