pub mod data_uri;
pub mod state_ops;
