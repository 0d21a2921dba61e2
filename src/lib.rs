pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::view_url;
pub use frameworks::runtime::{ViewRuntime, run, run_with_config, start};
