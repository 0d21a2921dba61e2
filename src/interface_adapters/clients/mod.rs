pub mod view;

pub use view::{ViewClient, ViewClientError};
