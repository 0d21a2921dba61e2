// Use cases layer: scene synchronization, animation loop and rendering.

pub mod connector;
pub mod render;
pub mod scene;
pub mod scene_task;
pub mod sync;
pub mod types;

pub use connector::{ConnectorSettings, connector_task};
pub use render::{RenderStats, render};
pub use scene::Scene;
pub use scene_task::scene_task;
pub use sync::SyncError;
pub use types::{FrameStats, SceneCommand, SceneSettings};
