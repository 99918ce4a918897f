pub mod scripted;

pub use scripted::{ScriptedMediaPlatform, SimulatedStream};
