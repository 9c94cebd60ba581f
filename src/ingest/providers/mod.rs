pub mod scripted;
pub mod status_page;

pub use scripted::ScriptedLoader;
pub use status_page::{FixtureLoader, StatusPageLoader};
