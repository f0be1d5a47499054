pub mod demo;

pub use self::demo::{load_config, DemoConfig};
