pub mod config;
pub mod error;
pub mod ranking;
pub mod request;
pub mod scenario;
pub mod view;

pub use config::ScenegenConfig;
pub use error::{Result, ScenegenError};
