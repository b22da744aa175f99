pub mod config;
pub mod diagnostics;
pub mod error;
pub mod property;
pub mod types;

pub use config::*;
pub use diagnostics::*;
pub use error::TestXmlError;
pub use property::PropertyMap;
pub use types::*;
