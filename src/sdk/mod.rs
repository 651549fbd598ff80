pub mod config;
pub mod narration;
pub mod routing;
pub mod util;
