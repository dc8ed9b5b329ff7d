#[allow(clippy::module_inception)]
mod component;
pub mod legend;
pub mod logs;
pub mod nav_tabs;
pub mod opcounters;

pub use component::Component;
