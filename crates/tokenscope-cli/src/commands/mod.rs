pub mod apply;
pub mod show;
