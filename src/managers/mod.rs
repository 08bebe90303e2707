pub mod backup;
pub mod logging;
pub mod reporter;
pub mod retention;
