pub mod archive;
pub mod collector;
pub mod exclusion;
pub mod locker;
pub mod paths;
pub mod timestamp;
