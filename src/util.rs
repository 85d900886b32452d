//! Small helpers without a better place to live.

pub mod in_range_option;
