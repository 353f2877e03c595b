pub mod money;
pub mod text;
pub mod time_utils;
