pub mod helper;
pub mod objects;
pub mod session;
pub mod utils;
