pub mod resource;
pub mod utils;
