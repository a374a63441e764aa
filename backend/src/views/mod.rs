pub mod navbar;
pub mod sidebar;
pub mod utils;
