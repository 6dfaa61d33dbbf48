pub mod auth_button;
pub mod handlers;
pub mod header;
pub mod login_modal;
pub mod preview_area;
pub mod results;
pub mod upload_section;
pub mod utils;
