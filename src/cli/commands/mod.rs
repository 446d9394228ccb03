mod import;
mod user;

pub use import::cmd_import_legacy;
pub use user::cmd_user_add;
