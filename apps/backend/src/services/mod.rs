pub mod role_name;
pub mod users;
