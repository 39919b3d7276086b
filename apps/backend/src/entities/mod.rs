pub mod roles;
pub mod users;

pub use roles::Entity as Roles;
pub use roles::Model as Role;
pub use users::Entity as Users;
pub use users::Model as User;
