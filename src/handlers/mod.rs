pub mod classes;
pub mod orders;
pub mod token;
pub mod users;
