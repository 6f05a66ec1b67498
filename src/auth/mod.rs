pub mod authorizor;
mod journal;
mod user;

pub use journal::Journal;
pub use user::User;
