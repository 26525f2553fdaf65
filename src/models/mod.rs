pub mod config;
pub mod error;
pub mod hash;
pub mod memory;
pub mod password;
pub mod postgres;
pub mod service;
pub mod store;
pub mod token;
pub mod user;
pub mod validator;

pub use config::UserConfig;
pub use error::{Error, Result};
pub use hash::Hmac;
pub use memory::MemoryUserStore;
pub use password::{PasswordCost, PasswordHasher};
pub use postgres::PgUserStore;
pub use service::UserService;
pub use store::UserStore;
pub use user::User;
pub use validator::{Step, UserValidator, CREATE_STEPS, DELETE_STEPS, UPDATE_STEPS};
