mod login;
mod register;
pub mod utils;

pub use login::login;
pub use register::register;
