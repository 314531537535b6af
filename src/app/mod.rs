pub mod controller;
pub mod session;

pub use controller::SessionController;
pub use session::{Session, TurnInput};
