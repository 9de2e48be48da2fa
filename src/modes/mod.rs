pub mod autoplay;
pub mod human;

pub use autoplay::AutoplayMode;
pub use human::HumanMode;
