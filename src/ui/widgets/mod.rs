pub mod category;
pub mod marquee;
pub mod stage;

pub use category::CategoryToggle;
pub use marquee::Marquee;
pub use stage::JokeStage;
