pub mod feedback;
pub mod slide;

pub use feedback::*;
pub use slide::*;
