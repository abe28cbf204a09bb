pub mod pendulum;
pub mod lorenz;

pub use pendulum::Pendulum;
pub use lorenz::{Lorenz, LorenzParams};
