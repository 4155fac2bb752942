pub mod controller;
pub mod view;

pub use controller::MutationController;
pub use view::ClientView;
