pub mod model;
pub mod validation;
pub mod view;
