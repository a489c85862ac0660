pub mod food;

pub use food::FoodValidationError;
