pub mod expand;
pub mod flatten;
pub mod schema;
pub mod validate;
