pub mod apod;
pub mod neo;
pub mod record;
