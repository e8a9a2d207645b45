pub mod analytics;
pub mod asset;
pub mod holding;
pub mod price;
pub mod rates;
pub mod returns;
pub mod settings;
