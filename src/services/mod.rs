pub mod price_service;
pub mod returns_service;
pub mod validation_service;
