pub mod iex;
pub mod price_provider;
