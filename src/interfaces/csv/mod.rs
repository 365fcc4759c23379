pub mod cart_reader;
pub mod currency_reader;
