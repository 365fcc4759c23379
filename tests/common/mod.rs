#![allow(dead_code)]

use nftcart::domain::cart::{CartItem, Price, Rating};
use nftcart::domain::currency::Currency;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

pub fn item(id: &str, price: Decimal) -> CartItem {
    CartItem::new(id, format!("NFT {id}"), Price::new(price).unwrap(), Rating::new(3).unwrap())
}

pub fn currencies() -> Vec<Currency> {
    vec![
        Currency::new("btc", "Bitcoin", "BTC"),
        Currency::new("eth", "Ethereum", "ETH"),
    ]
}

pub fn write_fixture(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}
