use crate::domain::cart::{CartItem, Price, Rating};
use crate::error::{CartError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of a cart fixture. Images are `;`-separated URLs.
#[derive(Debug, Deserialize)]
struct CartItemRecord {
    id: String,
    name: String,
    price: Decimal,
    rating: u8,
    #[serde(default)]
    images: Option<String>,
}

impl TryFrom<CartItemRecord> for CartItem {
    type Error = CartError;

    fn try_from(record: CartItemRecord) -> Result<Self> {
        let images = record
            .images
            .map(|images| {
                images
                    .split(';')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(CartItem::new(
            record.id,
            record.name,
            Price::new(record.price)?,
            Rating::new(record.rating)?,
        )
        .with_images(images))
    }
}

/// Reads cart items from a CSV source with an `id,name,price,rating,images`
/// header.
///
/// Rows are validated as they are read; a bad row yields an error without
/// stopping the stream.
pub struct CartItemReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CartItemReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn items(self) -> impl Iterator<Item = Result<CartItem>> {
        self.reader
            .into_deserialize::<CartItemRecord>()
            .map(|result| result.map_err(CartError::from).and_then(CartItem::try_from))
    }
}
