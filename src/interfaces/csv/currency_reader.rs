use crate::domain::currency::Currency;
use crate::error::{CartError, Result};
use std::io::Read;

/// Reads currencies from a CSV source with an `id,title,name` header.
pub struct CurrencyReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CurrencyReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn currencies(self) -> impl Iterator<Item = Result<Currency>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CartError::from))
    }
}
