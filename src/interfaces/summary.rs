use crate::application::{CartViewModel, PaymentViewModel};
use crate::domain::payment::PaymentStatus;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Final state of a checkout session, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    pub items: usize,
    /// Cart total rounded to two decimals.
    pub total: String,
    pub currency: Option<String>,
    pub status: PaymentStatus,
}

impl CheckoutSummary {
    pub fn collect(cart: &CartViewModel, payment: &PaymentViewModel) -> Result<Self> {
        Ok(Self {
            items: cart.count(),
            total: cart.total_price()?.to_string(),
            currency: payment.selected_currency_id(),
            status: payment.payment_status().get(),
        })
    }
}

/// Writes a [`CheckoutSummary`] as CSV or JSON.
pub struct SummaryWriter<W: Write> {
    sink: W,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_csv(self, summary: &CheckoutSummary) -> Result<()> {
        let mut writer = csv::Writer::from_writer(self.sink);
        writer.serialize(summary)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_json(mut self, summary: &CheckoutSummary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.sink, summary)?;
        writeln!(self.sink)?;
        Ok(())
    }
}
