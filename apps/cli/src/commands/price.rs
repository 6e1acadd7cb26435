//! The price form: list price, discount and final price kept consistent.

use anyhow::Result;
use clap::Args;
use mostrador_core::{PriceForm, SaleMode};

use crate::output::{opt, Output};
use crate::parse;

/// Price fields, applied to the form in the order a cashier would type
/// them: mode, list price, discount, final price.
#[derive(Args, Debug, Clone, Default)]
pub struct PriceArgs {
    /// List price (Spanish notation, e.g. 12.500 or 1.234,50)
    #[arg(long = "precio", value_parser = parse::amount)]
    pub base: Option<f64>,

    /// Discount percentage, 0 to 100
    #[arg(long = "descuento", value_parser = parse::percentage)]
    pub discount: Option<f64>,

    /// Final price; the list price is derived back from it
    #[arg(long = "final", value_parser = parse::amount)]
    pub final_price: Option<f64>,

    /// venta or cambio
    #[arg(long = "modo")]
    pub mode: Option<SaleMode>,
}

impl PriceArgs {
    pub fn has_prices(&self) -> bool {
        self.base.is_some() || self.discount.is_some() || self.final_price.is_some()
    }

    pub fn apply(&self, form: &mut PriceForm, mode: SaleMode) {
        form.on_mode_changed(mode);
        if let Some(base) = self.base {
            form.on_base_price_edited(base);
        }
        if let Some(discount) = self.discount {
            form.on_discount_edited(discount);
        }
        if let Some(final_price) = self.final_price {
            form.on_final_price_edited(final_price);
        }
    }

    /// A fresh form with these fields applied.
    pub fn form(&self) -> PriceForm {
        let mut form = PriceForm::new();
        self.apply(&mut form, self.mode.unwrap_or_default());
        form
    }
}

pub fn run(args: &PriceArgs, out: &Output) -> Result<()> {
    let snapshot = args.form().snapshot();
    out.emit(&snapshot, || {
        println!("modo         {}", snapshot.mode);
        println!("precio       {}", opt(snapshot.base_price));
        println!("descuento    {}", snapshot.discount);
        println!("precio final {}", opt(snapshot.final_price));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::Money;

    #[test]
    fn test_discount_then_final() {
        let args = PriceArgs {
            base: Some(1000.0),
            discount: Some(10.0),
            ..PriceArgs::default()
        };
        let form = args.form();
        assert_eq!(form.final_price(), Some(Money::from_cents(90_000)));

        let args = PriceArgs {
            final_price: Some(800.0),
            discount: Some(20.0),
            ..PriceArgs::default()
        };
        assert_eq!(args.form().base_price(), Some(Money::from_cents(100_000)));
    }

    #[test]
    fn test_exchange_ignores_discount() {
        let args = PriceArgs {
            base: Some(500.0),
            discount: Some(30.0),
            mode: Some(SaleMode::Exchange),
            ..PriceArgs::default()
        };
        let form = args.form();
        assert!(form.discount().is_zero());
        assert_eq!(form.final_price(), Some(Money::from_cents(50_000)));
        assert!(args.has_prices());
        assert!(!PriceArgs::default().has_prices());
    }
}
