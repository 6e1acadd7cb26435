//! Daily cash count ("arqueo de caja").

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use mostrador_core::cash::{cash_sales_total, reconcile, CashReconciliation};
use mostrador_core::Money;
use tracing::info;

use super::today;
use crate::output::{self, opt, Output};
use crate::parse;
use crate::state::AppState;

#[derive(Args)]
pub struct CashArgs {
    /// Day of the count, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse::date)]
    pub fecha: Option<NaiveDate>,

    /// Opening amount
    #[arg(long, value_parser = parse::amount)]
    pub apertura: Option<f64>,

    /// Closing amount; checked against the day's cash sales
    #[arg(long, value_parser = parse::amount)]
    pub cierre: Option<f64>,
}

pub async fn run(state: &AppState, args: &CashArgs, out: &Output) -> Result<()> {
    let date = args.fecha.unwrap_or_else(today);
    let db = state.db().await?;

    if args.apertura.is_none() && args.cierre.is_none() {
        let saved = db.cash_counts().get(date).await?;
        return out.emit(&saved, || match &saved {
            Some(count) => {
                println!("{}", output::date(date));
                println!("apertura  {}", opt(count.opening));
                println!("cierre    {}", opt(count.closing));
                println!("guardado  {}", count.saved_at.format("%d/%m/%Y %H:%M UTC"));
            }
            None => println!("Sin arqueo para {}", output::date(date)),
        });
    }

    let opening = args.apertura.and_then(Money::from_decimal);
    let closing = args.cierre.and_then(Money::from_decimal);

    // Cash sales only matter once a closing amount is given, and only when
    // nothing is left to export.
    let (cash_sales, pending) = if closing.is_some() {
        let pending = state.client.sales().await?.len();
        let cash_sales = if pending == 0 {
            cash_sales_total(state.client.history().await?.sales_on(date))
        } else {
            Money::zero()
        };
        (cash_sales, pending)
    } else {
        (Money::zero(), 0)
    };

    let outcome = reconcile(opening, closing, cash_sales, pending)?;
    if let Some(record) = outcome.to_record(Utc::now()) {
        db.cash_counts().save(date, &record).await?;
        info!(%date, "Cash count saved");
    }

    out.emit(&outcome, || println!("{outcome}"))?;
    if let CashReconciliation::Mismatch { .. } = outcome {
        bail!("cash count not saved");
    }
    Ok(())
}
