//! Pending sales: list, add, edit, delete, clear and export.
//!
//! ## Add
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /api/ventas ──► fewer than 20 pending? ──no──► PendingLimitReached │
//! │        │ yes                                                            │
//! │        ▼                                                                │
//! │  --id given? ──no──► assign(--tipo, list price)                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  SaleInput::build(price form, catalog) ──► POST /api/ventas             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use mostrador_client::CatalogSession;
use mostrador_core::sale::{notes_for_mode, SaleInput, SaleRecord, SalesSummary};
use mostrador_core::validation::validate_pending_capacity;
use mostrador_core::{PaymentMethod, PriceForm, SaleMode};
use serde_json::json;

use super::price::PriceArgs;
use super::today;
use crate::output::{self, opt, Output};
use crate::parse;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum SalesCommand {
    /// List pending sales and the day's totals
    List {
        /// Day for the summary (default: today)
        #[arg(long, value_parser = parse::date)]
        fecha: Option<NaiveDate>,
    },
    /// Add a pending sale
    Add(SaleArgs),
    /// Edit a pending sale; omitted fields keep their value
    Edit {
        /// Position in `sales list`
        index: usize,
        #[command(flatten)]
        sale: SaleArgs,
    },
    /// Delete a pending sale
    Delete {
        /// Position in `sales list`
        index: usize,
    },
    /// Delete every pending sale
    Clear,
    /// Export pending sales to the history
    Export,
}

#[derive(Args)]
pub struct SaleArgs {
    /// Sale date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse::date)]
    pub fecha: Option<NaiveDate>,

    /// Product identifier; assigned from --tipo and the list price when omitted
    #[arg(long)]
    pub id: Option<String>,

    /// Product type used to assign the identifier
    #[arg(long)]
    pub tipo: Option<String>,

    /// Display name (default: catalog name)
    #[arg(long)]
    pub nombre: Option<String>,

    #[arg(long)]
    pub unidades: Option<i64>,

    /// Efectivo, Debito, Credito, Transferencia or any other label
    #[arg(long, value_parser = parse::payment)]
    pub pago: Option<PaymentMethod>,

    #[arg(long)]
    pub notas: Option<String>,

    #[command(flatten)]
    pub price: PriceArgs,
}

pub async fn run(state: &AppState, cmd: SalesCommand, out: &Output) -> Result<()> {
    match cmd {
        SalesCommand::List { fecha } => list(state, fecha.unwrap_or_else(today), out).await,
        SalesCommand::Add(args) => add(state, &args, out).await,
        SalesCommand::Edit { index, sale } => edit(state, index, &sale, out).await,
        SalesCommand::Delete { index } => {
            state.client.delete_sale(index).await?;
            out.emit(&json!({"deleted": index}), || println!("Venta {index} eliminada"))
        }
        SalesCommand::Clear => {
            state.client.clear_sales().await?;
            out.emit(&json!({"cleared": true}), || println!("Ventas vaciadas"))
        }
        SalesCommand::Export => {
            let outcome = state.client.export().await?;
            let message = outcome
                .message
                .unwrap_or_else(|| "Exportación completada".to_string());
            out.emit(&json!({"message": message}), || println!("{message}"))
        }
    }
}

async fn list(state: &AppState, day: NaiveDate, out: &Output) -> Result<()> {
    let sales = state.client.sales().await?;
    let summary = SalesSummary::compute(&sales, day);

    out.emit(&json!({"sales": sales, "summary": summary}), || {
        for (index, sale) in sales.iter().enumerate() {
            println!(
                "{index:>3}  {}  {:<6} {:<28} {:>12} x{:<3} {:>14}  {:<14} {}",
                output::date(sale.date),
                sale.id,
                sale.name,
                sale.unit_price.to_string(),
                sale.units,
                opt(sale.line_total()),
                sale.payment.to_string(),
                opt(sale.notes.as_deref()),
            );
        }
        println!();
        println!(
            "{}: {} ventas, {} (promedio {})",
            output::date(day),
            summary.count,
            summary.revenue,
            summary.average
        );
        println!(
            "Pendientes: {} ventas, {}",
            summary.pending_count, summary.pending_total
        );
    })
}

async fn add(state: &AppState, args: &SaleArgs, out: &Output) -> Result<()> {
    let pending = state.client.sales().await?;
    validate_pending_capacity(pending.len())?;

    let session = state.session().await?;
    let mode = args.price.mode.unwrap_or_default();
    let mut form = PriceForm::new();
    args.price.apply(&mut form, mode);

    let id = match args.id.as_deref().filter(|id| !id.trim().is_empty()) {
        Some(id) => id.to_string(),
        None => assign_id(&session, args, &form)?,
    };

    let input = SaleInput {
        date: Some(args.fecha.unwrap_or_else(today)),
        id,
        name: args.nombre.clone().unwrap_or_default(),
        units: args.unidades,
        payment: args.pago.clone(),
        notes: notes_for_mode(args.notas.as_deref().unwrap_or_default(), mode),
    };
    let sale = input.build(&form, session.catalog())?;
    state.client.add_sale(&sale).await?;

    out.emit(&sale, || print_saved("Venta agregada", &sale))
}

async fn edit(state: &AppState, index: usize, args: &SaleArgs, out: &Output) -> Result<()> {
    let pending = state.client.sales().await?;
    let existing = pending
        .get(index)
        .ok_or_else(|| anyhow!("no pending sale at position {index} ({} pending)", pending.len()))?;

    let session = state.session().await?;
    let mode = args.price.mode.unwrap_or(if existing.is_exchange() {
        SaleMode::Exchange
    } else {
        SaleMode::Sale
    });
    let mut form = PriceForm::new();
    form.load_existing(existing.unit_price);
    args.price.apply(&mut form, mode);

    let id = match (args.id.as_deref(), args.tipo.as_deref()) {
        (Some(id), _) if !id.trim().is_empty() => id.to_string(),
        (_, Some(_)) => assign_id(&session, args, &form)?,
        _ => existing.id.clone(),
    };

    let input = SaleInput {
        date: Some(args.fecha.unwrap_or(existing.date)),
        id,
        name: args.nombre.clone().unwrap_or_else(|| existing.name.clone()),
        units: Some(args.unidades.unwrap_or(existing.units.abs())),
        payment: Some(args.pago.clone().unwrap_or_else(|| existing.payment.clone())),
        notes: notes_for_mode(
            args.notas
                .as_deref()
                .or(existing.notes.as_deref())
                .unwrap_or_default(),
            mode,
        ),
    };
    let sale = input.build(&form, session.catalog())?;
    state
        .client
        .update_sale(index, &sale)
        .await
        .with_context(|| format!("updating pending sale {index}"))?;

    out.emit(&sale, || print_saved("Venta actualizada", &sale))
}

fn assign_id(session: &CatalogSession, args: &SaleArgs, form: &PriceForm) -> Result<String> {
    let Some(tipo) = args.tipo.as_deref() else {
        bail!("pass --id or --tipo with --precio");
    };
    let price = form
        .base_price()
        .context("--precio is needed to assign the identifier")?;
    Ok(session.assign(tipo, price.to_decimal())?.to_string())
}

fn print_saved(label: &str, sale: &SaleRecord) {
    println!(
        "{label}: {} {} x{} a {} ({}) = {}",
        sale.id,
        sale.name,
        sale.units,
        sale.unit_price,
        sale.payment,
        opt(sale.line_total())
    );
}
