//! Stock report, reorder points and stock ingresses.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use mostrador_core::catalog::normalize_type_name;
use mostrador_core::stock::{StockIngressInput, StockReport, StockReportRow};
use mostrador_core::validation::validate_reorder_point;
use mostrador_core::{BandRule, Catalog};
use serde_json::json;
use tracing::warn;

use super::today;
use crate::output::{self, opt, Output};
use crate::parse;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum StockCommand {
    /// Current stock per article with its reorder status
    Report {
        /// Only articles out of stock or at their reorder point
        #[arg(long)]
        alertas: bool,
    },
    /// Set the reorder point of an article (stored locally)
    Reorder {
        id: String,
        #[arg(allow_hyphen_values = true)]
        punto: i64,
    },
    /// List stock ingresses
    Ingresses,
    /// Record a stock ingress
    Ingress(IngressArgs),
    /// Edit a stock ingress
    EditIngress {
        /// Backend id of the ingress
        id: i64,
        #[command(flatten)]
        ingress: IngressArgs,
    },
    /// Delete a stock ingress
    DeleteIngress {
        /// Backend id of the ingress
        id: i64,
    },
}

#[derive(Args)]
pub struct IngressArgs {
    /// Ingress date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse::date)]
    pub fecha: Option<NaiveDate>,

    /// Article id; assigned from --tipo and --precio when omitted
    #[arg(long)]
    pub articulo: Option<String>,

    #[arg(long)]
    pub tipo: Option<String>,

    /// Reference sale price per unit
    #[arg(long, value_parser = parse::amount)]
    pub precio: Option<f64>,

    /// Cost per unit
    #[arg(long, value_parser = parse::amount)]
    pub costo: Option<f64>,

    #[arg(long)]
    pub cantidad: i64,

    /// Total cost; cost x quantity when omitted
    #[arg(long, value_parser = parse::amount)]
    pub total: Option<f64>,

    #[arg(long)]
    pub notas: Option<String>,
}

pub async fn run(state: &AppState, cmd: StockCommand, out: &Output) -> Result<()> {
    match cmd {
        StockCommand::Report { alertas } => report(state, alertas, out).await,
        StockCommand::Reorder { id, punto } => reorder(state, &id, punto, out).await,
        StockCommand::Ingresses => {
            let ingresses = state.client.stock_ingresses().await?;
            out.emit(&ingresses, || {
                for i in &ingresses {
                    println!(
                        "{:>5}  {}  {:<6} {:<20} {:>4} u  costo {:>12}  total {:>14}  {}",
                        opt(i.id),
                        output::date(i.date),
                        i.article_id,
                        i.product_type,
                        i.quantity,
                        i.unit_cost.to_string(),
                        i.total_cost.to_string(),
                        opt(i.notes.as_deref()),
                    );
                }
            })
        }
        StockCommand::Ingress(args) => {
            let input = ingress_input(state, &args).await?;
            let ingress = input.build()?;
            state.client.create_ingress(&ingress).await?;
            out.emit(&ingress, || {
                println!(
                    "Ingreso registrado: {} x{} ({})",
                    ingress.article_id, ingress.quantity, ingress.total_cost
                )
            })
        }
        StockCommand::EditIngress { id, ingress } => {
            let input = ingress_input(state, &ingress).await?;
            let mut ingress = input.build()?;
            ingress.id = Some(id);
            state.client.update_ingress(id, &ingress).await?;
            out.emit(&ingress, || println!("Ingreso {id} actualizado"))
        }
        StockCommand::DeleteIngress { id } => {
            state.client.delete_ingress(id).await?;
            out.emit(&json!({"deleted": id}), || println!("Ingreso {id} eliminado"))
        }
    }
}

async fn report(state: &AppState, only_alerts: bool, out: &Output) -> Result<()> {
    let catalog = state.client.catalog().await?;
    let levels = state.client.stock_levels().await?;
    let points = state.db().await?.reorder_points().all().await?;

    let report = StockReport::build(&catalog, &levels, &points);
    let rows: Vec<&StockReportRow> = if only_alerts {
        report.needing_attention().collect()
    } else {
        report.rows.iter().collect()
    };

    out.emit(&rows, || {
        for row in &rows {
            println!(
                "{:<6} {:<28} {:<16} {:>6} {:>12}  punto {:>4}  {}",
                row.id,
                row.name,
                row.product_type,
                row.quantity,
                row.average_cost.to_string(),
                row.reorder_point,
                row.status
            );
        }
    })
}

async fn reorder(state: &AppState, id: &str, point: i64, out: &Output) -> Result<()> {
    let point = validate_reorder_point(point)?;
    let id = id.trim().to_uppercase();
    state.db().await?.reorder_points().set(&id, point).await?;

    // Status from the live quantity; the point is saved even if this fails.
    let status = match state.client.stock_levels().await {
        Ok(levels) => {
            let mut report = StockReport::build(&Catalog::default(), &levels, &Default::default());
            report.set_reorder_point(&id, point)
        }
        Err(e) => {
            warn!(error = %e, "Could not read stock levels");
            None
        }
    };

    out.emit(&json!({"id": id, "reorder_point": point, "status": status}), || {
        println!("Punto de pedido de {id}: {point}  {}", opt(status))
    })
}

/// Fills the article id (and type) the way the ingress form does: an
/// explicit id wins, otherwise it is assigned from type and reference price
/// with thresholds as inclusive upper bounds.
async fn ingress_input(state: &AppState, args: &IngressArgs) -> Result<StockIngressInput> {
    let explicit = args.articulo.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let tipo = args.tipo.as_deref().map(str::trim).unwrap_or_default();

    let (article_id, product_type) = match explicit {
        Some(id) if !tipo.is_empty() => (id.to_string(), tipo.to_string()),
        Some(id) => {
            // Type comes from the catalog when not given.
            let catalog = state.client.catalog().await?;
            let tipo = catalog
                .get(id)
                .and_then(|p| p.tipo.as_deref())
                .map(normalize_type_name)
                .unwrap_or_default();
            (id.to_string(), tipo)
        }
        None => {
            if tipo.is_empty() {
                bail!("pass --articulo or --tipo with --precio");
            }
            let price = args.precio.context("--precio is needed to assign the article id")?;
            let session = state.session().await?;
            let id = session.assign_with(BandRule::UpperBoundInclusive, tipo, price)?;
            (id.to_string(), tipo.to_string())
        }
    };

    Ok(StockIngressInput {
        date: Some(args.fecha.unwrap_or_else(today)),
        article_id,
        product_type,
        unit_price: args.precio,
        unit_cost: args.costo,
        quantity: args.cantidad,
        total_cost: args.total,
        notes: args.notas.clone().unwrap_or_default(),
    })
}
