//! Sales dashboard over the exported history.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use mostrador_core::dashboard::{Breakdown, DashboardSummary, DateRange};

use super::today;
use crate::output::{self, Output};
use crate::parse;
use crate::state::AppState;

#[derive(Args)]
pub struct DashboardArgs {
    /// First day, inclusive
    #[arg(long, value_parser = parse::date)]
    pub desde: Option<NaiveDate>,

    /// Last day, inclusive
    #[arg(long, value_parser = parse::date)]
    pub hasta: Option<NaiveDate>,

    /// From the same day last month up to today
    #[arg(long, conflicts_with_all = ["desde", "hasta"])]
    pub ultimo_mes: bool,

    /// How many products to list
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

pub async fn run(state: &AppState, args: &DashboardArgs, out: &Output) -> Result<()> {
    let range = if args.ultimo_mes {
        DateRange::last_month(today())
    } else {
        DateRange::new(args.desde, args.hasta)
    };

    let history = state.client.history().await?;
    let summary = DashboardSummary::compute(&history, &range);

    out.emit(&summary, || {
        println!("Ingresos        {}", summary.revenue);
        println!("Unidades        {}", summary.units_sold);

        print_breakdown("Productos", summary.top_products(args.top));
        print_breakdown("Medios de pago", &summary.by_payment);
        print_breakdown("Grupos", &summary.by_group);

        println!();
        println!("Por día");
        for day in &summary.timeline {
            println!("  {}  {:>14}", output::date(day.date), day.total.to_string());
        }
    })
}

fn print_breakdown(title: &str, rows: &[Breakdown]) {
    println!();
    println!("{title}");
    for row in rows {
        println!("  {:<30} {:>14}", row.label, row.total.to_string());
    }
}
