//! Product types and identifier assignment.

use anyhow::Result;
use clap::Args;
use mostrador_core::BandRule;
use serde::Serialize;

use crate::output::Output;
use crate::parse;
use crate::state::AppState;

#[derive(Args)]
pub struct AssignArgs {
    /// Product type, as listed by `mostrador types`
    #[arg(long)]
    pub tipo: String,

    /// Price (Spanish notation, e.g. 12.500 or 1.234,50)
    #[arg(long, value_parser = parse::amount)]
    pub precio: f64,

    /// Band rule: lower (sales) or upper (stock ingress)
    #[arg(long)]
    pub regla: Option<BandRule>,
}

#[derive(Serialize)]
struct Assigned<'a> {
    id: &'a str,
    nombre: &'a str,
    tipo: &'a str,
    precio: f64,
    regla: BandRule,
}

pub async fn types(state: &AppState, out: &Output) -> Result<()> {
    let session = state.session().await?;
    let types = session.product_types();
    out.emit(&types, || {
        for t in &types {
            let group = session.index().group_for(t).unwrap_or_default();
            println!("{t:<30} {group}");
        }
    })
}

pub async fn assign(state: &AppState, args: &AssignArgs, out: &Output) -> Result<()> {
    let session = state.session().await?;
    let rule = args.regla.unwrap_or(session.rule());
    let id = session.assign_with(rule, &args.tipo, args.precio)?;

    let assigned = Assigned {
        id,
        nombre: session.catalog().display_name(id),
        tipo: &args.tipo,
        precio: args.precio,
        regla: rule,
    };
    out.emit(&assigned, || println!("{}  {}", assigned.id, assigned.nombre))
}
