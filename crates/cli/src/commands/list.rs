use std::path::Path;

use anyhow::{Context as _, Result};
use ecco_view_core::Tabular;
use ecco_view_service::Resource;
use serde::Serialize;

use super::{Context, Kind, SourceArgs, ViewArgs, print_json};

pub(crate) async fn run_list(ctx: &Context, kind: Kind, source: &SourceArgs, view: &ViewArgs) -> Result<()> {
    for_kind!(kind, R => print_list::<R>(ctx, source, view).await)
}

pub(crate) async fn run_export(
    ctx: &Context,
    kind: Kind,
    source: &SourceArgs,
    view: &ViewArgs,
    output: &Path,
) -> Result<()> {
    for_kind!(kind, R => write_csv::<R>(ctx, source, view, output).await)
}

async fn print_list<R: Resource + Serialize>(ctx: &Context, source: &SourceArgs, args: &ViewArgs) -> Result<()> {
    let page = ctx.load::<R>(source).await?;
    let view = page.view(&args.to_state()?, source.now()?).await?;
    print_json(&view)
}

async fn write_csv<R: Resource + Tabular>(
    ctx: &Context,
    source: &SourceArgs,
    args: &ViewArgs,
    output: &Path,
) -> Result<()> {
    let page = ctx.load::<R>(source).await?;
    let view = page.view(&args.to_state()?, source.now()?).await?;

    let mut writer = csv::Writer::from_path(output).with_context(|| format!("creating {}", output.display()))?;
    writer.write_record(R::headers())?;
    for record in &view.items {
        writer.write_record(record.row())?;
    }
    writer.flush()?;

    tracing::info!(kind = %R::KIND, rows = view.items.len(), path = %output.display(), "Exported");
    println!("Exported {} {} to {}", view.items.len(), R::KIND.plural_label(), output.display());
    Ok(())
}
