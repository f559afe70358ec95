use anyhow::Result;
use ecco_view_service::Resource;

use super::{Context, Kind, print_json};

pub(crate) async fn run_delete(ctx: &Context, kind: Kind, ids: &[String]) -> Result<()> {
    for_kind!(kind, R => delete::<R>(ctx, ids).await)
}

pub(crate) async fn run_set_status(ctx: &Context, kind: Kind, id: &str, status: &str) -> Result<()> {
    for_kind!(kind, R => {
        let status: <R as Resource>::Status = status.parse()?;
        ctx.page::<R>().update_status(id, status).await?;
        Ok(())
    })
}

async fn delete<R: Resource>(ctx: &Context, ids: &[String]) -> Result<()> {
    let page = ctx.page::<R>();
    if let [id] = ids {
        page.delete(id).await?;
        return Ok(());
    }
    let outcome = page.bulk_delete(ids).await?;
    print_json(&outcome)?;
    if !outcome.failed.is_empty() {
        anyhow::bail!("{} of {} deletes failed", outcome.failed.len(), ids.len());
    }
    Ok(())
}
