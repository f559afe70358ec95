use anyhow::Result;
use ecco_view_core::OutreachMessage;

use super::{Context, Kind, SourceArgs, print_json};

pub(crate) async fn run_stats(ctx: &Context, kind: Kind, source: &SourceArgs, follow_up_days: i64) -> Result<()> {
    let now = source.now()?;
    if kind == Kind::Messages {
        let page = ctx.load::<OutreachMessage>(source).await?;
        return print_json(&page.message_stats(now, follow_up_days).await);
    }
    for_kind!(kind, R => {
        let page = ctx.load::<R>(source).await?;
        print_json(&page.stats(now).await)
    })
}
