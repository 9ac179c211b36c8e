use std::io::Write;

use fv_backend::SdkError;
use fv_flutter::FlutterProbe;

use super::Context;

pub async fn run(ctx: &Context, tag: Option<&str>, out: &mut impl Write) -> Result<(), SdkError> {
    let outcome = fv_flutter::switch(
        &ctx.config,
        ctx.project.as_ref(),
        tag,
        &FlutterProbe::new(),
    )
    .await?;

    writeln!(out, "{outcome}")?;
    Ok(())
}
