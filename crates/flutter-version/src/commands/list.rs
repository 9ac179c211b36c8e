use std::io::Write;

use fv_backend::SdkError;
use fv_flutter::{FlutterProbe, list_installed, read_pin};

use super::Context;
use crate::table::render_installed;

pub async fn run(ctx: &Context, out: &mut impl Write) -> Result<(), SdkError> {
    let pin = match &ctx.project {
        Some(project) => read_pin(project)?,
        None => None,
    };
    let entries = list_installed(&ctx.config, pin.as_ref(), &FlutterProbe::new()).await?;

    writeln!(out, "{}", render_installed(&entries))?;
    Ok(())
}
