use std::io::Write;

use fv_backend::SdkError;
use fv_flutter::active_executable;

use super::Context;

pub fn run(ctx: &Context, out: &mut impl Write) -> Result<(), SdkError> {
    writeln!(out, "{}", active_executable(&ctx.config)?)?;
    Ok(())
}
