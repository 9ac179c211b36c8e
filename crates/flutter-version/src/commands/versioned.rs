use std::io::Write;

use fv_backend::SdkError;
use fv_flutter::active_is_versioned;

use super::Context;

/// Prints `1` or `0` so shell scripts can branch on it.
pub fn run(ctx: &Context, out: &mut impl Write) -> Result<(), SdkError> {
    let versioned = active_is_versioned(&ctx.config)?;
    writeln!(out, "{}", u8::from(versioned))?;
    Ok(())
}
