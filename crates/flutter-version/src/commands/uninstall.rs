use fv_backend::SdkError;

use super::Context;

pub async fn run(ctx: &Context, tag: &str) -> Result<(), SdkError> {
    fv_flutter::uninstall(tag, &ctx.config.versions_dir).await?;
    Ok(())
}
