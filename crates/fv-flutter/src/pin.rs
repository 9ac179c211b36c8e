use log::{debug, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use fv_backend::{ProjectPin, SdkError, VersionParseError};
use fv_platform::Project;

/// Read the project's pin. A missing pin file is `Ok(None)`.
///
/// # Errors
/// Returns [`SdkError::Parse`] when the file exists but is not a valid pin.
pub fn read_pin(project: &Project) -> Result<Option<ProjectPin>, SdkError> {
    let path = project.pin_file();
    if !path.exists() {
        debug!("No project pin at {}", path.display());
        return Ok(None);
    }

    let contents =
        std::fs::read_to_string(&path).map_err(|err| SdkError::io_with_path(&path, &err))?;
    let pin = serde_json::from_str(contents.trim()).map_err(|err| VersionParseError::InvalidPin {
        path: path.display().to_string(),
        details: err.to_string(),
    })?;
    Ok(Some(pin))
}

/// Overwrite the project's pin file, pretty-printed with a 4-space indent.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_pin(project: &Project, pin: &ProjectPin) -> Result<(), SdkError> {
    let path = project.pin_file();
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    pin.serialize(&mut serializer)
        .map_err(|err| SdkError::io_with_path(&path, &std::io::Error::other(err)))?;

    std::fs::write(&path, &buf).map_err(|err| SdkError::io_with_path(&path, &err))?;
    info!("Wrote project pin {}", path.display());
    Ok(())
}
