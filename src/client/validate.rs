use crate::ConfigError;
use crate::Result;

/// dataId, group and datumId share one character set: letters, digits
/// and `_ - . :`. Everything else is rejected before the request is
/// built.
fn is_valid(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

pub(crate) fn check_param(
    field: &'static str,
    value: &str,
) -> Result<()> {
    if is_valid(value) {
        return Ok(());
    }
    Err(ConfigError::InvalidParameter {
        field,
        value: value.to_string(),
    }
    .into())
}

pub(crate) fn check_data_ids(data_ids: &[String]) -> Result<()> {
    for data_id in data_ids {
        check_param("dataId", data_id)?;
    }
    Ok(())
}
