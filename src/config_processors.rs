use justconfig::error::ConfigError;
use justconfig::item::{MapAction, StringItem};

/// Remove quotes from configuration strings.
pub trait Unquote
where
    Self: Sized,
{
    fn unquote(self) -> Result<StringItem, ConfigError>;
}

impl Unquote for Result<StringItem, ConfigError> {
    /// Trims the value and strips one pair of surrounding double quotes.
    /// Values without quotes are kept as they are.
    fn unquote(self) -> Result<StringItem, ConfigError> {
        self?.map(|v| {
            let v = v.trim();

            if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
                MapAction::Replace(vec![v[1..v.len() - 1].to_owned()])
            } else {
                MapAction::Keep
            }
        })
    }
}
