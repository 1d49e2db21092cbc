use ron::{extensions::Extensions, ser::PrettyConfig};
use serde::Serialize;

lazy_static::lazy_static! {
    /// RON options shared by every config file and printed result.
    pub static ref RON: ron::Options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
}

pub fn to_pretty_ron<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let pretty_config = PrettyConfig::default().struct_names(true);
    Ok(RON.to_string_pretty(value, pretty_config)?)
}
