pub mod config;
pub mod init;
pub mod ping;
pub mod reset;
pub mod status;

/// Serialize a value to stdout as JSON, pretty-printed on request
pub(crate) fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
