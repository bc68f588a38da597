use crate::domain::models::JsonOut;
use serde::Serialize;

/// Human-readable progress line for a pipeline step. Suppressed under
/// `--json`, where only the final envelope is printed.
pub fn progress(json: bool, line: &str) {
    if !json {
        println!("{line}");
    }
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}
