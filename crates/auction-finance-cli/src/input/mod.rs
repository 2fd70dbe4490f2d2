pub mod file;
pub mod stdin;

use serde_json::Value;

/// Request body from `--input`, else from piped stdin.
pub fn request_body(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json_value(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(data)
    } else {
        Err(format!("--input <file.json> or stdin required for {what}").into())
    }
}
