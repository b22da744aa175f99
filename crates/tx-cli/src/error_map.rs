use std::fmt::Display;

use tx_core::TestXmlError;

fn map_error(code: &'static str, error: impl Display) -> TestXmlError {
    TestXmlError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: TestXmlError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    1
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> TestXmlError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> TestXmlError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_source_scan(error: walkdir::Error) -> TestXmlError {
    map_error("CLI_SOURCE_SCAN", error)
}

pub(crate) fn map_cli_write(error: std::io::Error) -> TestXmlError {
    map_error("CLI_WRITE", error)
}

pub(crate) fn map_cli_json(error: serde_json::Error) -> TestXmlError {
    map_error("CLI_JSON", error)
}
