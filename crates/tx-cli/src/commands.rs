use std::path::Path;

use tx_api::{
    export_runtime_xml, format_configuration_xml, format_test_xml, generate_sessions_from_xml,
    load_test_from_xml, validate_test_xml, ExportRuntimeXmlOptions, ValidateTestXmlOptions,
};
use tx_core::{TestXmlError, ValidationReport};
use tx_resolver::ExportOptions;

use crate::cli_args::{
    ExportArgs, FormatArgs, ReportFormat, SessionsArgs, ValidateArgs, ValidateDirArgs,
};
use crate::report_render::{
    exit_code_for, render_json, render_sessions, render_text, validity_label, EXIT_INVALID,
};
use crate::source_loader::{
    collect_xml_files, read_document, read_optional, require_configuration,
    resolve_configuration, write_output,
};

const ROOT_MISMATCH: &str = "XML_ROOT_MISMATCH";

pub(crate) fn run_validate(args: ValidateArgs) -> Result<i32, TestXmlError> {
    let config = resolve_configuration(args.config.as_deref(), &args.test);
    let report = validate_file(&args.test, config.as_deref(), args.schema.as_deref())?;
    let file = args.test.display().to_string();
    match args.format {
        ReportFormat::Text => println!("{}", render_text(&file, &report)),
        ReportFormat::Json => println!("{}", render_json(&file, &report)?),
    }
    Ok(exit_code_for(&report))
}

fn validate_file(
    test: &Path,
    config: Option<&Path>,
    schema: Option<&Path>,
) -> Result<ValidationReport, TestXmlError> {
    validate_test_xml(&ValidateTestXmlOptions {
        test_xml: read_document(test)?,
        configuration_xml: read_optional(config)?,
        schema_xml: read_optional(schema)?,
        environment: None,
    })
}

pub(crate) fn run_export(args: ExportArgs) -> Result<i32, TestXmlError> {
    let config = require_configuration(args.config.as_deref(), &args.test)?;
    let xml = export_runtime_xml(&ExportRuntimeXmlOptions {
        test_xml: read_document(&args.test)?,
        configuration_xml: read_document(&config)?,
        environment: None,
        export: ExportOptions {
            generate_sessions: !args.keep_sessions,
            substitute_placeholders: !args.no_substitute,
        },
    })?;
    match args.out {
        Some(out) => {
            write_output(&out, &xml)?;
            println!("RESULT:OK");
            println!("OUT:{}", out.display());
        }
        None => print!("{xml}"),
    }
    Ok(0)
}

pub(crate) fn run_sessions(args: SessionsArgs) -> Result<i32, TestXmlError> {
    let config = require_configuration(args.config.as_deref(), &args.test)?;
    let sessions =
        generate_sessions_from_xml(&read_document(&args.test)?, &read_document(&config)?)?;
    println!("{}", render_sessions(&sessions)?);
    Ok(0)
}

pub(crate) fn run_format(args: FormatArgs) -> Result<i32, TestXmlError> {
    let source = read_document(&args.document)?;
    let formatted = match format_test_xml(&source) {
        Err(error) if error.code == ROOT_MISMATCH => format_configuration_xml(&source)?,
        other => other?,
    };

    if args.check {
        if formatted == source {
            println!("RESULT:FORMATTED");
            return Ok(0);
        }
        println!("RESULT:UNFORMATTED");
        println!("FILE:{}", args.document.display());
        return Ok(EXIT_INVALID);
    }

    match args.out {
        Some(out) => {
            write_output(&out, &formatted)?;
            println!("RESULT:OK");
            println!("OUT:{}", out.display());
        }
        None => print!("{formatted}"),
    }
    Ok(0)
}

pub(crate) fn run_validate_dir(args: ValidateDirArgs) -> Result<i32, TestXmlError> {
    let files = collect_xml_files(&args.dir)?;
    let schema = read_optional(args.schema.as_deref())?;

    let mut checked = 0usize;
    let mut failed = 0usize;
    for file in files {
        let Some(outcome) = validate_dir_entry(&file, schema.as_deref()).transpose() else {
            tracing::debug!(path = %file.display(), "skipping non-test document");
            continue;
        };
        checked += 1;

        match outcome {
            Ok(report) => {
                if !report.is_valid() {
                    failed += 1;
                }
                println!(
                    "FILE:{}:{}:{}:{}",
                    file.display(),
                    validity_label(&report),
                    report.errors().count(),
                    report.warnings().count()
                );
            }
            Err(error) => {
                failed += 1;
                tracing::warn!(path = %file.display(), code = %error.code, "{}", error.message);
                println!("FILE:{}:ERROR:{}", file.display(), error.code);
            }
        }
    }

    println!("CHECKED:{checked}");
    println!("FAILED:{failed}");
    if failed == 0 {
        println!("RESULT:VALID");
        Ok(0)
    } else {
        println!("RESULT:INVALID");
        Ok(EXIT_INVALID)
    }
}

fn validate_dir_entry(
    file: &Path,
    schema: Option<&str>,
) -> Result<Option<ValidationReport>, TestXmlError> {
    let source = read_document(file)?;
    match load_test_from_xml(&source) {
        Err(error) if error.code == ROOT_MISMATCH => return Ok(None),
        _ => {}
    }
    let configuration_xml = resolve_configuration(None, file)
        .map(|config| read_document(&config))
        .transpose()?;
    validate_test_xml(&ValidateTestXmlOptions {
        test_xml: source,
        configuration_xml,
        schema_xml: schema.map(str::to_string),
        environment: None,
    })
    .map(Some)
}
