mod connection;
mod export;
mod placeholder;

pub use connection::{
    check_target_mappings, collect_step_targets, generate_session_mappings, resolve_connection,
    ConnectionDetails, TargetIssue,
};
pub use export::{export_runtime_test, ExportOptions};
pub use placeholder::{
    extract_placeholder_names, placeholder_regex, resolve, unresolved_names, PlaceholderContext,
    PlaceholderTier,
};
