//! Output formatting for CLI commands.

use std::fmt::Display;

use colored::Colorize;

use crate::model::Resource;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// The resource as registry XML.
    Xml,
}

/// Render a resource in the specified format.
pub fn render<T: Resource + Display>(resource: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => resource.to_string(),
        OutputFormat::Xml => quick_xml::se::to_string(resource)
            .unwrap_or_else(|e| format!("<!-- failed to encode {}: {} -->", T::KIND, e)),
    }
}

/// Print a resource in the specified format.
pub fn print_resource<T: Resource + Display>(resource: &T, format: OutputFormat) {
    println!("{}", render(resource, format));
}

/// Deletion confirmation, followed by the resource when verbose.
pub fn deleted_report<T: Resource + Display>(
    handle: &str,
    resource: &T,
    verbose: bool,
    format: OutputFormat,
) -> String {
    let mut report = success_line(&format!("{} {} deleted", T::KIND, handle));
    if verbose {
        report.push('\n');
        report.push_str(&render(resource, format));
    }
    report
}

/// Print a deletion confirmation, with the resource summary when verbose.
pub fn print_deleted<T: Resource + Display>(
    handle: &str,
    resource: &T,
    verbose: bool,
    format: OutputFormat,
) {
    println!("{}", deleted_report(handle, resource, verbose, format));
}

fn success_line(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}
