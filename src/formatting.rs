use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use slidex_lib::output::SLIDEX_OUTPUT_VERSION;
use slidex_lib::{ErrorOutput, SlidexError, SlidexOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &SlidexOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref()),
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref()),
    }
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: SlidexError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = SlidexOutput::Error(ErrorOutput {
        version: SLIDEX_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &SlidexOutput, output: Option<&Path>) -> io::Result<()> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write the human summary to file or stdout.
fn write_pretty_output(body: &SlidexOutput, output: Option<&Path>) -> io::Result<()> {
    let colorize = output.is_none() && std::io::stdout().is_terminal();
    let content = format_pretty(body, colorize);
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        print!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &SlidexOutput, colorize: bool) -> String {
    match body {
        SlidexOutput::Export(out) => {
            let mut buf = String::new();
            if !out.success {
                let header = color("[EMPTY]", "33", colorize);
                let message = out.message.as_deref().unwrap_or("Nothing exported");
                writeln!(buf, "{} {} ({})", header, message, out.root.display()).ok();
                return buf;
            }

            let (label, code) = if out.shortfall() == 0 {
                ("[OK]", "32")
            } else {
                ("[PARTIAL]", "33")
            };
            writeln!(buf, "{} Export complete!", color(label, code, colorize)).ok();
            writeln!(
                buf,
                "Found {} HTML files under {}",
                out.discovered,
                out.root.display()
            )
            .ok();
            writeln!(buf, "Generated {} PDF files", out.pdfs).ok();
            writeln!(buf, "Generated {} image files", out.images).ok();

            if !out.skipped.is_empty() {
                writeln!(buf, "Skipped ({}):", out.skipped.len()).ok();
                for skip in &out.skipped {
                    writeln!(
                        buf,
                        "- {} [{}]: {}",
                        skip.source.display(),
                        color(skip.kind.label(), "31", colorize),
                        skip.reason
                    )
                    .ok();
                }
            }
            buf
        }
        SlidexOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidex_lib::error::{ErrorCategory, ErrorPayload};
    use slidex_lib::{ConversionKind, ExportOutput, SkippedConversion};

    fn export(discovered: usize, images: usize, pdfs: usize) -> ExportOutput {
        ExportOutput {
            version: SLIDEX_OUTPUT_VERSION.to_string(),
            root: PathBuf::from("slides"),
            success: true,
            message: None,
            discovered,
            images,
            pdfs,
            outputs: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            SlidexError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn unwritable_summary_path_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("missing").join("summary.json");
        let body = SlidexOutput::Export(export(0, 0, 0));

        let err = write_output(&body, OutputFormat::Json, Some(target)).unwrap_err();
        let err = SlidexError::from(err);
        assert_eq!(err.to_payload().category, ErrorCategory::Io);
    }

    #[test]
    fn format_pretty_reports_counts() {
        let pretty = format_pretty(&SlidexOutput::Export(export(3, 3, 3)), false);
        assert!(pretty.contains("[OK] Export complete!"));
        assert!(pretty.contains("Found 3 HTML files under slides"));
        assert!(pretty.contains("Generated 3 PDF files"));
        assert!(pretty.contains("Generated 3 image files"));
        assert!(!pretty.contains("Skipped"));
    }

    #[test]
    fn format_pretty_lists_skips() {
        let mut out = export(2, 2, 1);
        out.skipped.push(SkippedConversion {
            source: PathBuf::from("slides/b.html"),
            kind: ConversionKind::Pdf,
            reason: "Timed out after 45s while waiting for fonts".to_string(),
        });

        let pretty = format_pretty(&SlidexOutput::Export(out), false);
        assert!(pretty.contains("[PARTIAL] Export complete!"));
        assert!(pretty.contains("Skipped (1):"));
        assert!(pretty.contains("- slides/b.html [pdf]: Timed out"));
    }

    #[test]
    fn format_pretty_handles_empty_batches() {
        let mut out = export(0, 0, 0);
        out.success = false;
        out.message = Some("No files to export".to_string());

        let pretty = format_pretty(&SlidexOutput::Export(out), false);
        assert!(pretty.contains("[EMPTY] No files to export (slides)"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = SlidexOutput::Error(ErrorOutput {
            version: SLIDEX_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload {
                category: ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
