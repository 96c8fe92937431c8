use std::process::ExitCode;
use std::sync::Arc;

use slidex_lib::{
    export_slides_with, ChromiumLauncher, ExportOptions, ExportOutput, ProgressCallback,
    SlidexError, SlidexOutput,
};

use crate::cli::Cli;
use crate::formatting::{render_error, write_output};
use crate::settings::{cli_overrides, format_effective_config, load_config, resolve_config};

/// Run the export and print the summary.
pub async fn run_export(args: Cli) -> ExitCode {
    let format = args.format;
    let output = args.output.clone();

    let file_overrides = match load_config(args.config.as_deref()) {
        Ok(overrides) => overrides,
        Err(err) => return render_error(err, format, output),
    };
    let config = match resolve_config(file_overrides, cli_overrides(&args)) {
        Ok(config) => config,
        Err(err) => return render_error(err, format, output),
    };
    if args.verbose {
        eprintln!("{}", format_effective_config(&config, args.config.as_deref()));
    }

    let progress: ProgressCallback = Arc::new(|msg: &str| eprintln!("{msg}"));
    let options = ExportOptions {
        progress: Some(progress),
    };

    let batch = match export_slides_with(&ChromiumLauncher, &args.root, &config, options).await {
        Ok(batch) => batch,
        Err(err) => {
            tracing::error!("Export failed: {err}");
            return render_error(err, format, output);
        }
    };

    let body = SlidexOutput::Export(ExportOutput::from_batch(&args.root, &batch));
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SlidexError::Io(err), format, output);
    }
    ExitCode::SUCCESS
}
