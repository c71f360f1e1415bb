//! Opens a text document, reports how it was read, and prints its first page.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=textpager=debug cargo run -p textpager --example read_document -- path/to/file.txt
//! ```

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use textpager::{FileSource, OpenOutcome, ReaderOptions, Session};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: read_document <path>");
        return ExitCode::FAILURE;
    };

    let session = Session::new(ReaderOptions::default());
    let source = Arc::new(FileSource::new(&path));
    match session.open_blocking(path.display().to_string(), source) {
        Ok(Some(OpenOutcome::WholeFile { text, charset_name })) => {
            info!(charset = %charset_name, chars = text.chars().count(), "whole-file mode");
            print!("{}", first_lines(&text, 40));
        }
        Ok(Some(OpenOutcome::Paged { page_count, charset_name })) => {
            info!(charset = %charset_name, pages = page_count, "paged mode");
            for task in session.prefetch(0) {
                session.complete_page(task.run());
            }
            match session.page(0) {
                Some(page) => print!("{}", first_lines(&page, 40)),
                None => error!("first page could not be read"),
            }
        }
        Ok(None) => unreachable!("no other open was started"),
        Err(err) => {
            error!(error = %err, "{}", err.user_message());
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn first_lines(text: &str, n: usize) -> String {
    text.split_inclusive('\n').take(n).collect()
}
