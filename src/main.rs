//! Terminal front-end: lists exams, prints a question's rendered comment
//! and saves attachments.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

use quizview::{Cli, Exam, format_comment, load_exams, logger, read_attachment};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_filter());

    if let Some(ref entry_path) = cli.attachment {
        return save_attachment(&cli, entry_path).await;
    }

    let response = load_exams(&cli.archive).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        if !response.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    let exams = match response.into_result() {
        Ok(exams) => exams,
        Err(message) => bail!("Error loading ZIP file: {}", message),
    };

    if exams.is_empty() {
        if !cli.is_quiet() {
            eprintln!("No valid exam data found in the ZIP file");
        }
        return Ok(());
    }

    match (&cli.exam, cli.question) {
        (None, _) => list_exams(&exams),
        (Some(name), None) => show_exam(find_exam(&exams, name)?),
        (Some(name), Some(number)) => {
            let exam = find_exam(&exams, name)?;
            let question = exam
                .question(number)
                .with_context(|| format!("Exam {} has no question {}", exam.name, number))?;
            println!("{}", format_comment(question.comment.as_deref()));
        }
    }

    Ok(())
}

fn find_exam<'a>(exams: &'a [Exam], name: &str) -> Result<&'a Exam> {
    exams
        .iter()
        .find(|e| e.name == name)
        .with_context(|| format!("No exam named {}", name))
}

fn list_exams(exams: &[Exam]) {
    println!("{:>9}  {:>11}  Exam", "Questions", "Attachments");
    println!("{}", "-".repeat(40));
    for exam in exams {
        println!(
            "{:>9}  {:>11}  {}",
            exam.questions.len(),
            exam.attachments.len(),
            exam.name
        );
    }
}

fn show_exam(exam: &Exam) {
    let count = exam.questions.len();
    println!(
        "{} ({} question{})",
        exam.name,
        count,
        if count == 1 { "" } else { "s" }
    );
    for question in &exam.questions {
        println!(
            "  #{:<4} image: {:<10} comment: {}",
            question.number,
            question.image.as_ref().map_or("-", |i| i.mime_type()),
            if question.comment.is_some() { "yes" } else { "-" }
        );
    }
    if !exam.attachments.is_empty() {
        println!("Attachments:");
        for attachment in &exam.attachments {
            println!(
                "  {:>10}  {}  ({})",
                format_size(attachment.size),
                attachment.name,
                attachment.path
            );
        }
    }
}

async fn save_attachment(cli: &Cli, entry_path: &str) -> Result<()> {
    let file_name = entry_path.rsplit('/').next().unwrap_or(entry_path);
    let output_path = match cli.output_dir {
        Some(ref dir) => PathBuf::from(dir).join(file_name),
        None => PathBuf::from(file_name),
    };

    if output_path.exists() && !cli.overwrite {
        if !cli.is_quiet() {
            eprintln!("Skipping: {} (use -o to overwrite)", output_path.display());
        }
        return Ok(());
    }

    let data = read_attachment(&cli.archive, entry_path).await?;
    write_file(&output_path, &data).await?;
    debug!(path = %output_path.display(), bytes = data.len(), "attachment saved");

    if !cli.is_quiet() {
        println!("  saved: {} ({})", output_path.display(), format_size(data.len() as u64));
    }
    Ok(())
}

async fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("Cannot write {}", path.display()))
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
