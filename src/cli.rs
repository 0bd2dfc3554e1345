use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "quizview")]
#[command(version)]
#[command(about = "Browse exam question archives (ZIP) from the terminal", long_about = None)]
#[command(after_help = "Examples:\n  \
  quizview exams.zip                          list exams\n  \
  quizview exams.zip -e Midterm               list questions of one exam\n  \
  quizview exams.zip -e Midterm -n 3          print question 3's comment as HTML\n  \
  quizview exams.zip -a Midterm/sheet.pdf -d out   save an attachment\n  \
  quizview --json https://example.com/exams.zip    dump everything as JSON")]
pub struct Cli {
    /// ZIP file path or HTTP URL
    #[arg(value_name = "ARCHIVE")]
    pub archive: String,

    /// Exam (top-level folder) to show
    #[arg(short = 'e', long = "exam", value_name = "NAME")]
    pub exam: Option<String>,

    /// Question number to show (requires --exam)
    #[arg(short = 'n', long = "question", value_name = "N", requires = "exam")]
    pub question: Option<u32>,

    /// Print the decode result as JSON
    #[arg(long, conflicts_with_all = ["exam", "attachment"])]
    pub json: bool,

    /// Save the attachment stored at this archive path
    #[arg(short = 'a', long = "attachment", value_name = "PATH")]
    pub attachment: Option<String>,

    /// Directory to save attachments into
    #[arg(short = 'd', value_name = "DIR", requires = "attachment")]
    pub output_dir: Option<String>,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "QUIZVIEW_LOG", default_value = "warn", value_name = "FILTER")]
    pub log_level: String,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.json
    }

    /// Log filter after applying `-q`.
    pub fn log_filter(&self) -> &str {
        if self.quiet > 1 { "off" } else { &self.log_level }
    }
}
