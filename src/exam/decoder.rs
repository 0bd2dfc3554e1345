//! Builds the exam tree from an archive's entries.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

use crate::io::ReadAt;
use crate::zip::{ZipEntry, ZipExtractor};
use anyhow::Result;

use super::classify::{EntryKind, classify};
use super::model::{Attachment, Exam, Question, QuestionImage};

/// Exam under construction; questions upserted by number.
struct ExamBuilder {
    name: String,
    questions: BTreeMap<u32, Question>,
    attachments: Vec<Attachment>,
}

impl ExamBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            questions: BTreeMap::new(),
            attachments: Vec::new(),
        }
    }

    fn question(&mut self, number: u32) -> &mut Question {
        self.questions
            .entry(number)
            .or_insert_with(|| Question::new(number))
    }

    fn build(self) -> Exam {
        Exam {
            name: self.name,
            // BTreeMap iteration is already ascending by number
            questions: self.questions.into_values().collect(),
            attachments: self.attachments,
        }
    }
}

/// Exams keyed by folder name, remembered in first-seen order.
#[derive(Default)]
struct ExamSet {
    index: HashMap<String, usize>,
    exams: Vec<ExamBuilder>,
}

impl ExamSet {
    fn exam(&mut self, name: &str) -> &mut ExamBuilder {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.exams.push(ExamBuilder::new(name));
                self.index.insert(name.to_string(), self.exams.len() - 1);
                self.exams.len() - 1
            }
        };
        &mut self.exams[idx]
    }

    fn build(self) -> Vec<Exam> {
        self.exams.into_iter().map(ExamBuilder::build).collect()
    }
}

/// Decodes a question-set archive into exams.
pub struct ExamDecoder<R: ReadAt> {
    extractor: ZipExtractor<R>,
}

impl<R: ReadAt> ExamDecoder<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            extractor: ZipExtractor::new(reader),
        }
    }

    /// Walk every entry and assemble the exams.
    ///
    /// Per-entry oddities (no question number, `_upload` copies, entries
    /// outside any folder) are dropped; a later image or comment for the
    /// same question replaces the earlier one. Any read or decompression
    /// failure aborts the whole decode.
    pub async fn decode(&self) -> Result<Vec<Exam>> {
        let entries = self.extractor.list_entries().await?;
        let mut set = ExamSet::default();

        for entry in &entries {
            self.apply(&mut set, entry).await?;
        }

        let exams = set.build();
        info!(
            entries = entries.len(),
            exams = exams.len(),
            questions = exams.iter().map(|e| e.questions.len()).sum::<usize>(),
            "archive decoded"
        );
        Ok(exams)
    }

    async fn apply(&self, set: &mut ExamSet, entry: &ZipEntry) -> Result<()> {
        match classify(&entry.name, entry.is_directory) {
            EntryKind::Image {
                exam,
                number,
                format,
            } => {
                let bytes = self.extractor.extract_to_memory(entry).await?;
                let question = set.exam(exam).question(number);
                if question.image.is_some() {
                    debug!(exam, number, entry = %entry.name, "replacing earlier image");
                }
                question.image = Some(QuestionImage::encode(format, &bytes));
            }
            EntryKind::Comment { exam, number } => {
                let bytes = self.extractor.extract_to_memory(entry).await?;
                let question = set.exam(exam).question(number);
                if question.comment.is_some() {
                    debug!(exam, number, entry = %entry.name, "replacing earlier comment");
                }
                question.comment = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
            EntryKind::Attachment { exam, name } => {
                set.exam(exam).attachments.push(Attachment {
                    name: name.to_string(),
                    path: entry.name.clone(),
                    size: entry.uncompressed_size,
                });
            }
            EntryKind::Skip(reason) => {
                // Skipped files inside a folder still make the exam visible.
                if !entry.is_directory {
                    if let Some((exam, _)) = entry.name.split_once('/') {
                        set.exam(exam);
                    }
                }
                debug!(entry = %entry.name, ?reason, "entry skipped");
            }
        }
        Ok(())
    }

    /// Fetch an attachment's bytes by the path recorded at decode time.
    pub async fn read_attachment(&self, path: &str) -> Result<Vec<u8>> {
        self.extractor.extract_by_name(path).await
    }
}
