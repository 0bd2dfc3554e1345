use base64::{Engine as _, engine::general_purpose};
use serde::{Serialize, Serializer};

/// Image encodings a question picture may use, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Webp,
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Match a file name's extension. Case-sensitive: `Q.PNG` is not an image.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".webp") {
            Some(ImageFormat::Webp)
        } else if file_name.ends_with(".png") {
            Some(ImageFormat::Png)
        } else if file_name.ends_with(".jpg") || file_name.ends_with(".jpeg") {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "image/webp",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// A question's picture, base64-encoded and ready to embed.
///
/// Serializes as its `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionImage {
    pub format: ImageFormat,
    pub base64: String,
}

impl QuestionImage {
    pub fn encode(format: ImageFormat, bytes: &[u8]) -> Self {
        Self {
            format,
            base64: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.base64)
    }
}

impl Serialize for QuestionImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.data_uri())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<QuestionImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Question {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            image: None,
            comment: None,
        }
    }
}

/// Any other file stored under an exam folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// Base name of the entry
    pub name: String,
    /// Full entry path inside the archive; the key for fetching its bytes
    pub path: String,
    /// Declared uncompressed size
    pub size: u64,
}

/// One top-level archive folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exam {
    pub name: String,
    /// Sorted ascending by number, unique by number
    pub questions: Vec<Question>,
    pub attachments: Vec<Attachment>,
}

impl Exam {
    pub fn question(&self, number: u32) -> Option<&Question> {
        self.questions
            .binary_search_by_key(&number, |q| q.number)
            .ok()
            .map(|idx| &self.questions[idx])
    }

    pub fn attachment(&self, path: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.path == path)
    }
}

/// Outcome of decoding one archive, as handed to the viewer.
///
/// Serializes to `{"success": true, "exams": [...]}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exams: Option<Vec<Exam>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DecodeResponse {
    pub fn success(exams: Vec<Exam>) -> Self {
        Self {
            success: true,
            exams: Some(exams),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            exams: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<Vec<Exam>, String> {
        match (self.success, self.exams, self.error) {
            (true, exams, _) => Ok(exams.unwrap_or_default()),
            (false, _, error) => Err(error.unwrap_or_else(|| "Unknown error".to_string())),
        }
    }
}

impl From<anyhow::Result<Vec<Exam>>> for DecodeResponse {
    fn from(result: anyhow::Result<Vec<Exam>>) -> Self {
        match result {
            Ok(exams) => DecodeResponse::success(exams),
            // `{:#}` keeps the whole context chain on one line.
            Err(err) => DecodeResponse::failure(format!("{:#}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_format_is_case_sensitive() {
        assert_eq!(ImageFormat::from_file_name("1_a.webp"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::from_file_name("1_a.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("1_a.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("1_a.jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("1_a.PNG"), None);
        assert_eq!(ImageFormat::from_file_name("1_a.gif"), None);
    }

    #[test]
    fn image_serializes_as_data_uri() {
        let image = QuestionImage::encode(ImageFormat::Png, b"hi");
        assert_eq!(image.data_uri(), "data:image/png;base64,aGk=");
        assert_eq!(
            serde_json::to_string(&image).unwrap(),
            "\"data:image/png;base64,aGk=\""
        );
    }

    #[test]
    fn response_shapes() {
        let ok = serde_json::to_value(DecodeResponse::success(vec![])).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "exams": []}));

        let failed = serde_json::to_value(DecodeResponse::failure("Not a valid ZIP file")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"success": false, "error": "Not a valid ZIP file"})
        );
    }

    #[test]
    fn question_without_halves_omits_fields() {
        let value = serde_json::to_value(Question::new(7)).unwrap();
        assert_eq!(value, serde_json::json!({"number": 7}));
    }

    #[test]
    fn question_lookup_by_number() {
        let exam = Exam {
            name: "Midterm".to_string(),
            questions: vec![Question::new(1), Question::new(4), Question::new(9)],
            attachments: vec![],
        };
        assert_eq!(exam.question(4).map(|q| q.number), Some(4));
        assert!(exam.question(5).is_none());
    }
}
