use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::Codebook;

/// Supported transcript formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Pdf,
    Txt,
}

impl DocumentFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

/// Extract plain text from a transcript file
pub fn try_extract_text(path: &Path) -> Result<String> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;

    match format {
        DocumentFormat::Txt => Ok(std::fs::read_to_string(path)?),
        DocumentFormat::Docx => extract_docx(path),
        DocumentFormat::Pdf => extract_pdf(path),
    }
}

/// Extract plain text, returning an empty string on any failure
pub fn extract_text(path: &Path) -> String {
    match try_extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not extract text from {:?}: {}", path, e);
            String::new()
        }
    }
}

/// Non-empty paragraphs joined by newlines
fn extract_docx(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| Error::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&para.children, &mut text);
    text
}

/// Soft line breaks and carriage returns become `\n`, tabs become `\t`.
/// Hyperlinks are walked like the paragraph itself.
fn push_paragraph_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) | RunChild::PTab(_) => text.push('\t'),
                        RunChild::Break(_) | RunChild::CarriageReturn(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, text),
            _ => {}
        }
    }
}

/// Non-empty page texts joined by newlines. Chunks lopdf cannot decode are
/// logged and skipped, so one bad font never loses the readable pages.
fn extract_pdf(path: &Path) -> Result<String> {
    let doc = lopdf::Document::load(path)?;
    let mut pages = Vec::new();

    for page_number in doc.get_pages().keys() {
        let mut text = String::new();
        for chunk in doc.extract_text_chunks(&[*page_number]) {
            match chunk {
                Ok(chunk) => text.push_str(&chunk),
                Err(e) => warn!("{:?} page {}: {}", path, page_number, e),
            }
        }
        if !text.is_empty() {
            pages.push(text);
        }
    }

    Ok(pages.join("\n"))
}

/// Parse a codebook from JSON (`{"label": ["keyword", ...]}`)
pub fn parse_codebook_json(json: &str) -> Result<Codebook> {
    let codebook: Codebook = serde_json::from_str(json)?;
    if codebook.is_empty() {
        return Err(Error::InvalidCodebook("no code labels defined".to_string()));
    }
    Ok(codebook)
}

/// Load a codebook, falling back to the built-in one.
///
/// Never fails: a missing path yields the default, an unreadable or
/// malformed file logs a warning and yields the default.
pub fn load_codebook(path: Option<&Path>) -> Codebook {
    let Some(path) = path else {
        return Codebook::builtin();
    };

    let loaded = std::fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|content| parse_codebook_json(&content));

    match loaded {
        Ok(codebook) => {
            info!("Loaded codebook with {} labels from {:?}", codebook.len(), path);
            codebook
        }
        Err(e) => {
            warn!("Failed to load codebook at {:?}: {}. Using default.", path, e);
            Codebook::builtin()
        }
    }
}

/// One research question per non-blank line
pub fn parse_research_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_research_questions(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_research_questions(&content))
}

/// Split comma/newline separated keyword entries, trim them, drop blanks
/// and duplicates (first occurrence wins)
pub fn parse_domain_keywords<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for entry in entries {
        for kw in entry.as_ref().split([',', '\n']) {
            let kw = kw.trim();
            if !kw.is_empty() && !keywords.iter().any(|k| k == kw) {
                keywords.push(kw.to_string());
            }
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_detection() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.DOCX")), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_path(Path::new("b.pdf")), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_path(Path::new("c.Txt")), Some(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_path(Path::new("d.rtf")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_extract_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.txt");
        std::fs::write(&path, "Participant: Hello there, I use Moodle.").unwrap();
        assert_eq!(extract_text(&path), "Participant: Hello there, I use Moodle.");
    }

    #[test]
    fn test_extract_unsupported_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.rtf");
        std::fs::write(&path, "text").unwrap();
        assert_eq!(extract_text(&path), "");
        assert!(matches!(try_extract_text(&path), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extract_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(extract_text(&dir.path().join("missing.txt")), "");
    }

    #[test]
    fn test_extract_corrupt_docx_and_pdf_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("broken.docx");
        let pdf = dir.path().join("broken.pdf");
        std::fs::write(&docx, b"not a zip archive").unwrap();
        std::fs::write(&pdf, b"not a pdf").unwrap();
        assert_eq!(extract_text(&docx), "");
        assert_eq!(extract_text(&pdf), "");
    }

    fn write_docx(path: &Path, docx: docx_rs::Docx) {
        let file = std::fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    #[test]
    fn test_extract_docx_paragraphs() {
        use docx_rs::{Docx, Paragraph, Run};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.docx");
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Interviewer: Hello")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Participant: I teach math "))
                    .add_run(Run::new().add_text("and use Zoom.")),
            );
        write_docx(&path, docx);

        assert_eq!(
            try_extract_text(&path).unwrap(),
            "Interviewer: Hello\nParticipant: I teach math and use Zoom."
        );
    }

    #[test]
    fn test_extract_docx_soft_breaks_separate_turns() {
        use crate::stages::{segment_speakers, SegmenterConfig};
        use docx_rs::{BreakType, Docx, Hyperlink, HyperlinkType, Paragraph, Run};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soft_breaks.docx");
        let docx = Docx::new()
            .add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text("Interviewer: What tools do you use?")
                        .add_break(BreakType::TextWrapping)
                        .add_text("Participant: I use Moodle and Zoom for every online class."),
                ),
            )
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Interviewer: See").add_tab())
                    .add_hyperlink(
                        Hyperlink::new("resources", HyperlinkType::Anchor)
                            .add_run(Run::new().add_text("moodle.org")),
                    ),
            );
        write_docx(&path, docx);

        let text = extract_text(&path);
        assert!(text.contains("What tools do you use?\nParticipant:"), "{:?}", text);
        assert!(text.ends_with("Interviewer: See\tmoodle.org"), "{:?}", text);

        let blocks = segment_speakers(&text, &SegmenterConfig::default());
        assert_eq!(blocks, vec!["I use Moodle and Zoom for every online class."]);
    }

    /// One page per entry. `Some(text)` draws it in Helvetica; `None` draws
    /// a page whose Identity-H font has no ToUnicode map.
    fn write_pdf(path: &Path, pages: &[Option<&str>]) {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream, StringFormat};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let helvetica = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let identity = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "EmbeddedCid",
            "Encoding" => "Identity-H",
        });
        let readable = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => helvetica },
        });
        let unreadable = doc.add_object(dictionary! {
            "Font" => dictionary! { "F2" => identity },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let (resources_id, font, shown) = match page {
                Some(text) => (readable, "F1", Object::string_literal(*text)),
                None => (
                    unreadable,
                    "F2",
                    Object::String(vec![0x00, 0x2a, 0x00, 0x3b], StringFormat::Hexadecimal),
                ),
            };
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![font.into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![shown]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Resources" => resources_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_extract_pdf_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.pdf");
        write_pdf(
            &path,
            &[
                Some("Interviewer: Which platform do you teach on?"),
                Some("Participant: I use Moodle and Zoom every single week."),
            ],
        );

        let text = try_extract_text(&path).unwrap();
        let interviewer = text.find("Which platform").unwrap();
        let participant = text.find("I use Moodle").unwrap();
        assert!(interviewer < participant);
    }

    #[test]
    fn test_extract_pdf_keeps_readable_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed_fonts.pdf");
        write_pdf(
            &path,
            &[Some("Participant: I use Moodle and Zoom every single week."), None],
        );

        assert!(try_extract_text(&path).is_ok());
        assert!(extract_text(&path).contains("Moodle"));
    }

    #[test]
    fn test_load_codebook_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Robotics": ["robot", "arduino"], "Other": ["misc"]}}"#).unwrap();
        let codebook = load_codebook(Some(file.path()));
        assert_eq!(codebook.len(), 2);
        assert_eq!(codebook.entries()[0].label, "Robotics");
    }

    #[test]
    fn test_load_codebook_falls_back() {
        assert_eq!(load_codebook(None), Codebook::builtin());

        let mut malformed = tempfile::NamedTempFile::new().unwrap();
        write!(malformed, "{{ not json").unwrap();
        assert_eq!(load_codebook(Some(malformed.path())), Codebook::builtin());

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "{{}}").unwrap();
        assert_eq!(load_codebook(Some(empty.path())), Codebook::builtin());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(load_codebook(Some(&missing)), Codebook::builtin());
    }

    #[test]
    fn test_parse_research_questions() {
        let rqs = parse_research_questions("  RQ1: What tools?\n\n RQ2: Which barriers? \n");
        assert_eq!(rqs, vec!["RQ1: What tools?", "RQ2: Which barriers?"]);
    }

    #[test]
    fn test_parse_domain_keywords() {
        let entries = vec!["robotics, arduino".to_string(), "stem\nrobotics".to_string(), " ,".to_string()];
        assert_eq!(parse_domain_keywords(&entries), vec!["robotics", "arduino", "stem"]);
    }
}
