//! Occupation record and the strict XML documents it is assembled from.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One normalized occupation, as persisted and as returned to callers.
///
/// `code` and `title` come from the detail document; `tasks` may be empty when
/// the task sub-fetch failed or listed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationRecord {
    pub code: String,
    pub title: String,
    pub description: String,
    pub also_called: Vec<String>,
    pub tasks: Vec<String>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML: {0}")]
    Structure(&'static str),
}

// ────────────────────────────────────────────────────────────────────────────
// Strict document tree
// ────────────────────────────────────────────────────────────────────────────

/// One parsed element. `text` holds only the character data that precedes the
/// first child element; attributes are not kept.
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    fn children_named<'a: 'n, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> + 'n {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Leading text of the first direct child called `name`, or "" if there is none.
    fn child_text<'a>(&'a self, name: &str) -> &'a str {
        self.children_named(name)
            .next()
            .map(|child| child.text.as_str())
            .unwrap_or("")
    }
}

/// Parses a whole body as one well-formed XML document.
///
/// Exactly one root element is allowed. Non-whitespace text outside it, a
/// second root, unclosed or mismatched tags and unknown entities are errors.
fn parse_document(xml: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(DocumentError::Structure("junk after document element"));
                }
                open.push(Element::named(e.name().as_ref()));
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return Err(DocumentError::Structure("junk after document element"));
                }
                attach(&mut open, &mut root, Element::named(e.name().as_ref()));
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or(DocumentError::Structure("end tag without start tag"))?;
                attach(&mut open, &mut root, element);
            }
            Event::Text(t) => push_text(&mut open, root.is_some(), &t.unescape()?)?,
            Event::CData(c) => push_text(&mut open, root.is_some(), &String::from_utf8_lossy(&c))?,
            Event::Eof => break,
            // declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(DocumentError::Structure("unclosed element at end of document"));
    }
    root.ok_or(DocumentError::Structure("no element found"))
}

fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(open: &mut [Element], root_closed: bool, text: &str) -> Result<(), DocumentError> {
    match open.last_mut() {
        Some(element) => {
            if element.children.is_empty() {
                element.text.push_str(text);
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None if root_closed => Err(DocumentError::Structure("junk after document element")),
        None => Err(DocumentError::Structure("text before document element")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Detail document: <occupation><code/><title/><description/>
//                  <sample_of_reported_job_titles><title/>...</...></occupation>
// ────────────────────────────────────────────────────────────────────────────

/// Scalar and repeated fields of a detail document, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupationDetail {
    pub code: String,
    pub title: String,
    pub description: String,
    pub also_called: Vec<String>,
}

impl OccupationDetail {
    pub fn into_record(self, tasks: Vec<String>) -> OccupationRecord {
        OccupationRecord {
            code: self.code,
            title: self.title,
            description: self.description,
            also_called: self.also_called,
            tasks,
        }
    }
}

/// Parses a detail document. Scalar fields take the first matching child and
/// default to empty strings when absent.
pub fn parse_detail(xml: &str) -> Result<OccupationDetail, DocumentError> {
    let root = parse_document(xml)?;

    Ok(OccupationDetail {
        code: root.child_text("code").trim().to_string(),
        title: root.child_text("title").trim().to_string(),
        description: root.child_text("description").trim().to_string(),
        also_called: root
            .children_named("sample_of_reported_job_titles")
            .flat_map(|group| group.children_named("title"))
            .map(|title| title.text.trim().to_string())
            .collect(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Task document: <tasks><task><statement/></task>...</tasks>
// ────────────────────────────────────────────────────────────────────────────

/// Parses a task document into its statements, in document order.
pub fn parse_tasks(xml: &str) -> Result<Vec<String>, DocumentError> {
    let root = parse_document(xml)?;

    Ok(root
        .children_named("task")
        .map(|task| task.child_text("statement").trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<occupation href="https://services.onetcenter.org/ws/online/occupations/33-3051.00/">
  <code>33-3051.00</code>
  <title>Police and Sheriff's Patrol Officers</title>
  <tags bright_outlook="false" green="false"/>
  <description>
    Maintain order and protect life and property by enforcing laws.
  </description>
  <sample_of_reported_job_titles>
    <title shown_in_my_next_move="true"> Patrol Officer </title>
    <title shown_in_my_next_move="false">Deputy Sheriff</title>
  </sample_of_reported_job_titles>
</occupation>"#;

    #[test]
    fn test_parse_detail_extracts_and_trims_fields() {
        let detail = parse_detail(DETAIL).unwrap();
        assert_eq!(detail.code, "33-3051.00");
        assert_eq!(detail.title, "Police and Sheriff's Patrol Officers");
        assert_eq!(
            detail.description,
            "Maintain order and protect life and property by enforcing laws."
        );
        assert_eq!(detail.also_called, vec!["Patrol Officer", "Deputy Sheriff"]);
    }

    #[test]
    fn test_parse_detail_defaults_missing_fields() {
        let detail = parse_detail("<occupation><code>11-1011.00</code></occupation>").unwrap();
        assert_eq!(detail.code, "11-1011.00");
        assert_eq!(detail.title, "");
        assert_eq!(detail.description, "");
        assert!(detail.also_called.is_empty());
    }

    #[test]
    fn test_parse_detail_rejects_mismatched_tags() {
        assert!(parse_detail("<occupation><code>1</title></occupation>").is_err());
    }

    #[test]
    fn test_parse_tasks_keeps_document_order() {
        let xml = r#"<tasks>
  <task id="1" green="false"><statement> Patrol assigned areas. </statement><category>Core</category></task>
  <task id="2"><statement>Record facts to prepare reports.</statement></task>
  <task id="3"><statement>Patrol assigned areas.</statement></task>
</tasks>"#;
        assert_eq!(
            parse_tasks(xml).unwrap(),
            vec![
                "Patrol assigned areas.",
                "Record facts to prepare reports.",
                "Patrol assigned areas.",
            ]
        );
    }

    #[test]
    fn test_parse_tasks_empty_document() {
        assert!(parse_tasks("<tasks></tasks>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_detail_rejects_trailing_content() {
        let xml = "<occupation><code>1</code><title>T</title></occupation>junk<x>";
        assert!(parse_detail(xml).is_err());
    }

    #[test]
    fn test_parse_detail_rejects_second_root() {
        let xml = "<occupation><code>1</code></occupation><occupation><code>2</code></occupation>";
        assert!(parse_detail(xml).is_err());
    }

    #[test]
    fn test_parse_detail_rejects_unclosed_root() {
        assert!(parse_detail("<occupation><code>1</code>").is_err());
        assert!(parse_detail("").is_err());
    }

    #[test]
    fn test_parse_detail_allows_trailing_whitespace_and_comments() {
        let xml = "<occupation><code>1</code></occupation>\n<!-- served by ws -->\n";
        assert_eq!(parse_detail(xml).unwrap().code, "1");
    }

    #[test]
    fn test_parse_detail_takes_first_of_repeated_fields() {
        let xml = "<occupation><code>1</code><title>First</title><title>Second</title></occupation>";
        assert_eq!(parse_detail(xml).unwrap().title, "First");
    }

    #[test]
    fn test_parse_detail_mixed_content_keeps_leading_text() {
        let xml = "<occupation><title>A &amp; <b>B</b></title>\
            <sample_of_reported_job_titles><title> Guard <i>(armed)</i></title></sample_of_reported_job_titles>\
            </occupation>";
        let detail = parse_detail(xml).unwrap();
        assert_eq!(detail.title, "A &");
        assert_eq!(detail.also_called, vec!["Guard"]);
    }

    #[test]
    fn test_parse_detail_reads_cdata() {
        let xml = "<occupation><description><![CDATA[Uses <radios> & maps.]]></description></occupation>";
        assert_eq!(parse_detail(xml).unwrap().description, "Uses <radios> & maps.");
    }

    #[test]
    fn test_parse_tasks_rejects_trailing_element() {
        let xml = "<tasks><task><statement>a</statement></task></tasks><task>";
        assert!(parse_tasks(xml).is_err());
    }

    #[test]
    fn test_parse_tasks_rejects_html_after_document() {
        let xml = "<tasks><task><statement>a</statement></task></tasks><html>error";
        assert!(parse_tasks(xml).is_err());
    }

    #[test]
    fn test_parse_tasks_missing_statement_is_empty() {
        let xml = "<tasks><task id=\"1\"/><task><statement>b</statement></task></tasks>";
        assert_eq!(parse_tasks(xml).unwrap(), vec!["", "b"]);
    }

    #[test]
    fn test_parse_tasks_rejects_html() {
        assert!(parse_tasks("<html><body><p>Service unavailable</body></html>").is_err());
    }
}
