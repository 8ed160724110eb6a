//! Minimal WordprocessingML (.docx) writer.
//!
//! A .docx file is a zip package of XML parts. We only need a handful of
//! them: content types, the package relationship, the main document, its
//! relationship to the styles part, and the styles part.

use super::DocumentRenderer;
use crate::archive::write_entries;
use crate::config::Config;
use crate::report::{REPORT_COLUMNS, StateReport};
use crate::util::format_date;
use anyhow::Result;
use std::fmt::Write as _;
use std::io::Cursor;

// US Letter, landscape, in twentieths of a point.
const PAGE_WIDTH: u32 = 15840;
const PAGE_HEIGHT: u32 = 12240;
const MARGIN: u32 = 1440;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

#[derive(Debug, Clone)]
pub struct DocxStyle {
    pub heading: String,
    pub section_heading: String,
    pub date_label: String,
    pub missing_value: String,
    pub font: String,
    pub font_size_pt: u32,
    pub date_font_size_pt: u32,
}

impl DocxStyle {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            heading: cfg.report.heading.clone(),
            section_heading: cfg.report.section_heading.clone(),
            date_label: cfg.report.date_label.clone(),
            missing_value: cfg.report.missing_value.clone(),
            font: cfg.report.font.clone(),
            font_size_pt: cfg.report.font_size_pt,
            date_font_size_pt: cfg.report.date_font_size_pt,
        }
    }
}

impl Default for DocxStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocxRenderer {
    style: DocxStyle,
}

impl DocxRenderer {
    pub fn new(style: DocxStyle) -> Self {
        Self { style }
    }

    pub fn document_xml(&self, report: &StateReport) -> String {
        let s = &self.style;
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(xml, r#"<w:document xmlns:w="{W_NS}"><w:body>"#);

        xml.push_str(&styled_paragraph("Heading1", &s.heading));
        xml.push_str(&styled_paragraph("Title", &report.state));

        let _ = write!(
            xml,
            r#"<w:p><w:pPr><w:pStyle w:val="ReportDate"/></w:pPr>{}{}</w:p>"#,
            run(&s.date_label, true),
            run(&format_date(report.run_date), false)
        );
        xml.push_str("<w:p/>");
        xml.push_str(&styled_paragraph("Heading4", &s.section_heading));

        xml.push_str(&self.table_xml(report));

        // Word expects a paragraph between a table and the section properties.
        xml.push_str("<w:p/>");
        let _ = write!(
            xml,
            r#"<w:sectPr><w:pgSz w:w="{PAGE_WIDTH}" w:h="{PAGE_HEIGHT}" w:orient="landscape"/><w:pgMar w:top="{MARGIN}" w:right="{MARGIN}" w:bottom="{MARGIN}" w:left="{MARGIN}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#
        );
        xml.push_str("</w:body></w:document>");
        xml
    }

    fn table_xml(&self, report: &StateReport) -> String {
        let col_width = (PAGE_WIDTH - 2 * MARGIN) / REPORT_COLUMNS.len() as u32;
        let mut xml = String::new();
        xml.push_str(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid>"#);
        for _ in REPORT_COLUMNS {
            let _ = write!(xml, r#"<w:gridCol w:w="{col_width}"/>"#);
        }
        xml.push_str("</w:tblGrid>");

        xml.push_str("<w:tr>");
        for name in REPORT_COLUMNS {
            xml.push_str(&cell(col_width, name, true));
        }
        xml.push_str("</w:tr>");

        for row in report.body(&self.style.missing_value) {
            xml.push_str("<w:tr>");
            for value in &row {
                xml.push_str(&cell(col_width, value, false));
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        xml
    }

    pub fn styles_xml(&self) -> String {
        let s = &self.style;
        let font = escape(&s.font);
        // Sizes are in half-points.
        let body = s.font_size_pt * 2;
        let date = s.date_font_size_pt * 2;
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:styles xmlns:w="{ns}">"#,
                r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:sz w:val="{body}"/><w:szCs w:val="{body}"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
                r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
                r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:sz w:val="56"/><w:szCs w:val="56"/></w:rPr></w:style>"#,
                r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="365F91"/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style>"#,
                r#"<w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200"/><w:outlineLvl w:val="3"/></w:pPr><w:rPr><w:b/><w:i/><w:color w:val="4F81BD"/></w:rPr></w:style>"#,
                r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="ReportDate"><w:name w:val="Report Date"/><w:basedOn w:val="Normal"/><w:rPr><w:sz w:val="{date}"/><w:szCs w:val="{date}"/></w:rPr></w:style>"#,
                r#"<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style>"#,
                r#"</w:styles>"#
            ),
            ns = W_NS,
            font = font,
            body = body,
            date = date,
        )
    }
}

impl DocumentRenderer for DocxRenderer {
    fn extension(&self) -> &str {
        "docx"
    }

    fn render(&self, report: &StateReport) -> Result<Vec<u8>> {
        let document = self.document_xml(report);
        let styles = self.styles_xml();
        let parts: [(&str, &[u8]); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", PACKAGE_RELS.as_bytes()),
            ("word/document.xml", document.as_bytes()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
            ("word/styles.xml", styles.as_bytes()),
        ];
        let cursor = write_entries(Cursor::new(Vec::new()), parts)?;
        Ok(cursor.into_inner())
    }
}

fn run(text: &str, bold: bool) -> String {
    let props = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(
        r#"<w:r>{props}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape(text)
    )
}

fn styled_paragraph(style_id: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style_id}"/></w:pPr>{}</w:p>"#,
        run(text, false)
    )
}

fn cell(width: u32, text: &str, bold: bool) -> String {
    format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/></w:tcPr><w:p>{}</w:p></w:tc>"#,
        run(text, bold)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportRow;
    use time::{Date, Month};

    fn day(d: u8) -> Date {
        Date::from_calendar_date(2021, Month::March, d).unwrap()
    }

    fn ohio() -> StateReport {
        StateReport {
            state: "Ohio".into(),
            run_date: day(10),
            rows: vec![ReportRow {
                date: day(1),
                new_positive: Some(5),
                total_positive: Some(50),
                new_negative: None,
                total_negative: None,
            }],
        }
    }

    #[test]
    fn document_is_landscape_with_bold_header() {
        let xml = DocxRenderer::default().document_xml(&ohio());
        assert!(xml.contains(r#"w:orient="landscape""#));
        assert!(xml.contains(">Ohio<"));
        assert!(xml.contains(">2021-03-10<"));
        assert!(xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Date</w:t>"#));
        assert!(xml.contains(">N/A<"));
        assert_eq!(xml.matches("<w:tr>").count(), 2);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    }

    #[test]
    fn render_is_deterministic_zip() {
        let r = DocxRenderer::default();
        let a = r.render(&ohio()).unwrap();
        let b = r.render(&ohio()).unwrap();
        assert_eq!(a, b);
        let archive = zip::ZipArchive::new(Cursor::new(a)).unwrap();
        assert_eq!(archive.len(), 5);
    }
}
