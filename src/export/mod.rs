//! XLSX export.
//!
//! Writes a minimal OOXML package: content types, package and workbook
//! relationships, the workbook part and one worksheet part per sheet. Values,
//! column outline levels and protections are carried; styles are not.

mod sheet_writer;

use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::types::Workbook;

use sheet_writer::write_sheet_xml;

const CONTENT_TYPES_HEAD: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
);

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    "</Relationships>",
);

const XML_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Zip path of the `n`-th worksheet part (1-based).
pub fn sheet_path(n: usize) -> String {
    format!("xl/worksheets/sheet{n}.xml")
}

/// Save a workbook to XLSX bytes.
pub fn save_xlsx(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut content_types = String::from(CONTENT_TYPES_HEAD);
    let mut workbook_xml = format!(
        "{XML_HEAD}\n<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\"><sheets>"
    );
    let mut workbook_rels = format!(
        "{XML_HEAD}\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">"
    );

    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        let n = idx + 1;
        let path = sheet_path(n);
        content_types.push_str(&format!(
            "<Override PartName=\"/{path}\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>"
        ));
        workbook_xml.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{n}\"/>",
            escape(sheet.name.as_str()),
            sheet.id
        ));
        workbook_rels.push_str(&format!(
            "<Relationship Id=\"rId{n}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{n}.xml\"/>"
        ));

        let protections: Vec<_> = workbook
            .protections
            .iter()
            .filter(|p| p.sheet() == sheet.id)
            .collect();
        writer.start_file(path, options)?;
        writer.write_all(write_sheet_xml(sheet, &protections).as_bytes())?;
    }

    content_types.push_str("</Types>");
    workbook_xml.push_str("</sheets></workbook>");
    workbook_rels.push_str("</Relationships>");

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(content_types.as_bytes())?;
    writer.start_file("_rels/.rels", options)?;
    writer.write_all(ROOT_RELS.as_bytes())?;
    writer.start_file("xl/workbook.xml", options)?;
    writer.write_all(workbook_xml.as_bytes())?;
    writer.start_file("xl/_rels/workbook.xml.rels", options)?;
    writer.write_all(workbook_rels.as_bytes())?;

    let cursor = writer.finish()?;
    log::debug!("exported {} sheets", workbook.sheets.len());
    Ok(cursor.into_inner())
}

/// [`save_xlsx`] straight to a file.
pub fn write_xlsx_file(workbook: &Workbook, path: &Path) -> Result<()> {
    std::fs::write(path, save_xlsx(workbook)?)?;
    Ok(())
}
