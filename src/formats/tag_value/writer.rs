//! Rendering of a document as tag/value lines.

use crate::errors::SpdxError;
use crate::license::LicenseExpression;
use crate::models_v2::values::{format_timestamp, SpdxValue};
use crate::models_v2::{Document, ExternalPackageRef, File, Package, Snippet};
use std::borrow::Cow;
use std::io::{self, Write};

/// Write a document in tag/value form.
pub fn write<W: Write>(writer: W, document: &Document) -> Result<(), SpdxError> {
    let mut out = TagWriter { out: writer };

    out.heading("Document Information")?;
    out.tag("SPDXVersion", &document.spdx_version)?;
    out.tag("DataLicense", &document.data_license)?;
    out.tag("SPDXID", &document.spdx_id)?;
    out.tag("DocumentName", &document.name)?;
    out.tag("DocumentNamespace", &document.document_namespace)?;
    out.opt("DocumentComment", document.comment.as_deref())?;
    for external_ref in &document.external_document_refs {
        out.tag(
            "ExternalDocumentRef",
            &format!(
                "{} {} {}: {}",
                external_ref.document_ref_id,
                external_ref.document_uri,
                external_ref.checksum.algorithm.spelling(),
                external_ref.checksum.value
            ),
        )?;
    }
    out.blank()?;

    out.heading("Creation Information")?;
    let info = &document.creation_info;
    if let Some(version) = info.license_list_version {
        out.tag("LicenseListVersion", &version.to_string())?;
    }
    for creator in &info.creators {
        out.tag("Creator", &creator.to_string())?;
    }
    out.tag("Created", &format_timestamp(&info.created))?;
    out.opt("CreatorComment", info.creator_comment.as_deref())?;

    for package in &document.packages {
        out.blank()?;
        out.heading("Package Information")?;
        write_package(&mut out, package)?;
    }
    for file in &document.files {
        out.blank()?;
        out.heading("File Information")?;
        write_file(&mut out, file)?;
    }
    for snippet in &document.snippets {
        out.blank()?;
        out.heading("Snippet Information")?;
        write_snippet(&mut out, snippet)?;
    }

    if !document.annotations.is_empty() {
        out.blank()?;
        out.heading("Annotation")?;
        for annotation in &document.annotations {
            out.tag("Annotator", &annotation.annotator.to_string())?;
            out.tag("AnnotationDate", &format_timestamp(&annotation.annotation_date))?;
            out.tag("AnnotationType", annotation.annotation_type.spelling())?;
            out.tag("SPDXREF", &annotation.spdx_id)?;
            out.tag("AnnotationComment", &annotation.annotation_comment)?;
            out.blank()?;
        }
    }

    if !document.relationships.is_empty() {
        out.blank()?;
        out.heading("Relationship")?;
        for relationship in &document.relationships {
            out.tag(
                "Relationship",
                &format!(
                    "{} {} {}",
                    relationship.spdx_element_id,
                    relationship.relationship_type.spelling(),
                    relationship.related_spdx_element_id
                ),
            )?;
            out.opt("RelationshipComment", relationship.comment.as_deref())?;
        }
    }

    for extracted in &document.extracted_licensing_info {
        out.blank()?;
        out.heading("License Information")?;
        out.tag("LicenseID", &extracted.license_id)?;
        out.tag("ExtractedText", &extracted.extracted_text)?;
        if let Some(name) = &extracted.license_name {
            out.tag("LicenseName", &name.to_string())?;
        }
        for reference in &extracted.cross_references {
            out.tag("LicenseCrossReference", reference)?;
        }
        out.opt("LicenseComment", extracted.comment.as_deref())?;
    }
    Ok(())
}

fn write_package<W: Write>(out: &mut TagWriter<W>, package: &Package) -> Result<(), SpdxError> {
    out.tag("PackageName", &package.name)?;
    out.tag("SPDXID", &package.spdx_id)?;
    out.opt("PackageVersion", package.version.as_deref())?;
    out.opt("PackageFileName", package.file_name.as_deref())?;
    if let Some(supplier) = &package.supplier {
        out.tag("PackageSupplier", &supplier.to_string())?;
    }
    if let Some(originator) = &package.originator {
        out.tag("PackageOriginator", &originator.to_string())?;
    }
    out.tag("PackageDownloadLocation", &package.download_location.to_string())?;
    out.tag("FilesAnalyzed", if package.files_analyzed { "true" } else { "false" })?;
    if let Some(code) = &package.verification_code {
        let mut value = code.value.clone();
        if !code.excluded_files.is_empty() {
            value.push_str(&format!(" (excludes: {})", code.excluded_files.join(" ")));
        }
        out.tag("PackageVerificationCode", &value)?;
    }
    for checksum in &package.checksums {
        out.tag(
            "PackageChecksum",
            &format!("{}: {}", checksum.algorithm.spelling(), checksum.value),
        )?;
    }
    out.opt("PackageHomePage", package.homepage.as_deref())?;
    out.opt("PackageSourceInfo", package.source_info.as_deref())?;
    out.license("PackageLicenseConcluded", package.license_concluded.as_ref())?;
    for license in &package.license_info_from_files {
        out.tag("PackageLicenseInfoFromFiles", &license.to_string())?;
    }
    out.license("PackageLicenseDeclared", package.license_declared.as_ref())?;
    out.opt("PackageLicenseComments", package.license_comment.as_deref())?;
    if let Some(copyright) = &package.copyright_text {
        out.tag("PackageCopyrightText", &copyright.to_string())?;
    }
    out.opt("PackageSummary", package.summary.as_deref())?;
    out.opt("PackageDescription", package.description.as_deref())?;
    out.opt("PackageComment", package.comment.as_deref())?;
    for external_ref in &package.external_refs {
        write_external_ref(out, external_ref)?;
    }
    for attribution in &package.attribution_texts {
        out.tag("PackageAttributionText", attribution)?;
    }
    if let Some(purpose) = package.primary_package_purpose {
        out.tag("PrimaryPackagePurpose", purpose.spelling())?;
    }
    if let Some(date) = &package.release_date {
        out.tag("ReleaseDate", &format_timestamp(date))?;
    }
    if let Some(date) = &package.built_date {
        out.tag("BuiltDate", &format_timestamp(date))?;
    }
    if let Some(date) = &package.valid_until_date {
        out.tag("ValidUntilDate", &format_timestamp(date))?;
    }
    Ok(())
}

fn write_external_ref<W: Write>(
    out: &mut TagWriter<W>,
    external_ref: &ExternalPackageRef,
) -> Result<(), SpdxError> {
    out.tag(
        "ExternalRef",
        &format!(
            "{} {} {}",
            external_ref.category.spelling(),
            external_ref.reference_type,
            external_ref.locator
        ),
    )?;
    out.opt("ExternalRefComment", external_ref.comment.as_deref())
}

fn write_file<W: Write>(out: &mut TagWriter<W>, file: &File) -> Result<(), SpdxError> {
    out.tag("FileName", &file.name)?;
    out.tag("SPDXID", &file.spdx_id)?;
    for file_type in &file.file_types {
        out.tag("FileType", file_type.spelling())?;
    }
    for checksum in &file.checksums {
        out.tag(
            "FileChecksum",
            &format!("{}: {}", checksum.algorithm.spelling(), checksum.value),
        )?;
    }
    out.license("LicenseConcluded", file.license_concluded.as_ref())?;
    for license in &file.license_info_in_file {
        out.tag("LicenseInfoInFile", &license.to_string())?;
    }
    out.opt("LicenseComments", file.license_comment.as_deref())?;
    if let Some(copyright) = &file.copyright_text {
        out.tag("FileCopyrightText", &copyright.to_string())?;
    }
    out.opt("FileComment", file.comment.as_deref())?;
    out.opt("FileNotice", file.notice.as_deref())?;
    for contributor in &file.contributors {
        out.tag("FileContributor", contributor)?;
    }
    for attribution in &file.attribution_texts {
        out.tag("FileAttributionText", attribution)?;
    }
    Ok(())
}

fn write_snippet<W: Write>(out: &mut TagWriter<W>, snippet: &Snippet) -> Result<(), SpdxError> {
    out.tag("SnippetSPDXID", &snippet.spdx_id)?;
    out.tag("SnippetFromFileSPDXID", &snippet.file_spdx_id)?;
    out.tag(
        "SnippetByteRange",
        &format!("{}:{}", snippet.byte_range.0, snippet.byte_range.1),
    )?;
    if let Some((begin, end)) = snippet.line_range {
        out.tag("SnippetLineRange", &format!("{begin}:{end}"))?;
    }
    out.license("SnippetLicenseConcluded", snippet.license_concluded.as_ref())?;
    for license in &snippet.license_info_in_snippet {
        out.tag("LicenseInfoInSnippet", &license.to_string())?;
    }
    out.opt("SnippetLicenseComments", snippet.license_comment.as_deref())?;
    if let Some(copyright) = &snippet.copyright_text {
        out.tag("SnippetCopyrightText", &copyright.to_string())?;
    }
    out.opt("SnippetName", snippet.name.as_deref())?;
    out.opt("SnippetComment", snippet.comment.as_deref())?;
    for attribution in &snippet.attribution_texts {
        out.tag("SnippetAttributionText", attribution)?;
    }
    Ok(())
}

struct TagWriter<W: Write> {
    out: W,
}

impl<W: Write> TagWriter<W> {
    fn heading(&mut self, title: &str) -> Result<(), SpdxError> {
        writeln!(self.out, "## {title}").map_err(io_error)
    }

    fn tag(&mut self, tag: &str, value: &str) -> Result<(), SpdxError> {
        writeln!(self.out, "{tag}: {}", text_value(value)).map_err(io_error)
    }

    fn opt(&mut self, tag: &str, value: Option<&str>) -> Result<(), SpdxError> {
        match value {
            Some(value) => self.tag(tag, value),
            None => Ok(()),
        }
    }

    fn license(
        &mut self,
        tag: &str,
        value: Option<&SpdxValue<LicenseExpression>>,
    ) -> Result<(), SpdxError> {
        match value {
            Some(value) => self.tag(tag, &value.to_string()),
            None => Ok(()),
        }
    }

    fn blank(&mut self) -> Result<(), SpdxError> {
        writeln!(self.out).map_err(io_error)
    }
}

// Values with newlines are wrapped so the reader can recover them verbatim.
fn text_value(value: &str) -> Cow<'_, str> {
    if value.contains('\n') {
        Cow::Owned(format!("<text>{value}</text>"))
    } else {
        Cow::Borrowed(value)
    }
}

fn io_error(error: io::Error) -> SpdxError {
    SpdxError::Io(error, "failed to write tag/value".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models_v2::values::{parse_timestamp, Actor};
    use crate::models_v2::CreationInfo;

    fn minimal_document() -> Document {
        let creation_info = CreationInfo::new(
            vec![Actor::tool("demo-tool")],
            parse_timestamp("2023-01-02T03:04:05Z").unwrap(),
        );
        Document::new("demo", "https://example.com/demo", creation_info)
    }

    fn render(document: &Document) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer, document).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn document_section_comes_first() {
        let rendered = render(&minimal_document());
        assert!(rendered.starts_with("## Document Information\nSPDXVersion: SPDX-2.3\n"));
        assert!(rendered.contains("## Creation Information\nCreator: Tool: demo-tool\n"));
        assert!(rendered.contains("Created: 2023-01-02T03:04:05Z\n"));
    }

    #[test]
    fn multi_line_text_is_wrapped() {
        let mut document = minimal_document();
        document.comment = Some("first line\nsecond line".to_string());
        let rendered = render(&document);
        assert!(rendered.contains("DocumentComment: <text>first line\nsecond line</text>\n"));
    }

    #[test]
    fn single_line_text_is_not_wrapped() {
        let mut document = minimal_document();
        document.comment = Some("one line".to_string());
        let rendered = render(&document);
        assert!(rendered.contains("DocumentComment: one line\n"));
    }

    #[test]
    fn package_section_carries_required_tags() {
        let mut document = minimal_document();
        document.packages.push(Package::new(
            "SPDXRef-P",
            "pkg",
            SpdxValue::NoAssertion,
        ));
        let rendered = render(&document);
        assert!(rendered.contains("## Package Information\nPackageName: pkg\nSPDXID: SPDXRef-P\n"));
        assert!(rendered.contains("PackageDownloadLocation: NOASSERTION\n"));
        assert!(rendered.contains("FilesAnalyzed: true\n"));
    }
}
