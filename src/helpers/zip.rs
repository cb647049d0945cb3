//! ZIP archive lookup for Office Open XML workbooks.
//! Part names inside an `.xlsx` are matched case-insensitively and with either path separator.

use crate::error::AtletError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

/// Helper trait for locating workbook parts and wrapping them in XML readers
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Returns the archive entry name matching `name`, if present
    fn find_part(&self, name: &str) -> Option<String>;

    /// Opens an XML reader over the named part, `None` when the part is absent
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, AtletError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn find_part(&self, name: &str) -> Option<String> {
        let wanted = name.replace('\\', "/");
        let wanted = wanted.trim_start_matches('/');
        self.file_names()
            .find(|entry| entry.replace('\\', "/").eq_ignore_ascii_case(wanted))
            .map(str::to_owned)
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, AtletError> {
        let Some(entry) = self.find_part(name) else {
            return Ok(None);
        };
        match self.by_name(&entry) {
            Ok(file) => Ok(Some(XmlReader::new(BufReader::new(file)))),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }
}
