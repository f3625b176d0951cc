//! EXIF time extraction for images

use crate::error::TimestampError;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// Read the raw value of the EXIF `DateTime` tag
pub fn read_exif_time(path: &Path) -> Result<String, TimestampError> {
    let unreadable = |message: String| TimestampError::SourceUnreadable {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| unreadable(format!("couldn't decode exif: {e}")))?;

    let field = exif
        .get_field(Tag::DateTime, In::PRIMARY)
        .ok_or_else(|| TimestampError::NoTimestampFound {
            path: path.to_path_buf(),
        })?;

    // display_value() reformats dates, so take the raw ASCII
    match &field.value {
        Value::Ascii(values) if !values.is_empty() => {
            let raw = String::from_utf8_lossy(&values[0]).into_owned();
            trace!(?path, raw, "Found EXIF DateTime");
            Ok(raw)
        }
        other => Err(unreadable(format!("DateTime tag is not ASCII: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_metadata_time;
    use exif::Field;
    use exif::experimental::Writer;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_tiff(path: &Path, datetime: &str) {
        let field = Field {
            tag: Tag::DateTime,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![datetime.as_bytes().to_vec()]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        std::fs::write(path, buf.into_inner()).unwrap();
    }

    #[test]
    fn test_read_exif_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.tif");
        write_tiff(&path, "2024:01:15 14:30:00");

        let raw = read_exif_time(&path).unwrap();
        let dt = parse_metadata_time(&path, &raw).unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_exif_time(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, TimestampError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_not_an_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"plain text, no exif").unwrap();
        let err = read_exif_time(&path).unwrap_err();
        assert!(matches!(err, TimestampError::SourceUnreadable { .. }));
        assert_eq!(err.category(), "exif");
    }
}
